//! The fixed set of generated sections and the files they live in.

use std::collections::HashMap;
use std::fmt;

use crate::patch::{self, Marker, PatchError};

/// One generated region of one target file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    /// `TLValue` enum constants.
    Values,
    /// Tagged-union structs.
    Types,
    /// Read operator declarations.
    StreamReadDecls,
    /// Write operator declarations.
    StreamWriteDecls,
    /// Read operator definitions.
    StreamReadDefs,
    /// Write operator definitions.
    StreamWriteDefs,
    /// Explicit `TLVector` read instantiations.
    VectorReadTemplates,
    /// Explicit `TLVector` write instantiations.
    VectorWriteTemplates,
    /// RPC stub declarations.
    ConnectionMethodDecls,
    /// RPC handler declarations.
    ConnectionProcessDecls,
    /// RPC stub definitions.
    ConnectionMethodDefs,
    /// RPC handler definitions, hand-written bodies kept.
    ConnectionProcessDefs,
    /// Dispatch `case`s for RPC results.
    ConnectionSwitchCases,
    /// Labels for methods answered with `Updates`.
    ConnectionUpdatesCases,
    /// Debug operator declarations.
    DebugDecls,
    /// Debug operator definitions.
    DebugDefs,
    /// Request dump `case`s.
    RpcDebugCases,
}

/// Target file names, in the order they are patched.
pub const FILES: &[&str] = &[
    "TLValues.hpp",
    "TLTypes.hpp",
    "CTelegramStream.hpp",
    "CTelegramStream.cpp",
    "CTelegramConnection.hpp",
    "CTelegramConnection.cpp",
    "TLTypesDebug.hpp",
    "TLTypesDebug.cpp",
    "TLRpcDebug.cpp",
];

impl Section {
    /// Every section, in emission order.
    pub const ALL: [Section; 17] = [
        Section::Values,
        Section::Types,
        Section::StreamReadDecls,
        Section::StreamWriteDecls,
        Section::StreamReadDefs,
        Section::StreamWriteDefs,
        Section::VectorReadTemplates,
        Section::VectorWriteTemplates,
        Section::ConnectionMethodDecls,
        Section::ConnectionProcessDecls,
        Section::ConnectionMethodDefs,
        Section::ConnectionProcessDefs,
        Section::ConnectionSwitchCases,
        Section::ConnectionUpdatesCases,
        Section::DebugDecls,
        Section::DebugDefs,
        Section::RpcDebugCases,
    ];

    /// The target file holding this section.
    pub fn file(self) -> &'static str {
        use Section::*;
        match self {
            Values => "TLValues.hpp",
            Types => "TLTypes.hpp",
            StreamReadDecls | StreamWriteDecls => "CTelegramStream.hpp",
            StreamReadDefs | StreamWriteDefs | VectorReadTemplates | VectorWriteTemplates => {
                "CTelegramStream.cpp"
            }
            ConnectionMethodDecls | ConnectionProcessDecls => "CTelegramConnection.hpp",
            ConnectionMethodDefs
            | ConnectionProcessDefs
            | ConnectionSwitchCases
            | ConnectionUpdatesCases => "CTelegramConnection.cpp",
            DebugDecls => "TLTypesDebug.hpp",
            DebugDefs => "TLTypesDebug.cpp",
            RpcDebugCases => "TLRpcDebug.cpp",
        }
    }

    /// The marker pair delimiting this section.
    pub fn marker(self) -> Marker {
        use Section::*;
        match self {
            Values => Marker::full("TLValues"),
            Types => Marker::full("TLTypes"),
            StreamReadDecls | StreamReadDefs => Marker::full("read operators"),
            StreamWriteDecls | StreamWriteDefs => Marker::full("write operators"),
            VectorReadTemplates => Marker::full("vector read templates"),
            VectorWriteTemplates => Marker::full("vector write templates"),
            ConnectionMethodDecls | ConnectionMethodDefs => Marker::full("Telegram API methods"),
            ConnectionProcessDecls => Marker::full("Telegram API RPC process methods"),
            ConnectionProcessDefs => Marker::partial("Telegram API RPC process methods"),
            ConnectionSwitchCases => Marker::full("Telegram API RPC process switch cases"),
            ConnectionUpdatesCases => Marker::full("Telegram API updates switch cases"),
            DebugDecls | DebugDefs => Marker::full("TLTypes debug operators"),
            RpcDebugCases => Marker::full("RPC debug cases"),
        }
    }

    /// Sections living in `file`, in emission order.
    pub fn in_file(file: &str) -> impl Iterator<Item = Section> + '_ {
        Self::ALL.into_iter().filter(move |s| s.file() == file)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.file(), self.marker().name)
    }
}

/// Region contents found in the target files before generation. Merged
/// sections (vector templates, handler bodies) read from here.
///
/// Partial regions are kept byte for byte, indentation included; the rest
/// are relative to their marker indentation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriorSections {
    regions: HashMap<Section, String>,
    indents: HashMap<Section, String>,
}

impl PriorSections {
    /// No prior content: every merged section starts from scratch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the content of one section.
    pub fn insert(&mut self, section: Section, content: impl Into<String>) {
        self.regions.insert(section, content.into());
    }

    /// Reads every section of `file` out of its current `text`.
    pub fn read_file(&mut self, file: &str, text: &str) -> Result<(), PatchError> {
        for section in Section::in_file(file) {
            if let Some((content, indent)) = patch::read_region(text, &section.marker())? {
                self.regions.insert(section, content);
                self.indents.insert(section, indent);
            }
        }
        Ok(())
    }

    /// The prior content of `section`, if its file had the markers.
    pub fn get(&self, section: Section) -> Option<&str> {
        self.regions.get(&section).map(String::as_str)
    }

    /// Leading whitespace of the start marker of `section`. Empty when the
    /// section was inserted by hand or not found.
    pub fn indent(&self, section: Section) -> &str {
        self.indents.get(&section).map_or("", String::as_str)
    }
}
