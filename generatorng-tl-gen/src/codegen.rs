//! The public code-generation API.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use generatorng_tl_parser::tl::Definition;

use crate::bake::bake;
use crate::emit::{self, debug, enums, rpc, stream, structs};
use crate::emit::stream::Direction;
use crate::grouper;
use crate::metadata::Usage;
use crate::model::{Method, SchemaModel, Type};
use crate::namegen as n;
use crate::patch::Marker;
use crate::resolver::{self, Unresolved};
use crate::sections::{PriorSections, Section};

// ─── Config ───────────────────────────────────────────────────────────────────

/// Generation configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Method name prefixes (`auth`, `messages`, …) that get RPC stubs and
    /// dispatch. Matched against the formatted method name.
    pub api_groups: Vec<String>,
    /// TL type names never emitted as structs.
    pub type_blacklist: Vec<String>,
    /// `(owner, member)` TL type pairs whose by-value edge is replaced by a
    /// `TLPtr` indirection.
    pub indirections: Vec<(String, String)>,
    /// Function receiving serialized requests in the RPC stubs.
    pub sender: String,
    /// Emit the schema line as a comment above constants, structs and stubs.
    pub add_spec_sources: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_groups: [
                "auth", "account", "contacts", "messages", "updates", "photos", "upload", "help",
                "users", "channels",
            ]
            .map(String::from)
            .to_vec(),
            type_blacklist: ["True", "Vector", "Null"].map(String::from).to_vec(),
            indirections: vec![
                ("RichText".to_owned(), "RichText".to_owned()),
                ("PageBlock".to_owned(), "PageBlock".to_owned()),
            ],
            sender: "sendEncryptedPackage".to_owned(),
            add_spec_sources: false,
        }
    }
}

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Why generation stopped before producing output.
#[derive(Debug)]
pub enum GenerateError {
    /// Dependency resolution left types without an emittable order.
    Unresolved(Vec<Unresolved>),
    /// Rendering into a string failed.
    Format(fmt::Error),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved(types) => {
                write!(f, "unable to resolve {} types:", types.len())?;
                for ty in types {
                    write!(f, "\n  {ty}")?;
                }
                Ok(())
            }
            Self::Format(e) => write!(f, "formatting failed: {e}"),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Format(e) => Some(e),
            Self::Unresolved(_) => None,
        }
    }
}

impl From<fmt::Error> for GenerateError {
    fn from(e: fmt::Error) -> Self {
        Self::Format(e)
    }
}

// ─── Outputs ─────────────────────────────────────────────────────────────────

/// Rendered text of every section. Full sections are relative to the marker
/// indentation; the handler definitions already carry it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Generated {
    sections: BTreeMap<Section, String>,
}

impl Generated {
    /// The text of one section. Empty when nothing was emitted for it.
    pub fn get(&self, section: Section) -> &str {
        self.sections.get(&section).map_or("", String::as_str)
    }

    /// Every section in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &str)> {
        self.sections.iter().map(|(s, text)| (*s, text.as_str()))
    }

    /// `(marker, content)` pairs for patching `file`.
    pub fn for_file(&self, file: &str) -> Vec<(Marker, &str)> {
        Section::in_file(file).map(|s| (s.marker(), self.get(s))).collect()
    }
}

// ─── Public API ───────────────────────────────────────────────────────────────

/// Builds the model: indirections applied, members baked.
pub fn build_model(defs: &[Definition], config: &Config) -> SchemaModel {
    let mut model = SchemaModel::from_definitions(defs);
    let wrapped = model.apply_indirections(&config.indirections);
    log::debug!("[codegen] {wrapped} fields behind an indirection");
    bake(&mut model);
    model
}

/// Generates every section from parsed definitions.
///
/// `prior` holds the current region contents of the target files; it feeds
/// the merged sections only.
pub fn generate(defs: &[Definition], config: &Config, prior: &PriorSections) -> Result<Generated, GenerateError> {
    generate_model(&build_model(defs, config), config, prior)
}

/// Generates every section from an already built model.
pub fn generate_model(
    model: &SchemaModel,
    config: &Config,
    prior: &PriorSections,
) -> Result<Generated, GenerateError> {
    let resolution = resolver::resolve(model);
    if !resolution.is_complete() {
        return Err(GenerateError::Unresolved(resolution.unresolved));
    }

    let blacklist: BTreeSet<String> = config
        .type_blacklist
        .iter()
        .map(|t| format!("{}{}", n::TYPE_PREFIX, n::to_pascal(t)))
        .collect();
    let types: Vec<&Type> = resolution
        .ordered
        .iter()
        .filter(|name| !blacklist.contains(*name))
        .filter_map(|name| model.type_by_name(name))
        .collect();
    let methods = grouper::allowed_methods(model, &config.api_groups);

    let arg_types = || {
        methods
            .iter()
            .flat_map(|m| emit::wire_params(&m.params))
            .map(|p| p.ty.as_str())
    };
    let write_usage = Usage::collect(model, arg_types(), &blacklist);
    let read_usage = Usage::collect(
        model,
        types
            .iter()
            .map(|t| t.name.as_str())
            .chain(methods.iter().map(|m| m.result.as_str()))
            .chain(arg_types()),
        &blacklist,
    );
    let write_types: Vec<&Type> = types
        .iter()
        .copied()
        .filter(|t| write_usage.types.contains(&t.name))
        .collect();
    log::info!(
        "[codegen] {} types emitted, {} need write operators",
        types.len(),
        write_types.len()
    );

    let dispatched: Vec<&Method> = methods.iter().copied().filter(|m| !rpc::returns_updates(m)).collect();
    let updates: Vec<&Method> = methods.iter().copied().filter(|m| rpc::returns_updates(m)).collect();

    let mut out = Generated::default();
    let mut put = |section: Section, text: String| {
        out.sections.insert(section, text);
    };

    put(Section::Values, enums::values(&grouper::value_blocks(model), config.add_spec_sources)?);

    let mut struct_blocks = vec![structs::forward_declarations(types.iter().copied())?];
    for ty in &types {
        struct_blocks.push(structs::struct_def(ty, config.add_spec_sources)?);
    }
    put(Section::Types, emit::join_blocks(struct_blocks));

    put(Section::StreamReadDecls, concat(&types, |t| stream::declaration(t, Direction::Read))?);
    put(Section::StreamWriteDecls, concat(&write_types, |t| stream::declaration(t, Direction::Write))?);
    put(Section::StreamReadDefs, blocks(&types, |t| stream::definition(t, Direction::Read))?);
    put(Section::StreamWriteDefs, blocks(&write_types, |t| stream::definition(t, Direction::Write))?);

    put(
        Section::VectorReadTemplates,
        vector_templates(&read_usage, Direction::Read, prior.get(Section::VectorReadTemplates)),
    );
    put(
        Section::VectorWriteTemplates,
        vector_templates(&write_usage, Direction::Write, prior.get(Section::VectorWriteTemplates)),
    );

    put(Section::ConnectionMethodDecls, concat(&methods, |m| rpc::stub_declaration(m))?);
    put(
        Section::ConnectionMethodDefs,
        blocks(&methods, |m| rpc::stub_definition(m, &config.sender, config.add_spec_sources))?,
    );
    put(Section::ConnectionProcessDecls, concat(&dispatched, |m| rpc::process_declaration(m))?);
    put(
        Section::ConnectionProcessDefs,
        rpc::process_definitions(
            &dispatched,
            prior.get(Section::ConnectionProcessDefs),
            prior.indent(Section::ConnectionProcessDefs),
        )?,
    );
    put(Section::ConnectionSwitchCases, concat(&dispatched, |m| rpc::switch_case(m))?);
    put(Section::ConnectionUpdatesCases, concat(&updates, |m| rpc::updates_case(m))?);

    put(Section::DebugDecls, concat(&types, |t| debug::declaration(t))?);
    put(Section::DebugDefs, blocks(&types, |t| debug::definition(t))?);
    put(Section::RpcDebugCases, concat(&methods, |m| rpc::debug_case(m))?);

    Ok(out)
}

/// Renders every item and concatenates the results.
fn concat<T>(items: &[&T], render: impl Fn(&T) -> Result<String, fmt::Error>) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for item in items {
        out.push_str(&render(*item)?);
    }
    Ok(out)
}

/// Renders every item, one blank line between them.
fn blocks<T>(items: &[&T], render: impl Fn(&T) -> Result<String, fmt::Error>) -> Result<String, fmt::Error> {
    let rendered = items.iter().map(|item| render(*item)).collect::<Result<Vec<_>, _>>()?;
    Ok(emit::join_blocks(rendered))
}

fn vector_templates(usage: &Usage, direction: Direction, prior: Option<&str>) -> String {
    let wanted: Vec<String> = usage
        .vectors
        .iter()
        .map(|v| stream::vector_template(v, direction))
        .collect();
    stream::merge_lines(prior, &wanted)
}
