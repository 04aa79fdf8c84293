//! Marker-delimited region replacement in hand-maintained files.
//!
//! A region is delimited by two comment lines:
//!
//! ```text
//!     // Generated TLValues
//!     ...
//!     // End of generated TLValues
//! ```
//!
//! Only the lines in between are ever touched. Markers are matched against
//! the whole trimmed line. In a full region the start marker's indentation
//! is applied to every generated line; a partial region is written as given,
//! since its hand-written lines must come back byte for byte and the content
//! already carries the indentation.

use std::fmt;

/// How a region's content relates to what was there before.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Content is fully regenerated.
    Full,
    /// Content is regenerated but merges hand-written parts back in.
    Partial,
}

/// A named marker pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Marker {
    /// The name following `Generated` in the comment.
    pub name: &'static str,
    /// Which comment spelling delimits the region.
    pub kind: MarkerKind,
}

impl Marker {
    /// A fully regenerated region.
    pub const fn full(name: &'static str) -> Self {
        Self { name, kind: MarkerKind::Full }
    }

    /// A region with spliced hand-written content.
    pub const fn partial(name: &'static str) -> Self {
        Self { name, kind: MarkerKind::Partial }
    }

    /// The comment line opening the region.
    pub fn begin(&self) -> String {
        match self.kind {
            MarkerKind::Full => format!("// Generated {}", self.name),
            MarkerKind::Partial => format!("// Partially generated {}", self.name),
        }
    }

    /// The comment line closing the region.
    pub fn end(&self) -> String {
        match self.kind {
            MarkerKind::Full => format!("// End of generated {}", self.name),
            MarkerKind::Partial => format!("// End of partially generated {}", self.name),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.begin())
    }
}

/// Errors raised while locating regions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchError {
    /// The start marker was found but its end marker never follows.
    MissingEndMarker {
        /// The start marker line.
        marker: String,
        /// 1-based line of the start marker.
        line: usize,
    },
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEndMarker { marker, line } => {
                write!(f, "`{marker}` at line {line} has no matching end marker")
            }
        }
    }
}

impl std::error::Error for PatchError {}

/// Byte span of a region's content plus the start marker's indentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    /// Offset of the first byte after the start marker line.
    pub start: usize,
    /// Offset of the first byte of the end marker line.
    pub end: usize,
    /// Leading whitespace of the start marker.
    pub indent: String,
}

/// Locates `marker` in `text`. `Ok(None)` when the start marker is absent.
pub fn find_region(text: &str, marker: &Marker) -> Result<Option<Region>, PatchError> {
    let begin = marker.begin();
    let end = marker.end();

    let mut offset = 0;
    let mut open: Option<(usize, String)> = None;
    let mut start = 0;

    for (index, line) in text.split_inclusive('\n').enumerate() {
        let next = offset + line.len();
        let trimmed = line.trim();
        if let Some((_, indent)) = &open {
            if trimmed == end {
                return Ok(Some(Region { start, end: offset, indent: indent.clone() }));
            }
        } else if trimmed == begin {
            let indent = line.len() - line.trim_start().len();
            open = Some((index + 1, line[..indent].to_owned()));
            start = next;
        }
        offset = next;
    }

    match open {
        Some((line, _)) => Err(PatchError::MissingEndMarker { marker: begin, line }),
        None => Ok(None),
    }
}

/// Prefixes every non-empty line of `content` with `indent`.
pub fn indent_block(content: &str, indent: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        if !line.trim().is_empty() {
            out.push_str(indent);
            out.push_str(line);
        } else {
            out.push_str(if line.ends_with('\n') { "\n" } else { "" });
        }
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Removes `indent` from every line that starts with it.
fn dedent_block(content: &str, indent: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        out.push_str(line.strip_prefix(indent).unwrap_or(line.trim_start_matches([' ', '\t'])));
    }
    out
}

/// The current content of a region and the start marker's indentation.
///
/// Full regions come back with the indentation removed; partial regions come
/// back untouched.
pub fn read_region(text: &str, marker: &Marker) -> Result<Option<(String, String)>, PatchError> {
    Ok(find_region(text, marker)?.map(|r| {
        let content = &text[r.start..r.end];
        let content = match marker.kind {
            MarkerKind::Full => dedent_block(content, &r.indent),
            MarkerKind::Partial => content.to_owned(),
        };
        (content, r.indent)
    }))
}

/// Replaces a region's content. `Ok(None)` when the marker is absent.
pub fn replace_region(text: &str, marker: &Marker, content: &str) -> Result<Option<String>, PatchError> {
    let Some(region) = find_region(text, marker)? else {
        return Ok(None);
    };
    let body = match marker.kind {
        MarkerKind::Full => indent_block(content, &region.indent),
        MarkerKind::Partial if !content.is_empty() && !content.ends_with('\n') => format!("{content}\n"),
        MarkerKind::Partial => content.to_owned(),
    };
    let mut out = String::with_capacity(text.len() + body.len());
    out.push_str(&text[..region.start]);
    out.push_str(&body);
    out.push_str(&text[region.end..]);
    Ok(Some(out))
}

/// Applies every `(marker, content)` pair to `text`. Missing markers are
/// skipped.
pub fn patch_text(text: &str, sections: &[(Marker, &str)]) -> Result<String, PatchError> {
    let mut current = text.to_owned();
    for (marker, content) in sections {
        match replace_region(&current, marker, content)? {
            Some(patched) => current = patched,
            None => log::debug!("[patch] `{marker}` not present, section skipped"),
        }
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUES: Marker = Marker::full("TLValues");

    #[test]
    fn replaces_between_markers_with_indent() {
        let text = "enum TLValue {\n    // Generated TLValues\n    Old = 1,\n    // End of generated TLValues\n};\n";
        let patched = replace_region(text, &VALUES, "A = 0x1,\n\nB = 0x2,\n").unwrap().unwrap();
        assert_eq!(
            patched,
            "enum TLValue {\n    // Generated TLValues\n    A = 0x1,\n\n    B = 0x2,\n    // End of generated TLValues\n};\n"
        );
        let (content, indent) = read_region(&patched, &VALUES).unwrap().unwrap();
        assert_eq!(content, "A = 0x1,\n\nB = 0x2,\n");
        assert_eq!(indent, "    ");
    }

    #[test]
    fn absent_marker_is_noop() {
        let text = "int main() {}\n";
        assert_eq!(replace_region(text, &VALUES, "x\n").unwrap(), None);
        assert_eq!(patch_text(text, &[(VALUES, "x\n")]).unwrap(), text);
    }

    #[test]
    fn missing_end_marker_is_an_error() {
        let text = "a\n// Generated TLValues\nb\n";
        assert_eq!(
            find_region(text, &VALUES),
            Err(PatchError::MissingEndMarker { marker: "// Generated TLValues".into(), line: 2 })
        );
    }

    #[test]
    fn partial_markers_differ_from_full() {
        let partial = Marker::partial("Telegram API RPC process methods");
        let text = "// Generated Telegram API RPC process methods\n// End of generated Telegram API RPC process methods\n";
        assert_eq!(find_region(text, &partial).unwrap(), None);
        let text = "// Partially generated Telegram API RPC process methods\n// End of partially generated Telegram API RPC process methods\n";
        assert!(find_region(text, &partial).unwrap().is_some());
    }

    #[test]
    fn partial_region_is_byte_exact() {
        let partial = Marker::partial("Telegram API RPC process methods");
        let text = "namespace Telegram {\n    \
                    // Partially generated Telegram API RPC process methods\n\
                    #ifdef DEVELOPER_BUILD\n    qDebug() << Q_FUNC_INFO;   \n#endif\n    \
                    // End of partially generated Telegram API RPC process methods\n}\n";
        let (content, indent) = read_region(text, &partial).unwrap().unwrap();
        assert_eq!(indent, "    ");
        assert_eq!(content, "#ifdef DEVELOPER_BUILD\n    qDebug() << Q_FUNC_INFO;   \n#endif\n");
        assert_eq!(replace_region(text, &partial, &content).unwrap().unwrap(), text);
    }

    #[test]
    fn marker_must_be_whole_line() {
        let text = "// Generated TLValues extra\n// End of generated TLValues\n";
        assert_eq!(find_region(text, &VALUES).unwrap(), None);
    }

    #[test]
    fn patching_is_idempotent() {
        let text = "  // Generated TLValues\n  // End of generated TLValues\n";
        let once = patch_text(text, &[(VALUES, "A = 0x1,\n")]).unwrap();
        let twice = patch_text(&once, &[(VALUES, "A = 0x1,\n")]).unwrap();
        assert_eq!(once, twice);
    }
}
