//! Render functions, one module per artifact kind.
//!
//! Every function appends C++ text to a `String`, relative to the marker
//! indentation, and never looks at anything but its arguments.

use std::fmt::{self, Write};

use crate::model::Param;

pub(crate) mod debug;
pub(crate) mod enums;
pub(crate) mod rpc;
pub(crate) mod stream;
pub(crate) mod structs;

/// One level of C++ indentation.
pub(crate) const INDENT: &str = "    ";

/// Joins rendered blocks with one blank line between them.
pub(crate) fn join_blocks(blocks: impl IntoIterator<Item = String>) -> String {
    let mut out = String::new();
    for block in blocks.into_iter().filter(|b| !b.is_empty()) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&block);
    }
    out
}

/// Writes `lines` at `indent`, wrapped in `if (<owner><member> & 1 << <bit>)`
/// when `param` is flag-gated.
pub(crate) fn write_gated(
    out: &mut String,
    indent: &str,
    owner: &str,
    param: &Param,
    lines: &[String],
) -> fmt::Result {
    match &param.flag {
        Some(flag) => {
            writeln!(out, "{indent}if ({owner}{} & 1 << {}) {{", flag.member, flag.bit)?;
            for line in lines {
                writeln!(out, "{indent}{INDENT}{line}")?;
            }
            writeln!(out, "{indent}}}")
        }
        None => {
            for line in lines {
                writeln!(out, "{indent}{line}")?;
            }
            Ok(())
        }
    }
}

/// Schema text as a one-line comment.
pub(crate) fn write_source(out: &mut String, indent: &str, source: Option<&str>) -> fmt::Result {
    match source {
        Some(source) => writeln!(out, "{indent}// {source}"),
        None => Ok(()),
    }
}

/// Fields that exist on the wire, in order. Flag-only fields have no payload.
pub(crate) fn wire_params(params: &[Param]) -> impl Iterator<Item = &Param> {
    params.iter().filter(|p| !p.is_flag_only())
}
