//! RPC stubs, result dispatch and request dumps for `CTelegramConnection`
//! and `TLRpcDebug`.

use std::collections::HashSet;
use std::fmt::{self, Write};

use super::{INDENT, join_blocks, wire_params, write_gated, write_source};
use crate::model::Method;
use crate::namegen as n;
use crate::patch::indent_block;

/// Result type whose methods share one hand-written handler.
pub(crate) const UPDATES: &str = "TLUpdates";

/// `true` when results of `method` go to the shared updates handler.
pub(crate) fn returns_updates(method: &Method) -> bool {
    method.result == UPDATES
}

fn arguments(method: &Method) -> String {
    wire_params(&method.params)
        .map(|p| n::arg_decl(&p.ty, &p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

// ─── stubs ───────────────────────────────────────────────────────────────────

pub(crate) fn stub_declaration(method: &Method) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "quint64 {}({});", method.name, arguments(method))?;
    Ok(out)
}

/// Serializes the tag and every argument in declared order, then hands the
/// buffer to `sender`.
pub(crate) fn stub_definition(method: &Method, sender: &str, add_sources: bool) -> Result<String, fmt::Error> {
    let mut out = String::new();
    if add_sources {
        write_source(&mut out, "", method.source.as_deref())?;
    }
    writeln!(out, "quint64 CTelegramConnection::{}({})", method.name, arguments(method))?;
    writeln!(out, "{{")?;
    writeln!(out, "{INDENT}QByteArray output;")?;
    writeln!(out, "{INDENT}CTelegramStream outputStream(&output, /* write */ true);")?;
    writeln!(out)?;
    writeln!(out, "{INDENT}outputStream << TLValue::{};", method.value_name())?;
    for param in wire_params(&method.params) {
        let line = format!("outputStream << {};", param.name);
        write_gated(&mut out, INDENT, "", param, &[line])?;
    }
    writeln!(out)?;
    writeln!(out, "{INDENT}return {sender}(output);")?;
    writeln!(out, "}}")?;
    Ok(out)
}

// ─── dispatch ────────────────────────────────────────────────────────────────

fn handler_signature(method: &Method) -> String {
    format!(
        "void CTelegramConnection::{}(RpcProcessingContext *context)",
        n::handler_name(&method.name)
    )
}

pub(crate) fn process_declaration(method: &Method) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "void {}(RpcProcessingContext *context);", n::handler_name(&method.name))?;
    Ok(out)
}

pub(crate) fn switch_case(method: &Method) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "case TLValue::{}:", method.value_name())?;
    writeln!(out, "{INDENT}{}(context);", n::handler_name(&method.name))?;
    writeln!(out, "{INDENT}break;")?;
    Ok(out)
}

pub(crate) fn updates_case(method: &Method) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "case TLValue::{}:", method.value_name())?;
    Ok(out)
}

fn stub_body(method: &Method) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{{")?;
    writeln!(out, "{INDENT}qWarning() << Q_FUNC_INFO << \"is not implemented yet\";")?;
    writeln!(out, "{INDENT}{} result;", method.result)?;
    writeln!(out, "{INDENT}context->inputStream() >> result;")?;
    writeln!(out, "}}")?;
    Ok(out)
}

fn at_indent<'a>(line: &'a str, indent: &str) -> Option<&'a str> {
    line.strip_prefix(indent).map(str::trim_end)
}

/// Splits a region of function definitions into `(signature, body)` pairs.
/// A signature is a line at `indent` followed by a `{` line at `indent`; the
/// body runs to the first `}` line at `indent` and is kept byte for byte.
pub(crate) fn split_functions(text: &str, indent: &str) -> Vec<(String, String)> {
    let mut functions = Vec::new();
    let mut lines = text.split_inclusive('\n').peekable();
    while let Some(line) = lines.next() {
        let Some(head) = at_indent(line, indent) else {
            continue;
        };
        let is_signature = !head.is_empty()
            && !head.starts_with(char::is_whitespace)
            && !head.starts_with("//")
            && head != "{"
            && head != "}";
        if !is_signature || lines.peek().and_then(|l| at_indent(l, indent)) != Some("{") {
            continue;
        }
        let mut body = String::new();
        for body_line in lines.by_ref() {
            body.push_str(body_line);
            if at_indent(body_line, indent) == Some("}") {
                break;
            }
        }
        if !body.ends_with('\n') {
            body.push('\n');
        }
        functions.push((head.to_owned(), body));
    }
    functions
}

/// Handler definitions at `indent`, the marker indentation of the region.
/// A body already present in `prior` under the same signature is kept
/// verbatim; otherwise a stub reading the declared result is synthesized.
pub(crate) fn process_definitions(
    methods: &[&Method],
    prior: Option<&str>,
    indent: &str,
) -> Result<String, fmt::Error> {
    let existing = prior.map(|p| split_functions(p, indent)).unwrap_or_default();
    let mut used = HashSet::new();

    let mut blocks = Vec::with_capacity(methods.len());
    for method in methods {
        let signature = handler_signature(method);
        let body = match existing.iter().find(|(sig, _)| *sig == signature) {
            Some((sig, body)) => {
                used.insert(sig.as_str());
                body.clone()
            }
            None => indent_block(&stub_body(method)?, indent),
        };
        blocks.push(format!("{indent}{signature}\n{body}"));
    }

    for (signature, _) in &existing {
        if !used.contains(signature.as_str()) {
            log::warn!("[codegen] dropping handler no longer in the schema: {signature}");
        }
    }
    let kept = used.len();
    if kept > 0 {
        log::info!("[codegen] kept {kept} hand-written handler bodies");
    }
    Ok(join_blocks(blocks))
}

// ─── request dump ────────────────────────────────────────────────────────────

/// A `case` reading the request arguments back from `stream` and printing them.
pub(crate) fn debug_case(method: &Method) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "case TLValue::{}: {{", method.value_name())?;
    writeln!(out, "{INDENT}d << \"{}(\";", method.value_name())?;
    for param in &method.params {
        if param.is_flag_only() {
            if let Some(flag) = &param.flag {
                writeln!(
                    out,
                    "{INDENT}d << \"{}:\" << bool({} & 1 << {});",
                    param.name, flag.member, flag.bit
                )?;
            }
            continue;
        }
        writeln!(out, "{INDENT}{} {};", param.ty, param.name)?;
        let lines = [
            format!("stream >> {};", param.name),
            format!("d << \"{0}:\" << {0};", param.name),
        ];
        write_gated(&mut out, INDENT, "", param, &lines)?;
    }
    writeln!(out, "{INDENT}d << \")\";")?;
    writeln!(out, "{INDENT}break;")?;
    writeln!(out, "}}")?;
    Ok(out)
}
