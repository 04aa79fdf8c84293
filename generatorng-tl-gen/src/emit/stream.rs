//! `CTelegramStream` operators and explicit vector instantiations.

use std::fmt::{self, Write};

use super::{INDENT, wire_params, write_gated};
use crate::model::Type;
use crate::namegen as n;

/// Which direction an operator moves data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Read,
    Write,
}

impl Direction {
    fn operator(self) -> &'static str {
        match self {
            Direction::Read => ">>",
            Direction::Write => "<<",
        }
    }

    fn argument(self, ty: &str, name: &str) -> String {
        match self {
            Direction::Read => format!("{ty} &{name}"),
            Direction::Write => format!("const {ty} &{name}"),
        }
    }
}

/// `CTelegramStream &operator>>(TLX &xValue);`
pub(crate) fn declaration(ty: &Type, direction: Direction) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "CTelegramStream &operator{}({});",
        direction.operator(),
        direction.argument(&ty.name, &n::value_var(&ty.name))
    )?;
    Ok(out)
}

/// The operator body: the tag, then a switch over constructors streaming
/// every wire field in declared order.
pub(crate) fn definition(ty: &Type, direction: Direction) -> Result<String, fmt::Error> {
    let var = n::value_var(&ty.name);
    let op = direction.operator();
    let owner = match direction {
        Direction::Read => "result.".to_owned(),
        Direction::Write => format!("{var}."),
    };

    let mut out = String::new();
    writeln!(
        out,
        "CTelegramStream &CTelegramStream::operator{op}({})",
        direction.argument(&ty.name, &var)
    )?;
    writeln!(out, "{{")?;
    if direction == Direction::Read {
        writeln!(out, "{INDENT}{} result;", ty.name)?;
        writeln!(out)?;
    }
    writeln!(out, "{INDENT}*this {op} {owner}tlType;")?;

    let with_fields: Vec<_> = ty
        .constructors
        .iter()
        .filter(|c| wire_params(&c.params).next().is_some())
        .collect();
    if !with_fields.is_empty() {
        writeln!(out)?;
        writeln!(out, "{INDENT}switch ({owner}tlType) {{")?;
        for constructor in with_fields {
            writeln!(out, "{INDENT}case TLValue::{}:", constructor.value_name())?;
            for param in wire_params(&constructor.params) {
                let line = format!("*this {op} {owner}{};", param.name);
                write_gated(&mut out, &format!("{INDENT}{INDENT}"), &owner, param, &[line])?;
            }
            writeln!(out, "{INDENT}{INDENT}break;")?;
        }
        writeln!(out, "{INDENT}default:")?;
        writeln!(out, "{INDENT}{INDENT}break;")?;
        writeln!(out, "{INDENT}}}")?;
    }

    writeln!(out)?;
    if direction == Direction::Read {
        writeln!(out, "{INDENT}{var} = result;")?;
        writeln!(out)?;
    }
    writeln!(out, "{INDENT}return *this;")?;
    writeln!(out, "}}")?;
    Ok(out)
}

/// `template CTelegramStream &CTelegramStream::operator>>(TLVector<T> &v);`
pub(crate) fn vector_template(vector: &str, direction: Direction) -> String {
    format!(
        "template CTelegramStream &CTelegramStream::operator{}({});",
        direction.operator(),
        direction.argument(vector, "v")
    )
}

/// Keeps the prior order of lines still wanted, then appends new ones in
/// the order given.
pub(crate) fn merge_lines(prior: Option<&str>, wanted: &[String]) -> String {
    let mut lines: Vec<&str> = Vec::with_capacity(wanted.len());
    let mut prior_count = 0;
    if let Some(prior) = prior {
        for line in prior.lines().map(str::trim).filter(|l| !l.is_empty()) {
            prior_count += 1;
            if wanted.iter().any(|w| w == line) && !lines.contains(&line) {
                lines.push(line);
            }
        }
    }
    let dropped = prior_count - lines.len().min(prior_count);
    if dropped > 0 {
        log::debug!("[codegen] {dropped} instantiations no longer used");
    }
    for line in wanted {
        if !lines.contains(&line.as_str()) {
            lines.push(line);
        }
    }

    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}
