//! `QDebug` printers for generated types.

use std::fmt::{self, Write};

use super::{INDENT, write_gated};
use crate::model::Type;

pub(crate) fn declaration(ty: &Type) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "QDebug operator<<(QDebug d, const {} &type);", ty.name)?;
    Ok(out)
}

/// Same traversal as the stream operators, printing `name:value` pairs.
/// Flag-only fields print their accessor.
pub(crate) fn definition(ty: &Type) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "QDebug operator<<(QDebug d, const {} &type)", ty.name)?;
    writeln!(out, "{{")?;
    writeln!(out, "{INDENT}d << \"{}(\" << type.tlType << \") {{\";", ty.name)?;

    let with_fields: Vec<_> = ty.constructors.iter().filter(|c| !c.params.is_empty()).collect();
    if !with_fields.is_empty() {
        writeln!(out, "{INDENT}switch (type.tlType) {{")?;
        for constructor in with_fields {
            writeln!(out, "{INDENT}case TLValue::{}:", constructor.value_name())?;
            for param in &constructor.params {
                if param.is_flag_only() {
                    writeln!(out, "{INDENT}{INDENT}d << \"{0}:\" << type.{0}();", param.name)?;
                    continue;
                }
                let line = format!("d << \"{0}:\" << type.{0};", param.name);
                write_gated(&mut out, &format!("{INDENT}{INDENT}"), "type.", param, &[line])?;
            }
            writeln!(out, "{INDENT}{INDENT}break;")?;
        }
        writeln!(out, "{INDENT}default:")?;
        writeln!(out, "{INDENT}{INDENT}break;")?;
        writeln!(out, "{INDENT}}}")?;
    }

    writeln!(out, "{INDENT}d << \"}}\";")?;
    writeln!(out)?;
    writeln!(out, "{INDENT}return d;")?;
    writeln!(out, "}}")?;
    Ok(out)
}
