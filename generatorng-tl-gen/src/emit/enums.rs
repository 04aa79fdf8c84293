//! `TLValue` enum constants.

use std::fmt::{self, Write};

use super::{join_blocks, write_source};
use crate::model::GroupEntry;

/// One constant per entry, `Name = 0x%08x,`, blocks separated by a blank line.
pub(crate) fn values(blocks: &[Vec<&GroupEntry>], add_sources: bool) -> Result<String, fmt::Error> {
    let mut rendered = Vec::with_capacity(blocks.len());
    for block in blocks {
        let mut out = String::new();
        for entry in block {
            if add_sources {
                write_source(&mut out, "", entry.source.as_deref())?;
            }
            writeln!(out, "{} = {:#010x},", entry.value_name, entry.id)?;
        }
        rendered.push(out);
    }
    Ok(join_blocks(rendered))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, id: u32, source: Option<&str>) -> GroupEntry {
        GroupEntry { value_name: name.into(), id, source: source.map(Into::into) }
    }

    #[test]
    fn ids_are_verbatim_and_padded() {
        let a = entry("BoolFalse", 0xbc799737, None);
        let b = entry("Vector", 0x1cb5c415, None);
        let c = entry("Ok", 0x1, None);
        let out = values(&[vec![&a], vec![&b, &c]], false).unwrap();
        assert_eq!(out, "BoolFalse = 0xbc799737,\n\nVector = 0x1cb5c415,\nOk = 0x00000001,\n");
    }

    #[test]
    fn sources_as_comments() {
        let a = entry("BoolFalse", 0xbc799737, Some("boolFalse#bc799737 = Bool;"));
        let out = values(&[vec![&a]], true).unwrap();
        assert_eq!(out, "// boolFalse#bc799737 = Bool;\nBoolFalse = 0xbc799737,\n");
    }
}
