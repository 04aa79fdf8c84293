//! Tagged-union structs for `TLTypes.hpp`.

use std::collections::BTreeSet;
use std::fmt::{self, Write};

use super::{INDENT, write_source};
use crate::model::{Flag, Param, Type};
use crate::namegen as n;

/// `struct TLX;` for every indirection target, so `TLPtr<TLX>` members can be
/// declared before `TLX` is complete.
pub(crate) fn forward_declarations<'a>(types: impl IntoIterator<Item = &'a Type>) -> Result<String, fmt::Error> {
    let mut targets = BTreeSet::new();
    for param in types.into_iter().flat_map(|t| &t.constructors).flat_map(|c| &c.params) {
        if let (base, true) = n::base_type(&param.ty) {
            targets.insert(base);
        }
    }
    let mut out = String::new();
    for target in targets {
        writeln!(out, "struct {target};")?;
    }
    Ok(out)
}

/// Members in first-occurrence order. Baking guarantees one type per name.
fn members(ty: &Type) -> Vec<&Param> {
    let mut seen = BTreeSet::new();
    ty.constructors
        .iter()
        .flat_map(|c| &c.params)
        .filter(|p| !p.is_flag_only() && seen.insert(p.name.as_str()))
        .collect()
}

/// Flag-only accessors: name → (constructor value, gate) for every
/// constructor declaring it.
fn accessors(ty: &Type) -> Vec<(&str, Vec<(String, &Flag)>)> {
    let mut out: Vec<(&str, Vec<(String, &Flag)>)> = Vec::new();
    for constructor in &ty.constructors {
        for param in constructor.params.iter().filter(|p| p.is_flag_only()) {
            let Some(flag) = &param.flag else { continue };
            let entry = (constructor.value_name(), flag);
            match out.iter_mut().find(|(name, _)| *name == param.name) {
                Some((_, gates)) => gates.push(entry),
                None => out.push((&param.name, vec![entry])),
            }
        }
    }
    out
}

fn write_accessor(out: &mut String, name: &str, gates: &[(String, &Flag)]) -> fmt::Result {
    let first = gates[0].1;
    if gates.iter().all(|(_, flag)| *flag == first) {
        return writeln!(out, "{INDENT}bool {name}() const {{ return {} & 1 << {}; }}", first.member, first.bit);
    }
    writeln!(out, "{INDENT}bool {name}() const {{")?;
    writeln!(out, "{INDENT}{INDENT}switch (tlType) {{")?;
    for (value, flag) in gates {
        writeln!(out, "{INDENT}{INDENT}case TLValue::{value}:")?;
        writeln!(out, "{INDENT}{INDENT}{INDENT}return {} & 1 << {};", flag.member, flag.bit)?;
    }
    writeln!(out, "{INDENT}{INDENT}default:")?;
    writeln!(out, "{INDENT}{INDENT}{INDENT}return false;")?;
    writeln!(out, "{INDENT}{INDENT}}}")?;
    writeln!(out, "{INDENT}}}")
}

/// The struct for one type. Default state is the first constructor's tag
/// with every arithmetic member zeroed.
pub(crate) fn struct_def(ty: &Type, add_sources: bool) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let Some(first) = ty.constructors.first() else {
        return Ok(out);
    };
    let members = members(ty);

    if add_sources {
        for constructor in &ty.constructors {
            write_source(&mut out, "", constructor.source.as_deref())?;
        }
    }
    writeln!(out, "struct {} {{", ty.name)?;
    writeln!(out, "{INDENT}{}() :", ty.name)?;
    for member in &members {
        if let Some(zero) = n::zero_value(&member.ty) {
            writeln!(out, "{INDENT}{INDENT}{}({zero}),", member.name)?;
        }
    }
    writeln!(out, "{INDENT}{INDENT}tlType(TLValue::{}) {{ }}", first.value_name())?;
    writeln!(out)?;

    writeln!(out, "{INDENT}bool isValid() const {{ return hasType(tlType); }}")?;
    writeln!(out, "{INDENT}static bool hasType(const quint32 value) {{")?;
    writeln!(out, "{INDENT}{INDENT}switch (value) {{")?;
    for constructor in &ty.constructors {
        writeln!(out, "{INDENT}{INDENT}case TLValue::{}:", constructor.value_name())?;
    }
    writeln!(out, "{INDENT}{INDENT}{INDENT}return true;")?;
    writeln!(out, "{INDENT}{INDENT}default:")?;
    writeln!(out, "{INDENT}{INDENT}{INDENT}return false;")?;
    writeln!(out, "{INDENT}{INDENT}}}")?;
    writeln!(out, "{INDENT}}}")?;

    for (name, gates) in accessors(ty) {
        write_accessor(&mut out, name, &gates)?;
    }
    for member in &members {
        writeln!(out, "{INDENT}{} {};", member.ty, member.name)?;
    }
    writeln!(out, "{INDENT}TLValue tlType;")?;
    writeln!(out, "}};")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SchemaModel;
    use generatorng_tl_parser::parse_tl_schema;

    fn model(src: &str) -> SchemaModel {
        let mut m = SchemaModel::from_definitions(&parse_tl_schema(src).unwrap());
        crate::bake::bake(&mut m);
        m
    }

    #[test]
    fn struct_layout() {
        let m = model(
            "inputPeerEmpty#7f3b18ea = InputPeer;
             inputPeerChat#35a95cb9 chat_id:long = InputPeer;
             inputPeerUser#7b8e7de6 user_id:long access_hash:long title:string = InputPeer;",
        );
        let out = struct_def(m.type_by_name("TLInputPeer").unwrap(), false).unwrap();
        assert_eq!(
            out,
            "struct TLInputPeer {
    TLInputPeer() :
        chatId(0),
        userId(0),
        accessHash(0),
        tlType(TLValue::InputPeerEmpty) { }

    bool isValid() const { return hasType(tlType); }
    static bool hasType(const quint32 value) {
        switch (value) {
        case TLValue::InputPeerEmpty:
        case TLValue::InputPeerChat:
        case TLValue::InputPeerUser:
            return true;
        default:
            return false;
        }
    }
    quint64 chatId;
    quint64 userId;
    quint64 accessHash;
    QString title;
    TLValue tlType;
};
"
        );
    }

    #[test]
    fn flag_only_accessors() {
        let m = model(
            "a#1 flags:# pinned:flags.0?true = T;
             b#2 flags:# pinned:flags.0?true = T;
             u#3 flags:# self:flags.1?true = U;
             v#4 flags:# self:flags.2?true = U;",
        );
        let t = struct_def(m.type_by_name("TLT").unwrap(), false).unwrap();
        assert!(t.contains("    bool pinned() const { return flags & 1 << 0; }\n"));
        assert!(!t.contains("bool pinned;"));

        let u = struct_def(m.type_by_name("TLU").unwrap(), false).unwrap();
        assert!(u.contains("        case TLValue::U:\n            return flags & 1 << 1;\n"));
        assert!(u.contains("        case TLValue::V:\n            return flags & 1 << 2;\n"));
    }

    #[test]
    fn forward_declares_indirections() {
        let mut m = SchemaModel::from_definitions(
            &parse_tl_schema("pageBlockList#1 items:Vector<PageBlock> = PageBlock;").unwrap(),
        );
        m.apply_indirections(&[("PageBlock".into(), "PageBlock".into())]);
        assert_eq!(forward_declarations(m.types()).unwrap(), "struct TLPageBlock;\n");
    }
}
