//! Functions that turn TL names into C++ identifiers and target types.

use generatorng_tl_parser::tl::Type;

// ─── primitive → target type ─────────────────────────────────────────────────

/// TL primitive → C++ type. `true` only ever appears behind a flag gate.
const PRIMITIVES: &[(&str, &str)] = &[
    ("Bool",   "bool"),
    ("true",   "bool"),
    ("#",      "quint32"),
    ("int",    "quint32"),
    ("long",   "quint64"),
    ("double", "double"),
    ("string", "QString"),
    ("bytes",  "QByteArray"),
    ("int128", "TLNumber128"),
    ("int256", "TLNumber256"),
];

/// Target types that are never generated and are always "solved".
pub const BUILTIN_TYPES: &[&str] = &[
    "bool",
    "quint32",
    "quint64",
    "double",
    "QString",
    "QByteArray",
    "TLNumber128",
    "TLNumber256",
    "TLVector",
];

pub(crate) const VECTOR: &str = "TLVector";
pub(crate) const POINTER: &str = "TLPtr";
pub(crate) const TYPE_PREFIX: &str = "TL";

/// Member names that would collide with C++ keywords.
const RESERVED: &[(&str, &str)] = &[
    ("long",      "longitude"),
    ("lat",       "latitude"),
    ("default",   "isDefault"),
    ("private",   "isPrivate"),
    ("public",    "isPublic"),
    ("delete",    "deleteValue"),
    ("new",       "isNew"),
    ("static",    "isStatic"),
    ("final",     "isFinal"),
    ("short",     "isShort"),
    ("signed",    "isSigned"),
    ("unsigned",  "isUnsigned"),
    ("class",     "classValue"),
    ("template",  "templateValue"),
    ("namespace", "namespaceValue"),
    ("register",  "registerValue"),
    ("this",      "thisValue"),
];

/// Map a TL primitive name to its target type, if it is one.
pub fn primitive_type(tl_name: &str) -> Option<&'static str> {
    PRIMITIVES
        .iter()
        .find(|(tl, _)| *tl == tl_name)
        .map(|(_, target)| *target)
}

/// `true` for primitives plus the bare vector template itself.
pub fn is_builtin(target: &str) -> bool {
    BUILTIN_TYPES.contains(&target)
}

/// Arithmetic primitives are passed by value and zeroed in constructors.
pub(crate) fn zero_value(target: &str) -> Option<&'static str> {
    match target {
        "bool" => Some("false"),
        "quint32" | "quint64" | "double" => Some("0"),
        _ => None,
    }
}

// ─── case conversion ─────────────────────────────────────────────────────────

/// Converts `auth.sendCode` or `phone_number` into `AuthSendCode` /
/// `PhoneNumber`. Existing capitals are kept.
pub fn to_pascal(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut next_upper = true;

    for ch in name.chars() {
        if ch == '_' || ch == '.' {
            next_upper = true;
            continue;
        }
        if next_upper {
            out.push(ch.to_ascii_uppercase());
            next_upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Same as [`to_pascal`] with a lowercase first letter.
pub fn to_camel(name: &str) -> String {
    let pascal = to_pascal(name);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => pascal,
    }
}

/// Uppercases the first letter only.
pub(crate) fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Splits a PascalCase identifier into words: `UserProfilePhoto` →
/// `["User", "Profile", "Photo"]`. Digits stay with the preceding word.
pub(crate) fn split_words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    for (i, ch) in name.char_indices().skip(1) {
        if ch.is_ascii_uppercase() {
            words.push(&name[start..i]);
            start = i;
        }
    }
    if start < name.len() {
        words.push(&name[start..]);
    }
    words
}

// ─── member / entity names ───────────────────────────────────────────────────

/// The C++ member or argument name of a TL parameter.
pub fn member_name(tl_name: &str) -> String {
    let camel = to_camel(tl_name);
    match RESERVED.iter().find(|(word, _)| *word == camel) {
        Some((_, synonym)) => (*synonym).to_owned(),
        None => camel,
    }
}

/// Formatted constructor / method name: `auth.sendCode` → `authSendCode`.
pub fn entity_name(full_name: &str) -> String {
    to_camel(full_name)
}

/// The `TLValue` constant for a formatted entity name.
pub fn value_name(entity: &str) -> String {
    upper_first(entity)
}

/// The dispatch handler for a formatted method name.
pub fn handler_name(method: &str) -> String {
    format!("process{}", upper_first(method))
}

// ─── target types ────────────────────────────────────────────────────────────

/// The C++ type a TL type maps to, e.g. `TLVector<TLUser>` or `quint64`.
pub fn target_type(ty: &Type) -> String {
    if ty.is_vector() {
        return match &ty.generic_arg {
            Some(arg) => format!("{VECTOR}<{}>", target_type(arg)),
            None => VECTOR.to_owned(),
        };
    }
    let full = ty.full_name();
    match primitive_type(&full) {
        Some(p) => p.to_owned(),
        None => format!("{TYPE_PREFIX}{}", to_pascal(&full)),
    }
}

fn unwrap_template<'a>(ty: &'a str, template: &str) -> Option<&'a str> {
    ty.strip_prefix(template)?
        .strip_prefix('<')?
        .strip_suffix('>')
}

/// `TLVector<T>` → `T`.
pub fn vector_inner(ty: &str) -> Option<&str> {
    unwrap_template(ty, VECTOR)
}

/// `TLPtr<T>` → `T`.
pub fn pointer_inner(ty: &str) -> Option<&str> {
    unwrap_template(ty, POINTER)
}

/// The aggregated type behind any number of vectors, and whether a `TLPtr`
/// indirection was crossed on the way.
pub fn base_type(ty: &str) -> (&str, bool) {
    let mut current = ty;
    let mut indirect = false;
    loop {
        if let Some(inner) = vector_inner(current) {
            current = inner;
        } else if let Some(inner) = pointer_inner(current) {
            current = inner;
            indirect = true;
        } else {
            return (current, indirect);
        }
    }
}

/// `TLInputPeer` → `InputPeer`.
pub(crate) fn unprefixed(ty: &str) -> &str {
    ty.strip_prefix(TYPE_PREFIX).unwrap_or(ty)
}

/// Local variable name for a value of a generated type: `inputPeerValue`.
pub(crate) fn value_var(ty: &str) -> String {
    format!("{}Value", to_camel(unprefixed(ty)))
}

/// C++ argument declaration for a target type.
pub(crate) fn arg_decl(ty: &str, name: &str) -> String {
    if zero_value(ty).is_some() {
        format!("{ty} {name}")
    } else {
        format!("const {ty} &{name}")
    }
}

/// The part appended to a field name to disambiguate it by type: every word
/// of the type minus the `TL` prefix and minus words equal to the field name.
pub(crate) fn type_suffix(ty: &str, field: &str) -> String {
    let mut out = String::new();
    for part in ty.split(|c: char| !c.is_ascii_alphanumeric()).filter(|s| !s.is_empty()) {
        let part = to_pascal(part.strip_prefix(TYPE_PREFIX).unwrap_or(part));
        for word in split_words(&part) {
            if !word.eq_ignore_ascii_case(field) {
                out.push_str(word);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_basic() {
        assert_eq!(to_pascal("user_empty"), "UserEmpty");
        assert_eq!(to_pascal("inputPeerSelf"), "InputPeerSelf");
        assert_eq!(to_pascal("auth.sendCode"), "AuthSendCode");
        assert_eq!(to_pascal("messages.getDHConfig"), "MessagesGetDHConfig");
    }

    #[test]
    fn camel_members() {
        assert_eq!(member_name("phone_number"), "phoneNumber");
        assert_eq!(member_name("api_id"), "apiId");
        assert_eq!(member_name("long"), "longitude");
        assert_eq!(member_name("default"), "isDefault");
    }

    #[test]
    fn target_types() {
        let t = |s: &str| target_type(&s.parse().unwrap());
        assert_eq!(t("int"), "quint32");
        assert_eq!(t("Bool"), "bool");
        assert_eq!(t("auth.SentCode"), "TLAuthSentCode");
        assert_eq!(t("Vector<long>"), "TLVector<quint64>");
        assert_eq!(t("vector<User>"), "TLVector<TLUser>");
        assert_eq!(t("Vector<Vector<int>>"), "TLVector<TLVector<quint32>>");
    }

    #[test]
    fn base_types() {
        assert_eq!(base_type("TLVector<TLVector<TLUser>>"), ("TLUser", false));
        assert_eq!(base_type("TLVector<TLPtr<TLRichText>>"), ("TLRichText", true));
        assert_eq!(base_type("quint32"), ("quint32", false));
    }

    #[test]
    fn suffixes() {
        assert_eq!(type_suffix("quint32", "id"), "Quint32");
        assert_eq!(type_suffix("TLVector<TLPhoto>", "photo"), "Vector");
        assert_eq!(type_suffix("TLUserProfilePhoto", "photo"), "UserProfile");
    }

    #[test]
    fn args() {
        assert_eq!(arg_decl("quint32", "apiId"), "quint32 apiId");
        assert_eq!(arg_decl("QString", "apiHash"), "const QString &apiHash");
    }
}
