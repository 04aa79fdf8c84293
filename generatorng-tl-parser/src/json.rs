//! The JSON front end: `{ "constructors": [...], "methods": [...] }`.
//!
//! This dialect has no conditional-field syntax; every parameter is read as
//! unconditional and a `?` inside a parameter type is rejected.

use serde::Deserialize;

use crate::errors::{ParamParseError, ParseError, SchemaError};
use crate::tl::{Category, Definition, Parameter, ParameterType, Type};

#[derive(Deserialize)]
struct JsonSchema {
    #[serde(default)]
    constructors: Vec<JsonConstructor>,
    #[serde(default)]
    methods: Vec<JsonMethod>,
}

#[derive(Deserialize)]
struct JsonConstructor {
    id: JsonId,
    predicate: String,
    #[serde(default)]
    params: Vec<JsonParam>,
    #[serde(rename = "type")]
    ty: String,
}

#[derive(Deserialize)]
struct JsonMethod {
    id: JsonId,
    method: String,
    #[serde(default)]
    params: Vec<JsonParam>,
    #[serde(rename = "type")]
    ty: String,
}

#[derive(Deserialize)]
struct JsonParam {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

/// An id as written in the document: a string or a bare JSON number.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonId {
    Text(String),
    Number(i64),
}

/// How the string ids of one document are spelled.
///
/// Hand-written schemas use hex (`"bc799737"`, optional `0x`); Telegram's own
/// dump uses signed decimal (`"-1132882121"`, `"481674261"`). The spelling is
/// decided once per document: a `0x` prefix or a hex letter means hex, a
/// leading `-` or more than eight digits means decimal, and a document with
/// neither is read as hex. Bare JSON numbers are always decimal.
#[derive(Clone, Copy, Debug, PartialEq)]
enum IdSpelling {
    Hex,
    Decimal,
}

impl IdSpelling {
    fn of(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.starts_with("0x") || s.starts_with("0X") || s.bytes().any(|b| b.is_ascii_alphabetic()) {
            Some(Self::Hex)
        } else if s.starts_with('-') || s.len() > 8 {
            Some(Self::Decimal)
        } else {
            None
        }
    }

    fn detect<'a>(ids: impl IntoIterator<Item = (&'a str, &'a JsonId)>) -> Result<Self, SchemaError> {
        let mut seen: Option<(Self, &str)> = None;
        for (name, id) in ids {
            let JsonId::Text(text) = id else { continue };
            let Some(spelling) = Self::of(text) else { continue };
            match seen {
                None => seen = Some((spelling, name)),
                Some((first, first_name)) if first != spelling => {
                    return Err(SchemaError::MixedIds {
                        first: first_name.to_owned(),
                        second: name.to_owned(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(seen.map_or(Self::Hex, |(spelling, _)| spelling))
    }
}

impl JsonId {
    fn value(&self, spelling: IdSpelling) -> Result<u32, ParseError> {
        match self {
            Self::Number(n) => i32::try_from(*n)
                .map(|n| n as u32)
                .or_else(|_| u32::try_from(*n))
                .map_err(|_| ParseError::IdOutOfRange(*n)),
            Self::Text(s) => {
                let s = s.trim();
                match spelling {
                    IdSpelling::Decimal => s
                        .parse::<i32>()
                        .map(|n| n as u32)
                        .or_else(|_| s.parse::<u32>())
                        .map_err(ParseError::InvalidId),
                    IdSpelling::Hex => {
                        let hex = s.trim_start_matches("0x").trim_start_matches("0X");
                        u32::from_str_radix(hex, 16).map_err(ParseError::InvalidId)
                    }
                }
            }
        }
    }
}

fn to_definition(
    name: &str,
    id: &JsonId,
    spelling: IdSpelling,
    params: &[JsonParam],
    ty: &str,
    category: Category,
) -> Result<Definition, ParseError> {
    let (namespace, bare_name) = Definition::split_name(name)?;

    // `Vector t` style result types keep only their first word.
    let ty_str = ty.split_whitespace().next().ok_or(ParseError::MissingType)?;
    let ty = ty_str.parse::<Type>().map_err(|_| ParseError::MissingType)?;

    let template = params.iter().any(|p| p.ty.starts_with('!'));
    let params = if template {
        log::debug!("[parser] template definition `{name}`: params not modelled");
        Vec::new()
    } else {
        params
            .iter()
            .map(|p| {
                if p.name.is_empty() {
                    return Err(ParamParseError::Empty);
                }
                Ok(Parameter {
                    name: p.name.clone(),
                    ty: ParameterType::unconditional(&p.ty)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(ParseError::InvalidParam)?
    };

    let mut def = Definition {
        namespace,
        name: bare_name,
        id: id.value(spelling)?,
        params,
        ty,
        category,
        template,
        source: None,
    };
    def.source = Some(def.to_string());
    Ok(def)
}

/// Parses a JSON schema document into definitions, constructors first.
pub fn parse_json_schema(bytes: &[u8]) -> Result<Vec<Definition>, SchemaError> {
    let schema: JsonSchema = serde_json::from_slice(bytes)?;
    let spelling = IdSpelling::detect(
        schema
            .constructors
            .iter()
            .map(|c| (c.predicate.as_str(), &c.id))
            .chain(schema.methods.iter().map(|m| (m.method.as_str(), &m.id))),
    )?;
    log::debug!("[parser] JSON ids spelled as {spelling:?}");

    let invalid = |name: &str| {
        let name = name.to_owned();
        move |error: ParseError| SchemaError::InvalidEntry { name, error }
    };

    let mut defs = Vec::with_capacity(schema.constructors.len() + schema.methods.len());
    for c in &schema.constructors {
        defs.push(
            to_definition(&c.predicate, &c.id, spelling, &c.params, &c.ty, Category::Types)
                .map_err(invalid(&c.predicate))?,
        );
    }
    for m in &schema.methods {
        defs.push(
            to_definition(&m.method, &m.id, spelling, &m.params, &m.ty, Category::Functions)
                .map_err(invalid(&m.method))?,
        );
    }

    log::info!(
        "[parser] JSON schema: {} constructors, {} methods",
        schema.constructors.len(),
        schema.methods.len()
    );
    Ok(defs)
}

/// Re-serializes a JSON schema document with stable pretty formatting.
pub fn format_json_schema(bytes: &[u8]) -> Result<String, SchemaError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let mut out = serde_json::to_string_pretty(&value)?;
    out.push('\n');
    Ok(out)
}
