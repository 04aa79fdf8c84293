use std::fmt;
use std::str::FromStr;

use crate::errors::{ParamParseError, ParseError};
use crate::tl::{Category, Parameter, ParameterType, Type};
use crate::utils::tl_id;

/// A single TL definition: either a constructor or a method.
///
/// For example:
/// ```text
/// user#12345 id:long first_name:string = User;
/// ```
/// becomes a `Definition` with `name = "user"`, `id = 0x12345`,
/// `params = [id:long, first_name:string]` and `ty = User`.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    /// Namespace parts.  Empty when the definition is in the global namespace.
    pub namespace: Vec<String>,

    /// The constructor/method name without namespace (e.g. `"sendCode"`).
    pub name: String,

    /// 32-bit predicate id, parsed verbatim from `#XXXXXXXX` or CRC32-derived.
    pub id: u32,

    /// Ordered list of parameters. The order is the wire order.
    pub params: Vec<Parameter>,

    /// The boxed type this definition belongs to (e.g. `User`).
    pub ty: Type,

    /// Whether this is a data constructor or an RPC method.
    pub category: Category,

    /// `true` for `{X:Type}` template lines, whose params are not modelled.
    pub template: bool,

    /// The schema text this definition was read from, when it came from text.
    pub source: Option<String>,
}

impl Definition {
    /// Returns `namespace.name` joined with dots.
    pub fn full_name(&self) -> String {
        let cap = self.namespace.iter().map(|ns| ns.len() + 1).sum::<usize>() + self.name.len();
        let mut s = String::with_capacity(cap);
        for ns in &self.namespace {
            s.push_str(ns);
            s.push('.');
        }
        s.push_str(&self.name);
        s
    }

    /// Splits `ns.name` into its namespace parts and bare name.
    pub(crate) fn split_name(full_name: &str) -> Result<(Vec<String>, String), ParseError> {
        let (namespace, name) = match full_name.rsplit_once('.') {
            Some((ns_part, n)) => (ns_part.split('.').map(String::from).collect::<Vec<_>>(), n),
            None => (Vec::new(), full_name),
        };

        if namespace.iter().any(|p| p.is_empty()) || name.is_empty() {
            return Err(ParseError::MissingName);
        }
        Ok((namespace, name.to_owned()))
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:08x}", self.full_name(), self.id)?;
        for p in &self.params {
            write!(f, " {p}")?;
        }
        write!(f, " = {};", self.ty)
    }
}

/// Reads the leading hex digits of an `#id`; anything after them is an
/// annotation and is ignored.
fn parse_hex_id(text: &str) -> Result<u32, ParseError> {
    let text = text.trim();
    let end = text
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(text.len());
    if end < text.len() {
        log::debug!("[parser] ignoring annotation `{}` after id", &text[end..]);
    }
    u32::from_str_radix(&text[..end], 16).map_err(ParseError::InvalidId)
}

impl FromStr for Definition {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim().trim_end_matches(';').trim();
        if raw.is_empty() {
            return Err(ParseError::Empty);
        }

        let (lhs, rhs) = raw.split_once('=').ok_or(ParseError::MissingType)?;
        let lhs = lhs.trim();
        let rhs = rhs.trim();
        let template = lhs.contains('{');

        // `Vector t` on a template line: only the first word names the type.
        let ty_str = if template {
            rhs.split_whitespace().next().unwrap_or("")
        } else {
            rhs
        };
        if ty_str.is_empty() {
            return Err(ParseError::MissingType);
        }
        let ty = Type::from_str(ty_str).map_err(|_| ParseError::MissingType)?;

        let (head, rest) = match lhs.split_once(char::is_whitespace) {
            Some((h, r)) => (h.trim_end(), r.trim_start()),
            None => (lhs, ""),
        };

        let (full_name, explicit_id) = match head.split_once('#') {
            Some((n, id)) => (n, Some(id)),
            None => (head, None),
        };
        let (namespace, name) = Definition::split_name(full_name)?;

        let id = match explicit_id {
            Some(hex) => parse_hex_id(hex)?,
            None => tl_id(&format!("{full_name} {rest} = {rhs}")),
        };

        let params = if template {
            log::debug!("[parser] template definition `{full_name}`: params not modelled");
            Vec::new()
        } else {
            parse_params(rest)?
        };

        Ok(Definition {
            namespace,
            name,
            id,
            params,
            ty,
            category: Category::Types, // caller sets the real category
            template,
            source: None,
        })
    }
}

fn parse_params(rest: &str) -> Result<Vec<Parameter>, ParseError> {
    let mut flag_fields: Vec<&str> = Vec::new();
    let mut params = Vec::new();

    for token in rest.split_whitespace() {
        let param = Parameter::from_str(token).map_err(ParseError::InvalidParam)?;
        match &param.ty {
            ParameterType::Flags => flag_fields.push(token.trim_end_matches(":#")),
            ParameterType::Normal { flag: Some(flag), .. } => {
                if !flag_fields.contains(&flag.name.as_str()) {
                    return Err(ParseError::InvalidParam(ParamParseError::MissingFlagField {
                        name: flag.name.clone(),
                    }));
                }
            }
            ParameterType::Normal { flag: None, .. } => {}
        }
        params.push(param);
    }

    Ok(params)
}
