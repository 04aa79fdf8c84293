use std::fmt;
use std::str::FromStr;

use crate::errors::ParamParseError;

/// The type of a definition or a parameter, e.g. `Vector<auth.Authorization>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Type {
    /// Namespace components, e.g. `["upload"]` for `upload.File`.
    pub namespace: Vec<String>,

    /// The bare type name, e.g. `"Vector"`.
    pub name: String,

    /// `true` when the first letter of the name is lowercase (bare type).
    pub bare: bool,

    /// The generic argument, e.g. `long` in `Vector<long>`.
    pub generic_arg: Option<Box<Type>>,
}

impl Type {
    /// `namespace.name`, without the generic argument.
    pub fn full_name(&self) -> String {
        let mut s = String::new();
        for ns in &self.namespace {
            s.push_str(ns);
            s.push('.');
        }
        s.push_str(&self.name);
        s
    }

    /// `true` for both the boxed `Vector` and the bare `vector`.
    pub fn is_vector(&self) -> bool {
        self.namespace.is_empty() && self.name.eq_ignore_ascii_case("vector")
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())?;
        if let Some(arg) = &self.generic_arg {
            write!(f, "<{arg}>")?;
        }
        Ok(())
    }
}

impl FromStr for Type {
    type Err = ParamParseError;

    /// Parses a TL type expression such as `Vector<long>` or `auth.SentCode`.
    ///
    /// # Examples
    /// ```
    /// use generatorng_tl_parser::tl::Type;
    /// assert!("Vector<long>".parse::<Type>().is_ok());
    /// assert!("Vector<long".parse::<Type>().is_err());
    /// ```
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        // Generic references only occur on template lines, which are never
        // parsed param by param.
        if raw.starts_with('!') {
            return Err(ParamParseError::InvalidGeneric);
        }

        let (name_part, generic_arg) = match raw.split_once('<') {
            Some((name, rest)) => match rest.strip_suffix('>') {
                Some(arg) => (name, Some(Box::new(Type::from_str(arg)?))),
                None => return Err(ParamParseError::InvalidGeneric),
            },
            None => (raw, None),
        };

        let (namespace, name) = match name_part.rsplit_once('.') {
            Some((ns_part, n)) => (
                ns_part.split('.').map(String::from).collect::<Vec<_>>(),
                n,
            ),
            None => (Vec::new(), name_part),
        };

        if namespace.iter().any(|p| p.is_empty()) {
            return Err(ParamParseError::Empty);
        }

        let first = name.chars().next().ok_or(ParamParseError::Empty)?;

        Ok(Self {
            namespace,
            name: name.to_owned(),
            bare: first.is_ascii_lowercase(),
            generic_arg,
        })
    }
}
