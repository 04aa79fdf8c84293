use std::fmt;
use std::str::FromStr;

use crate::errors::ParamParseError;
use crate::tl::{Flag, Type};

/// The kind of a single TL parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// A flags field (`name:#`), a raw 32-bit word whose bits gate later fields.
    Flags,

    /// A regular typed parameter, optionally guarded by a flag bit.
    Normal {
        /// The TL type of the value.
        ty: Type,
        /// If `Some`, this parameter only exists on the wire when the bit is set.
        flag: Option<Flag>,
    },
}

impl ParameterType {
    /// Parses a type that must not carry a flag gate.
    pub fn unconditional(s: &str) -> Result<Self, ParamParseError> {
        if s.contains('?') {
            return Err(ParamParseError::UnexpectedFlag);
        }
        s.parse()
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flags => write!(f, "#"),
            Self::Normal { ty, flag } => {
                if let Some(fl) = flag {
                    write!(f, "{}.{}?", fl.name, fl.index)?;
                }
                write!(f, "{ty}")
            }
        }
    }
}

impl FromStr for ParameterType {
    type Err = ParamParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "#" {
            return Ok(Self::Flags);
        }

        // `flagsField.N?realType`
        if let Some((flag_part, ty_part)) = s.split_once('?') {
            let (flag_name, flag_idx) = flag_part
                .split_once('.')
                .ok_or(ParamParseError::InvalidFlag)?;

            if flag_name.is_empty() || flag_idx.is_empty() {
                return Err(ParamParseError::InvalidFlag);
            }

            let index = flag_idx
                .parse::<u32>()
                .map_err(|_| ParamParseError::InvalidFlag)?;
            if index > 31 {
                return Err(ParamParseError::InvalidFlag);
            }

            return Ok(Self::Normal {
                ty: Type::from_str(ty_part)?,
                flag: Some(Flag {
                    name: flag_name.to_owned(),
                    index,
                }),
            });
        }

        Ok(Self::Normal {
            ty: Type::from_str(s)?,
            flag: None,
        })
    }
}
