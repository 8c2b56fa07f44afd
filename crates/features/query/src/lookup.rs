use crate::error::QueryError;
use std::fmt;
use std::str::FromStr;

/// Comparison kinds a storage adapter may ask for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LookupKind {
    #[default]
    Exact,
    NotEqual,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl LookupKind {
    /// The SQL comparison operator for a raw-integer operand.
    #[must_use]
    pub const fn operator(self) -> &'static str {
        match self {
            Self::Exact => "=",
            Self::NotEqual => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::NotEqual => "ne",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookupKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" | "eq" => Ok(Self::Exact),
            "ne" => Ok(Self::NotEqual),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            other => Err(QueryError::UnsupportedLookup {
                message: format!("unknown lookup `{other}`").into(),
                context: None,
            }),
        }
    }
}
