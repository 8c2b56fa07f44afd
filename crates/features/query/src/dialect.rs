use crate::error::QueryError;
use std::fmt;
use std::str::FromStr;

/// SQL dialect families that differ in identifier quoting and in the XOR operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    #[default]
    Generic,
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    /// Resolves a backend engine path such as `django.db.backends.postgresql` or a bare
    /// engine name. Only the last dotted segment is inspected; unknown engines are [`Generic`].
    ///
    /// [`Generic`]: Dialect::Generic
    #[must_use]
    pub fn from_engine(engine: &str) -> Self {
        let name = engine.rsplit('.').next().unwrap_or(engine).to_ascii_lowercase();
        if name.starts_with("postgres") {
            Self::Postgres
        } else if name.starts_with("sqlite") {
            Self::Sqlite
        } else if name.starts_with("mysql") {
            Self::MySql
        } else {
            Self::Generic
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    /// The bitwise XOR operator of the dialect.
    ///
    /// # Errors
    /// Returns [`QueryError::UnsupportedDialect`] for SQLite, which has no XOR operator.
    pub fn xor_operator(self) -> Result<&'static str, QueryError> {
        match self {
            Self::Generic | Self::MySql => Ok("^"),
            Self::Postgres => Ok("#"),
            Self::Sqlite => Err(QueryError::UnsupportedDialect {
                message: "sqlite has no bitwise XOR operator".into(),
                context: None,
            }),
        }
    }

    /// Quotes an identifier, doubling embedded quote characters.
    #[must_use]
    pub fn quote(self, ident: &str) -> String {
        let quote = match self {
            Self::MySql => '`',
            Self::Generic | Self::Postgres | Self::Sqlite => '"',
        };
        let mut quoted = String::with_capacity(ident.len() + 2);
        quoted.push(quote);
        for ch in ident.chars() {
            if ch == quote {
                quoted.push(quote);
            }
            quoted.push(ch);
        }
        quoted.push(quote);
        quoted
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" | "ansi" => Ok(Self::Generic),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            other => Err(QueryError::UnsupportedDialect {
                message: format!("unknown dialect `{other}`").into(),
                context: None,
            }),
        }
    }
}
