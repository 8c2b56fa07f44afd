use serde::Serialize;
use std::fmt;

/// Parameter placeholder used in [`Fragment::sql`].
pub const PLACEHOLDER: &str = "%s";

/// A parameterized SQL fragment: the text with [`PLACEHOLDER`]s plus their values in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fragment {
    sql: String,
    params: Vec<i64>,
}

impl Fragment {
    pub(crate) const fn new(sql: String, params: Vec<i64>) -> Self {
        Self { sql, params }
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn params(&self) -> &[i64] {
        &self.params
    }

    #[must_use]
    pub fn into_parts(self) -> (String, Vec<i64>) {
        (self.sql, self.params)
    }

    /// Renders the fragment with every placeholder replaced by its integer parameter.
    ///
    /// Parameters are integers only, so inlining cannot inject SQL. Surplus placeholders are
    /// left untouched.
    #[must_use]
    pub fn inline(&self) -> String {
        let mut out = String::with_capacity(self.sql.len() + self.params.len() * 4);
        let mut params = self.params.iter();
        let mut rest = self.sql.as_str();

        while let Some(index) = rest.find(PLACEHOLDER) {
            out.push_str(&rest[..index]);
            match params.next() {
                Some(param) => out.push_str(&param.to_string()),
                None => out.push_str(PLACEHOLDER),
            }
            rest = &rest[index + PLACEHOLDER.len()..];
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inline())
    }
}
