//! Predicate and update fragments for one flag column.

use crate::dialect::Dialect;
use crate::error::QueryError;
use crate::fragment::Fragment;
use crate::lookup::LookupKind;
use crate::operand::Operand;
use bitf_core::Bit;
use tracing::trace;

/// Builds SQL fragments that test or update bits of one integer column.
///
/// The builder holds no state besides the column reference and the dialect; every method is a
/// pure translation. Masks are always passed as parameters, the column is quoted for the
/// dialect.
///
/// ```rust
/// use bitf_core::FlagRegistry;
/// use bitf_query::QueryPredicateBuilder;
///
/// let registry = FlagRegistry::new(["FLAG_0", "FLAG_1"]).unwrap();
/// let flag_1 = registry.bit("FLAG_1").unwrap();
///
/// let builder = QueryPredicateBuilder::new("flags");
/// assert_eq!(builder.is_set(flag_1).inline(), r#"("flags" & 2) = 2"#);
/// assert_eq!(builder.matches(!flag_1).inline(), r#"("flags" & 2) = 0"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPredicateBuilder {
    column: String,
    table: Option<String>,
    dialect: Dialect,
}

impl QueryPredicateBuilder {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into(), table: None, dialect: Dialect::default() }
    }

    /// Qualifies the column with a table alias, e.g. `"T0"."flags"`.
    #[must_use]
    pub fn with_table(mut self, alias: impl Into<String>) -> Self {
        self.table = Some(alias.into());
        self
    }

    #[must_use]
    pub const fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The quoted, optionally table-qualified column reference.
    #[must_use]
    pub fn column_sql(&self) -> String {
        let column = self.dialect.quote(&self.column);
        match &self.table {
            Some(table) => format!("{}.{column}", self.dialect.quote(table)),
            None => column,
        }
    }

    /// `(col & m) = m`: every bit of the operand is set.
    #[must_use]
    pub fn is_set(&self, operand: impl Into<Operand>) -> Fragment {
        let mask = operand.into().mask();
        self.fragment(format!("({} & %s) = %s", self.column_sql()), vec![mask, mask])
    }

    /// `(col & m) = 0`: no bit of the operand is set.
    #[must_use]
    pub fn is_clear(&self, operand: impl Into<Operand>) -> Fragment {
        let mask = operand.into().mask();
        self.fragment(format!("({} & %s) = 0", self.column_sql()), vec![mask])
    }

    /// Tests a flag for the state it carries: a set bit means "is set", an inverted one "is clear".
    #[must_use]
    pub fn matches(&self, bit: Bit) -> Fragment {
        if bit.is_set() { self.is_set(bit) } else { self.is_clear(bit) }
    }

    /// `(col | m)`, the OR form some stores special-case for "has any of these bits".
    #[must_use]
    pub fn or_shortcut(&self, operand: impl Into<Operand>) -> Fragment {
        let mask = operand.into().mask();
        self.fragment(format!("({} | %s)", self.column_sql()), vec![mask])
    }

    /// Translates a field lookup.
    ///
    /// An exact lookup on a flag tests its bit; on a raw mask or handler it compares the whole
    /// column. Any other kind is a plain comparison for raw masks only.
    ///
    /// # Errors
    /// Returns [`QueryError::UnsupportedLookup`] for a non-exact lookup against a single flag.
    pub fn lookup(
        &self,
        kind: LookupKind,
        operand: impl Into<Operand>,
    ) -> Result<Fragment, QueryError> {
        match (kind, operand.into()) {
            (LookupKind::Exact, Operand::Bit(bit)) => Ok(self.matches(bit)),
            (kind, Operand::Bit(bit)) => Err(QueryError::UnsupportedLookup {
                message: format!(
                    "`{kind}` lookup is not defined for the single flag at position {}",
                    bit.position()
                )
                .into(),
                context: None,
            }),
            (kind, Operand::Mask(mask)) => Ok(self
                .fragment(format!("{} {} %s", self.column_sql(), kind.operator()), vec![mask])),
        }
    }

    /// `col | m`: sets the operand's bits.
    #[must_use]
    pub fn set_update(&self, operand: impl Into<Operand>) -> Fragment {
        let mask = operand.into().mask();
        self.fragment(format!("{} | %s", self.column_sql()), vec![mask])
    }

    /// `col & ~m`: clears the operand's bits, portable across dialects.
    #[must_use]
    pub fn clear_update(&self, operand: impl Into<Operand>) -> Fragment {
        let mask = operand.into().mask();
        self.fragment(format!("{} & ~%s", self.column_sql()), vec![mask])
    }

    /// `col ^ m` (`col # m` on PostgreSQL): flips the operand's bits.
    ///
    /// # Errors
    /// Returns [`QueryError::UnsupportedDialect`] when the dialect has no XOR operator.
    pub fn toggle_update(&self, operand: impl Into<Operand>) -> Result<Fragment, QueryError> {
        let operator = self.dialect.xor_operator()?;
        let mask = operand.into().mask();
        Ok(self.fragment(format!("{} {operator} %s", self.column_sql()), vec![mask]))
    }

    fn fragment(&self, sql: String, params: Vec<i64>) -> Fragment {
        trace!(dialect = %self.dialect, %sql, ?params, "Built fragment");
        Fragment::new(sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitf_core::FlagRegistry;

    fn flag(name: &str) -> Bit {
        FlagRegistry::new(["FLAG_0", "FLAG_1", "FLAG_2", "FLAG_3"]).unwrap().bit(name).unwrap()
    }

    #[test]
    fn set_and_clear_predicates() {
        let builder = QueryPredicateBuilder::new("flags");
        let set = builder.is_set(flag("FLAG_1"));
        assert_eq!(set.sql(), r#"("flags" & %s) = %s"#);
        assert_eq!(set.params(), [2, 2]);
        assert_eq!(builder.is_clear(flag("FLAG_1")).inline(), r#"("flags" & 2) = 0"#);
    }

    #[test]
    fn inverted_bit_tests_its_position() {
        let builder = QueryPredicateBuilder::new("flags");
        assert_eq!(builder.matches(!flag("FLAG_3")).inline(), r#"("flags" & 8) = 0"#);
        assert_eq!(builder.matches(flag("FLAG_3")).inline(), r#"("flags" & 8) = 8"#);
    }

    #[test]
    fn qualified_column() {
        let builder = QueryPredicateBuilder::new("flags").with_table("T0");
        assert_eq!(builder.or_shortcut(flag("FLAG_0")).inline(), r#"("T0"."flags" | 1)"#);
    }

    #[test]
    fn non_exact_lookup_on_bit_fails() {
        let builder = QueryPredicateBuilder::new("flags");
        let err = builder.lookup(LookupKind::Gt, flag("FLAG_0")).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedLookup { .. }));
        assert_eq!(builder.lookup(LookupKind::Lt, 0_i64).unwrap().inline(), r#""flags" < 0"#);
    }
}
