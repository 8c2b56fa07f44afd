use bitf_core::FlagError;
use std::borrow::Cow;

/// Error types specific to predicate translation.
#[bitf_derive::bitf_error]
pub enum QueryError {
    /// A lookup kind that has no meaning for the operand, e.g. `gt` against a single flag.
    #[error("Unsupported lookup{}: {message}", format_context(.context))]
    UnsupportedLookup { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The target dialect has no operator for the requested update.
    #[error("Unsupported dialect{}: {message}", format_context(.context))]
    UnsupportedDialect { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Resolving a flag operand against its registry failed.
    #[error("Flag error{}: {source}", format_context(.context))]
    Flag { source: FlagError, context: Option<Cow<'static, str>> },
}
