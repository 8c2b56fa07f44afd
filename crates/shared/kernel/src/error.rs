use bitf_core::FlagError;
use std::borrow::Cow;

/// Error types raised while loading configuration or operating on records.
#[bitf_derive::bitf_error]
pub enum KernelError {
    /// Config source or deserialization failure.
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    /// A field or composite declaration was rejected.
    #[error("Flag error{}: {source}", format_context(.context))]
    Flag { source: FlagError, context: Option<Cow<'static, str>> },

    /// A record or composite refers to a field the schema does not declare.
    #[error("Unknown field{}: {message}", format_context(.context))]
    UnknownField { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl KernelError {
    pub(crate) fn unknown_field(name: &str) -> Self {
        Self::UnknownField { message: format!("field `{name}` is not declared").into(), context: None }
    }
}
