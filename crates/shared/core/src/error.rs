//! # Flag Errors
//!
//! This module defines the [`FlagError`] enum used by every registry, handler and
//! composite operation. All variants describe declaration or programmer errors:
//! none of them is transient and none is retried.

use std::borrow::Cow;

/// A specialized [`FlagError`] enum for flag-related failures.
#[bitf_derive::bitf_error]
pub enum FlagError {
    /// A bit position is outside `0..MAX_FLAGS` or outside the registry.
    #[error("Bit position out of range{}: {message}", format_context(.context))]
    Range { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// More flags were declared than the backing integer can hold.
    #[error("Too many flags{}: {message}", format_context(.context))]
    Capacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A declaration is malformed (empty sparse mapping, duplicate names, missing members).
    #[error("Invalid flag declaration{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A flag name is not registered.
    #[error("Unknown flag{}: {message}", format_context(.context))]
    Name { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The operation is not supported for this kind of value.
    #[error("Unsupported operation{}: {message}", format_context(.context))]
    Unsupported { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure while encoding or decoding a handler snapshot.
    #[error("Snapshot serialization error{}: {source}", format_context(.context))]
    Serialization { source: postcard::Error, context: Option<Cow<'static, str>> },
}

impl FlagError {
    pub(crate) fn unknown_name(name: &str) -> Self {
        Self::Name { message: format!("flag `{name}` is not registered").into(), context: None }
    }

    pub(crate) fn position(position: u8, limit: usize) -> Self {
        Self::Range {
            message: format!("position {position} is not below {limit}").into(),
            context: None,
        }
    }
}
