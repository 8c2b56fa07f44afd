#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the `bitf` workspace crates.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! bitf-derive = { path = "../infra/derive" }
//! thiserror = "2"
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining crate-level error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `<ErrorName>Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Introspection**: Generates `kind()` (the variant name) and `context_str()`.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` when an
///   `Internal` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field (or a field marked
///    with `#[source]`/`#[from]`) **and** a context field.
///
/// # Example
///
/// ```rust,ignore
/// use bitf_derive::bitf_error;
/// use std::borrow::Cow;
///
/// #[bitf_error]
/// pub enum SnapshotError {
///     #[error("Encoding error{}: {source}", format_context(.context))]
///     Encoding { source: postcard::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn decode(bytes: &[u8]) -> Result<i64, SnapshotError> {
///     postcard::from_bytes(bytes).context("Decoding snapshot")
/// }
/// ```
#[proc_macro_attribute]
pub fn bitf_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
