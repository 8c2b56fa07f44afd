//! Kernel utilities shared by the facade and the shell.
//! Keep this crate lightweight: layered config loading plus the record schema built on top of it.
//!
//! ## Config loading
//! ```rust,ignore
//! use bitf_kernel::config::load_config;
//! let cfg: serde_json::Value = load_config::<serde_json::Value>(Some("flags.toml")).unwrap();
//! ```
//!
//! ## Records
//! ```rust,ignore
//! use bitf_kernel::RecordSchema;
//!
//! let schema = RecordSchema::load(Some("flags.toml"))?;
//! let mut record = schema.record([("flags_1", Some(3))])?;
//! record.field_mut("flags_1")?.set_flag("FLAG_0", false)?;
//! record.composite("flags")?.set_flag("FLAG_5", true)?;
//! ```
pub mod config;
mod error;
pub mod schema;

pub use error::{KernelError, KernelErrorExt};
pub use schema::{Record, RecordSchema, SchemaConfig};
