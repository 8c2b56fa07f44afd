//! Facade crate for the `bitf` workspace.
//! Re-exports the core flag types and, behind features, the query translation and kernel crates.
//! Keep this crate thin: it composes other crates, it does not implement flag logic.
//!
//! ## Usage
//! ```rust
//! use bitf::prelude::*;
//!
//! # fn main() -> Result<(), FlagError> {
//! let registry = FlagRegistry::new(["FLAG_0", "FLAG_1", "FLAG_2", "FLAG_3"])?;
//! let handler = BitHandler::new(-1, registry);
//! assert_eq!(handler.value(), 15);
//! # Ok(())
//! # }
//! ```

pub use bitf_core::*;
#[cfg(feature = "kernel")]
pub use bitf_kernel as kernel;
#[cfg(feature = "query")]
pub use bitf_query as query;

pub mod prelude {
    pub use bitf_core::prelude::*;
    pub use bitf_core::{FieldDeclaration, FieldSpec, FlagDeclaration, HandlerSnapshot};
    #[cfg(feature = "kernel")]
    pub use bitf_kernel::{KernelError, Record, RecordSchema, SchemaConfig};
    #[cfg(feature = "query")]
    pub use bitf_query::{Dialect, Fragment, LookupKind, Operand, QueryError, QueryPredicateBuilder};
}

/// Build-time enabled features (by Cargo feature).
pub mod features {
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "query")]
        "query",
        #[cfg(feature = "kernel")]
        "kernel",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}
