//! Named bit flags over a signed 64-bit integer.
//!
//! A [`FlagRegistry`] binds flag names to bit positions once per declaration. A [`BitHandler`]
//! pairs a stored integer with a registry and exposes the bits by name, while the integer stays
//! the only datum that is persisted. A [`Bit`] is a single flag value whose *mask* (not its
//! boolean state) takes part in arithmetic, and a [`CompositeView`] forwards named access over
//! several handlers whose flag namespaces are disjoint.
//!
//! # Capacity
//!
//! The backing store is a signed 64-bit integer and the sign bit stays reserved, so a registry
//! holds at most [`MAX_FLAGS`] (63) flags and stored values are never negative.
//!
//! # Examples
//!
//! ```rust
//! use bitf_core::{BitHandler, FlagError, FlagRegistry};
//!
//! # fn main() -> Result<(), FlagError> {
//! let registry = FlagRegistry::new(["FLAG_0", "FLAG_1", "FLAG_2", "FLAG_3"])?;
//! let mut flags = BitHandler::new(3, registry.clone());
//!
//! assert!(flags.flag("FLAG_0")?.is_set());
//! assert!(!flags.flag("FLAG_2")?.is_set());
//!
//! flags.set_flag("FLAG_0", false)?;
//! assert_eq!(flags.value(), 2);
//!
//! // Masks combine into new handlers on the same registry.
//! let widened = &flags | registry.bit("FLAG_3")?;
//! assert_eq!(widened.value(), 10);
//! # Ok(())
//! # }
//! ```

mod bit;
mod composite;
mod declaration;
mod error;
mod handler;
mod registry;
mod snapshot;
mod typed;

pub use bit::Bit;
pub use composite::{CompositeField, CompositeView};
pub use declaration::{DefaultValue, FieldDeclaration, FieldSpec, FlagDeclaration, FlagEntry};
pub use error::{FlagError, FlagErrorExt};
pub use handler::{BitHandler, IntoMask, Iter};
pub use registry::{FlagRegistry, RegistryBuilder};
pub use snapshot::HandlerSnapshot;

/// Number of usable bit positions: 64 bits minus the reserved sign bit.
pub const MAX_FLAGS: usize = 63;

pub mod prelude {
    pub use crate::MAX_FLAGS;
    pub use crate::bit::Bit;
    pub use crate::composite::{CompositeField, CompositeView};
    pub use crate::error::{FlagError, FlagErrorExt};
    pub use crate::handler::{BitHandler, IntoMask};
    pub use crate::registry::FlagRegistry;
}
