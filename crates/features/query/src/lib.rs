//! # Flag Queries
//!
//! Turns flag tests and bit mutations into SQL fragments for an external query engine.
//!
//! * **Predicates** ([`QueryPredicateBuilder::is_set`], [`QueryPredicateBuilder::is_clear`],
//!   [`QueryPredicateBuilder::lookup`]) filter rows by the bits of an integer column.
//! * **Updates** ([`QueryPredicateBuilder::set_update`], [`QueryPredicateBuilder::clear_update`],
//!   [`QueryPredicateBuilder::toggle_update`]) mutate bits atomically inside the store.
//!
//! Operands are a [`Bit`](bitf_core::Bit), a [`BitHandler`](bitf_core::BitHandler) or a raw
//! `i64` mask. Nothing here executes SQL.

mod builder;
mod dialect;
mod error;
mod fragment;
mod lookup;
mod operand;

pub use builder::QueryPredicateBuilder;
pub use dialect::Dialect;
pub use error::{QueryError, QueryErrorExt};
pub use fragment::{Fragment, PLACEHOLDER};
pub use lookup::LookupKind;
pub use operand::Operand;
