//! Declaration surface: how a field's flags and default are written down in configuration.
//!
//! ```toml
//! [fields.permissions]
//! flags = ["READ", ["WRITE", "Can write"], { name = "ADMIN", label = "Administrator" }]
//! default = ["READ"]
//!
//! [fields.legacy]
//! flags = { 0 = "zero", 1 = "first", 10 = "tenth" }
//! default = 3
//! ```

use crate::error::FlagError;
use crate::handler::{BitHandler, IntoMask};
use crate::registry::{Entry, FlagRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One flag of a list declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagEntry {
    /// `"NAME"`
    Name(String),
    /// `["NAME", "Label"]`
    Pair(String, String),
    /// `{ name = "NAME", label = "Label" }`
    Detailed {
        name: String,
        #[serde(default)]
        label: Option<String>,
    },
}

impl FlagEntry {
    fn into_entry(self) -> Entry {
        match self {
            Self::Name(name) => (name, None),
            Self::Pair(name, label) => (name, Some(label)),
            Self::Detailed { name, label } => (name, label),
        }
    }
}

impl From<&str> for FlagEntry {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

/// The flags of one field, either positional or keyed by bit position.
///
/// Keys of the sparse form are strings (as every config format writes them); keys that do not
/// parse as integers in `0..MAX_FLAGS` are dropped silently.
///
/// [`MAX_FLAGS`]: crate::MAX_FLAGS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagDeclaration {
    List(Vec<FlagEntry>),
    Sparse(BTreeMap<String, FlagEntry>),
}

impl FlagDeclaration {
    /// Validates the declaration into a registry.
    ///
    /// # Errors
    /// * [`FlagError::Capacity`] for too many flags.
    /// * [`FlagError::Validation`] for duplicate names or a sparse map without valid keys.
    pub fn compile(&self) -> Result<FlagRegistry, FlagError> {
        match self {
            Self::List(entries) => FlagRegistry::from_entries(
                entries.iter().cloned().map(FlagEntry::into_entry).collect(),
            ),
            Self::Sparse(mapping) if mapping.is_empty() => Err(FlagError::Validation {
                message: "sparse flag mapping is empty".into(),
                context: None,
            }),
            Self::Sparse(mapping) => {
                let parsed: Vec<_> = mapping
                    .iter()
                    .filter_map(|(key, entry)| {
                        let key = key.trim().parse::<i64>().ok()?;
                        Some((key, entry.clone().into_entry()))
                    })
                    .collect();
                if parsed.is_empty() {
                    return Err(FlagError::Validation {
                        message: "sparse flag mapping has no integer key".into(),
                        context: None,
                    });
                }
                FlagRegistry::from_sparse_entries(parsed)
            }
        }
    }
}

impl<S: Into<FlagEntry>> FromIterator<S> for FlagDeclaration {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::List(iter.into_iter().map(Into::into).collect())
    }
}

/// A field default: a raw integer or the names of the flags set by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Value(i64),
    Names(Vec<String>),
}

impl DefaultValue {
    /// Resolves the default against `registry`.
    ///
    /// # Errors
    /// Returns [`FlagError::Name`] if a default names an unknown flag.
    pub fn resolve(&self, registry: &FlagRegistry) -> Result<i64, FlagError> {
        match self {
            Self::Value(value) => Ok(*value),
            Self::Names(names) => registry.mask_of(names),
        }
    }
}

/// The complete declaration of one flag field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub flags: FlagDeclaration,
    #[serde(default)]
    pub default: Option<DefaultValue>,
}

impl FieldDeclaration {
    /// Compiles the declaration into a [`FieldSpec`].
    ///
    /// # Errors
    /// Propagates registry and default resolution errors.
    pub fn compile(&self) -> Result<FieldSpec, FlagError> {
        let registry = self.flags.compile()?;
        let default = self.default.as_ref().map(|d| d.resolve(&registry)).transpose()?;
        Ok(FieldSpec { default: default.unwrap_or_default(), registry })
    }
}

/// A compiled field: the shared registry plus the resolved default value.
///
/// This is the boundary the storage adapter talks to: [`FieldSpec::load`] turns a stored column
/// into a handler and [`FieldSpec::prep_value`] turns a handler back into the stored integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    registry: FlagRegistry,
    default: i64,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(registry: FlagRegistry) -> Self {
        Self { registry, default: 0 }
    }

    #[must_use]
    pub const fn with_default(mut self, default: i64) -> Self {
        self.default = default;
        self
    }

    #[must_use]
    pub const fn registry(&self) -> &FlagRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn default_value(&self) -> i64 {
        self.default
    }

    /// A handler holding the declared default, for new records.
    #[must_use]
    pub fn default_handler(&self) -> BitHandler {
        BitHandler::new(self.default, self.registry.clone())
    }

    /// A handler for a loaded column; `NULL` reads as 0 and negative values are recovered.
    #[must_use]
    pub fn load(&self, stored: Option<i64>) -> BitHandler {
        BitHandler::from_column(stored, self.registry.clone())
    }

    /// The integer to persist for a handler, a bit or a raw value.
    #[must_use]
    pub fn prep_value(value: impl IntoMask) -> i64 {
        value.into_mask()
    }
}
