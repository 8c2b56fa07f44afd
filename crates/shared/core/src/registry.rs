//! Flag registries: the validated, ordered binding of flag names to bit positions.

use crate::MAX_FLAGS;
use crate::bit::Bit;
use crate::error::FlagError;
use fxhash::FxHashMap;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An immutable, ordered mapping from flag name to bit position.
///
/// The position of a flag is its index in the declaration. Registries are cheap to clone
/// (the inner table is reference counted) and are shared by every [`BitHandler`] built from the
/// same declaration.
///
/// Sparse declarations fill unused positions with empty placeholder names. Placeholders occupy
/// a position but can never be looked up.
///
/// [`BitHandler`]: crate::BitHandler
#[derive(Clone)]
pub struct FlagRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Debug)]
struct RegistryInner {
    names: Vec<String>,
    labels: Vec<Option<String>>,
    index: FxHashMap<String, u8>,
}

pub(crate) type Entry = (String, Option<String>);

impl FlagRegistry {
    /// Builds a registry from an ordered list of names.
    ///
    /// # Errors
    /// * [`FlagError::Capacity`] if more than [`MAX_FLAGS`] names are given.
    /// * [`FlagError::Validation`] if a name is declared twice.
    pub fn new<I, S>(names: I) -> Result<Self, FlagError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_entries(names.into_iter().map(|name| (name.into(), None)).collect())
    }

    /// Builds a registry from ordered `(name, label)` pairs.
    ///
    /// # Errors
    /// Same as [`FlagRegistry::new`].
    pub fn with_labels<I, N, L>(pairs: I) -> Result<Self, FlagError>
    where
        I: IntoIterator<Item = (N, L)>,
        N: Into<String>,
        L: Into<String>,
    {
        Self::from_entries(
            pairs.into_iter().map(|(name, label)| (name.into(), Some(label.into()))).collect(),
        )
    }

    /// Builds a registry from a sparse `position -> name` mapping.
    ///
    /// Keys outside `0..MAX_FLAGS` are dropped without error. The resulting registry has
    /// `max(key) + 1` positions, unused ones hold empty placeholders.
    ///
    /// # Errors
    /// Returns [`FlagError::Validation`] if the mapping is empty or no key survives.
    pub fn from_sparse<I, S>(mapping: I) -> Result<Self, FlagError>
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        Self::from_sparse_entries(mapping.into_iter().map(|(key, name)| (key, (name.into(), None))))
    }

    /// Returns a fluent builder for declaring flags one by one.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub(crate) fn from_sparse_entries<I>(mapping: I) -> Result<Self, FlagError>
    where
        I: IntoIterator<Item = (i64, Entry)>,
    {
        let mut seen_any = false;
        let mut valid = BTreeMap::new();
        for (key, entry) in mapping {
            seen_any = true;
            if let Ok(position) = u8::try_from(key)
                && usize::from(position) < MAX_FLAGS
            {
                valid.insert(position, entry);
            }
        }

        if !seen_any {
            return Err(FlagError::Validation {
                message: "sparse flag mapping is empty".into(),
                context: None,
            });
        }
        let Some(&max) = valid.keys().next_back() else {
            return Err(FlagError::Validation {
                message: format!("sparse flag mapping has no integer key in 0..{MAX_FLAGS}").into(),
                context: None,
            });
        };

        let entries = (0..=max).map(|position| valid.remove(&position).unwrap_or_default()).collect();
        Self::from_entries(entries)
    }

    pub(crate) fn from_entries(entries: Vec<Entry>) -> Result<Self, FlagError> {
        if entries.len() > MAX_FLAGS {
            return Err(FlagError::Capacity {
                message: format!("{} flags declared, at most {MAX_FLAGS} fit", entries.len())
                    .into(),
                context: None,
            });
        }

        let mut index = FxHashMap::default();
        let mut names = Vec::with_capacity(entries.len());
        let mut labels = Vec::with_capacity(entries.len());
        for (position, (name, label)) in entries.into_iter().enumerate() {
            if !name.is_empty() && index.insert(name.clone(), position as u8).is_some() {
                return Err(FlagError::Validation {
                    message: format!("flag `{name}` is declared more than once").into(),
                    context: None,
                });
            }
            names.push(name);
            labels.push(label);
        }

        Ok(Self { inner: Arc::new(RegistryInner { names, labels, index }) })
    }

    /// Number of declared positions, placeholders included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.names.is_empty()
    }

    /// Resolves a flag name to its bit position.
    ///
    /// # Errors
    /// Returns [`FlagError::Name`] if the name is not registered.
    pub fn lookup(&self, name: &str) -> Result<u8, FlagError> {
        self.inner.index.get(name).copied().ok_or_else(|| FlagError::unknown_name(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.index.contains_key(name)
    }

    /// Returns the name declared at `position`; placeholders yield `Some("")`.
    #[must_use]
    pub fn name(&self, position: u8) -> Option<&str> {
        self.inner.names.get(usize::from(position)).map(String::as_str)
    }

    /// Returns the label declared at `position`, or the raw flag name when none was given.
    ///
    /// # Errors
    /// Returns [`FlagError::Range`] if `position` is not declared.
    pub fn label_for(&self, position: u8) -> Result<&str, FlagError> {
        let index = usize::from(position);
        let name = self.inner.names.get(index).ok_or_else(|| FlagError::position(position, self.len()))?;
        Ok(self.inner.labels[index].as_deref().unwrap_or(name))
    }

    /// Returns the label of a named flag.
    ///
    /// # Errors
    /// Returns [`FlagError::Name`] if the name is not registered.
    pub fn label(&self, name: &str) -> Result<&str, FlagError> {
        self.label_for(self.lookup(name)?)
    }

    /// Returns the set [`Bit`] of a named flag, e.g. to build query operands.
    ///
    /// # Errors
    /// Returns [`FlagError::Name`] if the name is not registered.
    pub fn bit(&self, name: &str) -> Result<Bit, FlagError> {
        Ok(Bit::trusted(self.lookup(name)?, true))
    }

    /// ORs the masks of the given flags together.
    ///
    /// # Errors
    /// Returns [`FlagError::Name`] for the first unknown name.
    pub fn mask_of<I, S>(&self, names: I) -> Result<i64, FlagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(0, |mask, name| Ok(mask | self.bit(name.as_ref())?.mask()))
    }

    /// Mask covering every declared position, placeholders included.
    #[must_use]
    pub fn declared_mask(&self) -> i64 {
        match self.len() {
            0 => 0,
            len => i64::MAX >> (MAX_FLAGS - len),
        }
    }

    /// Iterates over every declared name in position order, placeholders included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.names.iter().map(String::as_str)
    }

    /// Iterates over `(name, Bit)` pairs of registered flags in position order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Bit)> {
        self.positions().map(|(position, name)| (name, Bit::trusted(position, true)))
    }

    /// `(name, label)` pairs of registered flags, the shape expected by choice widgets.
    pub fn choices(&self) -> impl Iterator<Item = (&str, &str)> {
        self.positions().map(move |(position, name)| {
            (name, self.inner.labels[usize::from(position)].as_deref().unwrap_or(name))
        })
    }

    /// `(mask, name)` pairs of registered flags, the shape expected by list filters.
    pub fn filter_choices(&self) -> impl Iterator<Item = (i64, &str)> {
        self.positions().map(|(position, name)| (1_i64 << position, name))
    }

    fn positions(&self) -> impl Iterator<Item = (u8, &str)> {
        self.inner
            .names
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(position, name)| (position as u8, name.as_str()))
    }
}

impl PartialEq for FlagRegistry {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.names == other.inner.names && self.inner.labels == other.inner.labels)
    }
}

impl Eq for FlagRegistry {}

impl fmt::Debug for FlagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.inner.names).finish()
    }
}

/// A fluent builder for [`FlagRegistry`].
///
/// ```rust
/// use bitf_core::FlagRegistry;
///
/// let registry = FlagRegistry::builder()
///     .flag("ACTIVE")
///     .labeled("STAFF", "Staff member")
///     .build()
///     .unwrap();
/// assert_eq!(registry.lookup("STAFF").unwrap(), 1);
/// assert_eq!(registry.label("STAFF").unwrap(), "Staff member");
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<Entry>,
}

impl RegistryBuilder {
    /// Declares the next flag without a label.
    #[must_use = "The builder must be finished with `build`"]
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.entries.push((name.into(), None));
        self
    }

    /// Declares the next flag with a human-readable label.
    #[must_use = "The builder must be finished with `build`"]
    pub fn labeled(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.entries.push((name.into(), Some(label.into())));
        self
    }

    /// Reserves the next position without binding a name to it.
    #[must_use = "The builder must be finished with `build`"]
    pub fn skip(mut self) -> Self {
        self.entries.push((String::new(), None));
        self
    }

    /// Validates the declaration.
    ///
    /// # Errors
    /// Same as [`FlagRegistry::new`].
    pub fn build(self) -> Result<FlagRegistry, FlagError> {
        FlagRegistry::from_entries(self.entries)
    }
}
