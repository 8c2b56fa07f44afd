use crate::error::QueryError;
use bitf_core::{Bit, BitHandler, FlagErrorExt, FlagRegistry};

/// The right-hand side of a flag predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A single flag; its state selects between "is set" and "is clear" for exact lookups.
    Bit(Bit),
    /// A raw mask, e.g. a handler's value or several OR-ed flags.
    Mask(i64),
}

impl Operand {
    /// Resolves a flag name against `registry`.
    ///
    /// # Errors
    /// Returns [`QueryError::Flag`] if the name is not registered.
    pub fn named(registry: &FlagRegistry, name: &str) -> Result<Self, QueryError> {
        Ok(Self::Bit(registry.bit(name).context("Resolving query operand")?))
    }

    /// ORs the masks of several flags into one operand.
    ///
    /// # Errors
    /// Returns [`QueryError::Flag`] for the first unknown name.
    pub fn names<I, S>(registry: &FlagRegistry, names: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::Mask(registry.mask_of(names).context("Resolving query operand")?))
    }

    /// The positive mask tested or applied by the predicate.
    ///
    /// For a [`Bit`] this is the mask of its position regardless of its state.
    #[must_use]
    pub const fn mask(&self) -> i64 {
        match self {
            Self::Bit(bit) => bit.flag_mask(),
            Self::Mask(mask) => *mask,
        }
    }
}

impl From<Bit> for Operand {
    fn from(bit: Bit) -> Self {
        Self::Bit(bit)
    }
}

impl From<&BitHandler> for Operand {
    fn from(handler: &BitHandler) -> Self {
        Self::Mask(handler.value())
    }
}

impl From<i64> for Operand {
    fn from(mask: i64) -> Self {
        Self::Mask(mask)
    }
}
