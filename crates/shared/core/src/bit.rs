//! A single flag value: a bit position plus its boolean state.

use crate::MAX_FLAGS;
use crate::error::FlagError;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// An immutable single-flag value.
///
/// Arithmetic is performed against [`Bit::mask`], not against the boolean state:
/// `Bit(2) | 1 == 5`. A cleared bit (for example `!Bit::new(3)?`) carries the complemented
/// mask, so `stored & !bit` clears the position and `stored | !bit` sets every other bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bit {
    position: u8,
    is_set: bool,
}

impl Bit {
    /// Creates a set bit at `position`.
    ///
    /// # Errors
    /// Returns [`FlagError::Range`] if `position >= MAX_FLAGS`.
    pub fn new(position: u8) -> Result<Self, FlagError> {
        Self::with_state(position, true)
    }

    /// Creates a bit at `position` with an explicit state.
    ///
    /// # Errors
    /// Returns [`FlagError::Range`] if `position >= MAX_FLAGS`.
    pub fn with_state(position: u8, is_set: bool) -> Result<Self, FlagError> {
        if usize::from(position) >= MAX_FLAGS {
            return Err(FlagError::position(position, MAX_FLAGS));
        }
        Ok(Self { position, is_set })
    }

    /// Positions coming from a validated registry are always below `MAX_FLAGS`.
    pub(crate) const fn trusted(position: u8, is_set: bool) -> Self {
        Self { position, is_set }
    }

    #[must_use]
    pub const fn position(&self) -> u8 {
        self.position
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.is_set
    }

    /// `1 << position`, independent of the state.
    #[must_use]
    pub const fn flag_mask(&self) -> i64 {
        1 << self.position
    }

    /// The mask taking part in arithmetic: `1 << position` when set, its complement otherwise.
    #[must_use]
    pub const fn mask(&self) -> i64 {
        if self.is_set { self.flag_mask() } else { !self.flag_mask() }
    }
}

impl Not for Bit {
    type Output = Self;

    fn not(self) -> Self {
        Self { position: self.position, is_set: !self.is_set }
    }
}

impl From<Bit> for i64 {
    fn from(bit: Bit) -> Self {
        bit.mask()
    }
}

impl From<Bit> for bool {
    fn from(bit: Bit) -> Self {
        bit.is_set
    }
}

impl PartialEq<i64> for Bit {
    fn eq(&self, other: &i64) -> bool {
        self.mask() == *other
    }
}

impl PartialEq<Bit> for i64 {
    fn eq(&self, other: &Bit) -> bool {
        *self == other.mask()
    }
}

impl PartialEq<bool> for Bit {
    fn eq(&self, other: &bool) -> bool {
        self.is_set == *other
    }
}

impl PartialEq<Bit> for bool {
    fn eq(&self, other: &Bit) -> bool {
        *self == other.is_set
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Bit: number={}, is_set={}>", self.position, self.is_set)
    }
}

macro_rules! bit_arithmetic {
    ($($trait:ident :: $method:ident => $op:tt),* $(,)?) => {$(
        impl $trait<i64> for Bit {
            type Output = i64;

            fn $method(self, rhs: i64) -> i64 {
                self.mask() $op rhs
            }
        }

        impl $trait<Bit> for Bit {
            type Output = i64;

            fn $method(self, rhs: Bit) -> i64 {
                self.mask() $op rhs.mask()
            }
        }

        impl $trait<Bit> for i64 {
            type Output = i64;

            fn $method(self, rhs: Bit) -> i64 {
                self $op rhs.mask()
            }
        }
    )*};
}

bit_arithmetic! {
    BitAnd::bitand => &,
    BitOr::bitor => |,
    BitXor::bitxor => ^,
}
