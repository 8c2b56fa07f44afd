//! The per-record flag value: an integer paired with the registry that names its bits.

use crate::bit::Bit;
use crate::error::FlagError;
use crate::registry::FlagRegistry;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::ops::{
    Add, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Shl, Shr, Sub,
};
use tracing::debug;

/// Anything that can stand on the right-hand side of a handler combinator.
pub trait IntoMask {
    fn into_mask(self) -> i64;
}

impl IntoMask for i64 {
    fn into_mask(self) -> i64 {
        self
    }
}

impl IntoMask for Bit {
    fn into_mask(self) -> i64 {
        self.mask()
    }
}

impl IntoMask for &BitHandler {
    fn into_mask(self) -> i64 {
        self.value
    }
}

impl IntoMask for BitHandler {
    fn into_mask(self) -> i64 {
        self.value
    }
}

/// A mutable integer value whose bits are named by a [`FlagRegistry`].
///
/// The value is never negative. Negative inputs (left behind by an old sign-extension bug in
/// stored data) are recovered by keeping only the bits of declared positions.
///
/// Equality compares the integer values only; the registries are ignored.
///
/// # Example
///
/// ```rust
/// use bitf_core::{BitHandler, FlagRegistry};
///
/// let registry = FlagRegistry::new(["FLAG_0", "FLAG_1", "FLAG_2", "FLAG_3"]).unwrap();
/// let mut flags = BitHandler::new(3, registry.clone());
/// assert!(flags.flag("FLAG_1").unwrap().is_set());
///
/// flags.set_flag("FLAG_0", false).unwrap();
/// assert_eq!(flags.value(), 2);
///
/// assert_eq!(BitHandler::new(-1, registry).value(), 15);
/// ```
#[derive(Clone)]
pub struct BitHandler {
    value: i64,
    registry: FlagRegistry,
}

impl BitHandler {
    /// Binds `value` to `registry`, recovering negative values.
    #[must_use]
    pub fn new(value: i64, registry: FlagRegistry) -> Self {
        let value = if value < 0 {
            let recovered = value & registry.declared_mask();
            debug!(raw = value, recovered, "Recovered negative flag value");
            recovered
        } else {
            value
        };
        Self { value, registry }
    }

    /// A handler with no flag set.
    #[must_use]
    pub const fn empty(registry: FlagRegistry) -> Self {
        Self { value: 0, registry }
    }

    /// Builds a handler from a nullable stored column; `None` means 0.
    #[must_use]
    pub fn from_column(value: Option<i64>, registry: FlagRegistry) -> Self {
        Self::new(value.unwrap_or_default(), registry)
    }

    /// Builds a handler with exactly the named flags set.
    ///
    /// # Errors
    /// Returns [`FlagError::Name`] for the first unknown name.
    pub fn from_names<I, S>(names: I, registry: FlagRegistry) -> Result<Self, FlagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let value = registry.mask_of(names)?;
        Ok(Self { value, registry })
    }

    /// The raw integer persisted for this handler.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }

    #[must_use]
    pub const fn registry(&self) -> &FlagRegistry {
        &self.registry
    }

    /// Keeps the value and swaps the registry, e.g. after restoring a snapshot against the
    /// current declaration.
    #[must_use]
    pub fn rebind(self, registry: FlagRegistry) -> Self {
        Self::new(self.value, registry)
    }

    /// Reads the bit at `position`.
    ///
    /// # Errors
    /// Returns [`FlagError::Range`] if `position >= MAX_FLAGS`.
    ///
    /// [`MAX_FLAGS`]: crate::MAX_FLAGS
    pub fn get(&self, position: u8) -> Result<Bit, FlagError> {
        let probe = Bit::new(position)?;
        Ok(Bit::trusted(position, self.value & probe.flag_mask() != 0))
    }

    /// Sets or clears the bit at `position` in place and returns its new state.
    ///
    /// # Errors
    /// Returns [`FlagError::Range`] if `position >= MAX_FLAGS`.
    ///
    /// [`MAX_FLAGS`]: crate::MAX_FLAGS
    pub fn set(&mut self, position: u8, on: bool) -> Result<Bit, FlagError> {
        let mask = Bit::new(position)?.flag_mask();
        if on {
            self.value |= mask;
        } else {
            self.value &= !mask;
        }
        Ok(Bit::trusted(position, on))
    }

    /// Reads a named flag.
    ///
    /// # Errors
    /// Returns [`FlagError::Name`] if the flag is not registered.
    pub fn flag(&self, name: &str) -> Result<Bit, FlagError> {
        self.get(self.registry.lookup(name)?)
    }

    /// Writes a named flag.
    ///
    /// # Errors
    /// Returns [`FlagError::Name`] if the flag is not registered.
    pub fn set_flag(&mut self, name: &str, on: bool) -> Result<Bit, FlagError> {
        let position = self.registry.lookup(name)?;
        self.set(position, on)
    }

    /// Returns whether the named flag is set.
    ///
    /// # Errors
    /// Returns [`FlagError::Name`] if the flag is not registered.
    pub fn contains(&self, name: &str) -> Result<bool, FlagError> {
        Ok(self.flag(name)?.is_set())
    }

    /// Replaces the value with exactly the named flags. Nothing changes if a name is unknown.
    ///
    /// # Errors
    /// Returns [`FlagError::Name`] for the first unknown name.
    pub fn set_names<I, S>(&mut self, names: I) -> Result<(), FlagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.value = self.registry.mask_of(names)?;
        Ok(())
    }

    /// Names of the registered flags that are currently set.
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.iter().filter_map(|(name, on)| (on && !name.is_empty()).then_some(name))
    }

    /// Every declared name in position order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.registry.names()
    }

    /// The label of a named flag.
    ///
    /// # Errors
    /// Returns [`FlagError::Name`] if the flag is not registered.
    pub fn label(&self, name: &str) -> Result<&str, FlagError> {
        self.registry.label(name)
    }

    /// Iterates over `(name, is_set)` pairs in registry order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter { handler: self, position: 0 }
    }

    fn derive(&self, value: i64) -> Self {
        Self::new(value, self.registry.clone())
    }
}

/// Iterator over the `(name, is_set)` pairs of a [`BitHandler`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    handler: &'a BitHandler,
    position: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.handler.registry.name(self.position as u8)?;
        let on = self.handler.value & (1_i64 << self.position) != 0;
        self.position += 1;
        Some((name, on))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.handler.registry.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a BitHandler {
    type Item = (&'a str, bool);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for BitHandler {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for BitHandler {}

impl PartialEq<i64> for BitHandler {
    fn eq(&self, other: &i64) -> bool {
        self.value == *other
    }
}

impl Hash for BitHandler {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl From<&BitHandler> for i64 {
    fn from(handler: &BitHandler) -> Self {
        handler.value
    }
}

impl From<BitHandler> for i64 {
    fn from(handler: BitHandler) -> Self {
        handler.value
    }
}

impl fmt::Display for BitHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Debug for BitHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<BitHandler: ")?;
        let mut first = true;
        for (name, on) in self.iter().filter(|(name, _)| !name.is_empty()) {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{name}={on}")?;
            first = false;
        }
        f.write_str(">")
    }
}

// `add`/`sub` are plain (wrapping) integer arithmetic and may carry into neighbouring flags.
macro_rules! handler_combinator {
    ($($trait:ident :: $method:ident => |$lhs:ident, $rhs:ident| $body:expr),* $(,)?) => {$(
        impl<T: IntoMask> $trait<T> for &BitHandler {
            type Output = BitHandler;

            fn $method(self, rhs: T) -> BitHandler {
                let ($lhs, $rhs) = (self.value, rhs.into_mask());
                self.derive($body)
            }
        }

        impl<T: IntoMask> $trait<T> for BitHandler {
            type Output = Self;

            fn $method(self, rhs: T) -> Self {
                (&self).$method(rhs)
            }
        }
    )*};
}

handler_combinator! {
    BitAnd::bitand => |lhs, rhs| lhs & rhs,
    BitOr::bitor => |lhs, rhs| lhs | rhs,
    BitXor::bitxor => |lhs, rhs| lhs ^ rhs,
    Add::add => |lhs, rhs| lhs.wrapping_add(rhs),
    Sub::sub => |lhs, rhs| lhs.wrapping_sub(rhs),
}

impl Shl<u32> for &BitHandler {
    type Output = BitHandler;

    fn shl(self, rhs: u32) -> BitHandler {
        self.derive(self.value.checked_shl(rhs).unwrap_or(0))
    }
}

impl Shl<u32> for BitHandler {
    type Output = Self;

    fn shl(self, rhs: u32) -> Self {
        &self << rhs
    }
}

impl Shr<u32> for &BitHandler {
    type Output = BitHandler;

    fn shr(self, rhs: u32) -> BitHandler {
        self.derive(self.value.checked_shr(rhs).unwrap_or(0))
    }
}

impl Shr<u32> for BitHandler {
    type Output = Self;

    fn shr(self, rhs: u32) -> Self {
        &self >> rhs
    }
}

impl<T: IntoMask> BitAndAssign<T> for BitHandler {
    fn bitand_assign(&mut self, rhs: T) {
        *self = &*self & rhs;
    }
}

impl<T: IntoMask> BitOrAssign<T> for BitHandler {
    fn bitor_assign(&mut self, rhs: T) {
        *self = &*self | rhs;
    }
}

impl<T: IntoMask> BitXorAssign<T> for BitHandler {
    fn bitxor_assign(&mut self, rhs: T) {
        *self = &*self ^ rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FlagRegistry {
        FlagRegistry::new(["FLAG_0", "FLAG_1", "FLAG_2", "FLAG_3"]).unwrap()
    }

    fn handler(value: i64) -> BitHandler {
        BitHandler::new(value, registry())
    }

    #[test]
    fn comparison() {
        assert_eq!(handler(0), handler(0));
        assert_ne!(handler(0), handler(1));
        assert_eq!(handler(5), 5_i64);
        let other = BitHandler::new(5, FlagRegistry::new(["X"]).unwrap());
        assert_eq!(handler(5), other);
    }

    #[test]
    fn defaults() {
        let flags = handler(0);
        assert_eq!(i64::from(&flags), 0);
        for (position, name) in ["FLAG_0", "FLAG_1", "FLAG_2", "FLAG_3"].into_iter().enumerate() {
            let bit = flags.flag(name).unwrap();
            assert_eq!(usize::from(bit.position()), position);
            assert!(!bit.is_set());
        }
        assert!(matches!(flags.flag("FLAG_4"), Err(FlagError::Name { .. })));
        assert_eq!(BitHandler::from_column(None, registry()), 0_i64);
    }

    #[test]
    fn nonzero_default() {
        let states = |value| -> Vec<bool> { handler(value).iter().map(|(_, on)| on).collect() };
        assert_eq!(states(1), [true, false, false, false]);
        assert_eq!(states(2), [false, true, false, false]);
        assert_eq!(states(3), [true, true, false, false]);
        assert_eq!(states(4), [false, false, true, false]);
    }

    #[test]
    fn mutation() {
        let mut flags = handler(0);
        flags = BitHandler::new((&flags | 1_i64).value(), flags.registry().clone());
        assert!(flags.flag("FLAG_0").unwrap().is_set());
        assert!(!flags.flag("FLAG_1").unwrap().is_set());

        flags ^= 3_i64;
        assert_eq!(flags.value(), 2);
        assert_eq!((&flags & 1_i64).value(), 0);

        assert_eq!(flags.set_flag("FLAG_0", false).unwrap(), false);
        assert_eq!(flags.flag("FLAG_0").unwrap(), false);

        flags.set_flag("FLAG_1", true).unwrap();
        flags.set_flag("FLAG_2", false).unwrap();
        assert_eq!(flags.enabled().collect::<Vec<_>>(), ["FLAG_1"]);
        assert!(flags.set_flag("NOPE", true).is_err());
        assert_eq!(flags.value(), 2);
    }

    #[test]
    fn negative_values_keep_declared_bits_only() {
        assert_eq!(handler(-1).value(), 15);
        assert_eq!(handler(i64::MIN | 0b1010).value(), 0b1010);
        assert_eq!(handler(-1 & !(1 << 40)).value(), 15);
    }

    #[test]
    fn set_is_idempotent() {
        let mut flags = handler(0);
        flags.set(2, true).unwrap();
        let once = flags.value();
        flags.set(2, true).unwrap();
        assert_eq!(flags.value(), once);
        assert!(matches!(flags.set(63, true), Err(FlagError::Range { .. })));
    }

    #[test]
    fn combinators_share_registry() {
        let flags = handler(0b0101);
        assert_eq!((&flags | Bit::new(1).unwrap()).value(), 0b0111);
        assert_eq!((&flags & 0b0100_i64).value(), 0b0100);
        assert_eq!((&flags ^ &flags).value(), 0);
        assert_eq!((&flags + 1_i64).value(), 6);
        assert_eq!((&flags - 1_i64).value(), 4);
        assert_eq!((&flags << 1_u32).value(), 0b1010);
        assert_eq!((&flags >> 2_u32).value(), 1);
        assert_eq!((&flags >> 80_u32).value(), 0);
        assert_eq!((&flags | 2_i64).registry(), flags.registry());
    }

    #[test]
    fn cleared_bit_operand_clears_position() {
        let mut flags = handler(0b1111);
        flags &= !Bit::new(3).unwrap();
        assert_eq!(flags.value(), 0b0111);
    }

    #[test]
    fn names_round_trip() {
        let mut flags = BitHandler::from_names(["FLAG_0", "FLAG_3"], registry()).unwrap();
        assert_eq!(flags.value(), 9);
        assert!(flags.contains("FLAG_3").unwrap());
        assert!(flags.contains("FLAG_9").is_err());

        assert!(flags.set_names(["FLAG_1", "FLAG_FLAG"]).is_err());
        assert_eq!(flags.value(), 9);
        flags.set_names(Vec::<String>::new()).unwrap();
        assert_eq!(flags.value(), 0);
    }

    #[test]
    fn iteration_is_restartable() {
        let flags = handler(3);
        let first: Vec<_> = flags.iter().collect();
        let second: Vec<_> = (&flags).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(flags.iter().len(), 4);
        assert_eq!(format!("{flags}"), "3");
        assert_eq!(
            format!("{flags:?}"),
            "<BitHandler: FLAG_0=true, FLAG_1=true, FLAG_2=false, FLAG_3=false>"
        );
    }
}
