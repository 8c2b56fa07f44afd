//! Interop with statically declared [`bitflags`] types.

use crate::MAX_FLAGS;
use crate::error::{FlagError, FlagErrorExt};
use crate::handler::BitHandler;
use crate::registry::FlagRegistry;
use bitflags::Flags;

impl FlagRegistry {
    /// Builds a registry from the single-bit constants of a `bitflags` type.
    ///
    /// Each constant lands at the position of its bit; multi-bit aliases (such as an `ALL`
    /// constant) are skipped and unused positions become placeholders.
    ///
    /// # Errors
    /// * [`FlagError::Range`] if a constant uses the sign bit.
    /// * [`FlagError::Validation`] if the type declares no single-bit constant.
    pub fn from_bitflags<F>() -> Result<Self, FlagError>
    where
        F: Flags<Bits = u64>,
    {
        let mut entries = Vec::new();
        for flag in F::FLAGS {
            let bits = flag.value().bits();
            if bits.count_ones() != 1 || flag.name().is_empty() {
                continue;
            }
            let position = bits.trailing_zeros();
            if position as usize >= MAX_FLAGS {
                return Err(FlagError::position(position as u8, MAX_FLAGS))
                    .context(format!("bitflags constant `{}`", flag.name()));
            }
            entries.push((i64::from(position), (flag.name().to_owned(), None)));
        }
        Self::from_sparse_entries(entries)
    }
}

impl BitHandler {
    /// Builds a handler from a typed flag set.
    #[must_use]
    pub fn from_bitflags<F>(flags: F, registry: FlagRegistry) -> Self
    where
        F: Flags<Bits = u64>,
    {
        Self::new(flags.bits() as i64, registry)
    }

    /// Views the value as a typed flag set, dropping bits the type does not declare.
    #[must_use]
    pub fn to_bitflags<F>(&self) -> F
    where
        F: Flags<Bits = u64>,
    {
        F::from_bits_truncate(self.value() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct Permissions: u64 {
            const READ = 1 << 0;
            const WRITE = 1 << 1;
            const ADMIN = 1 << 4;
            const ALL = Self::READ.bits() | Self::WRITE.bits() | Self::ADMIN.bits();
        }
    }

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct Signed: u64 {
            const SIGN = 1 << 63;
        }
    }

    #[test]
    fn registry_from_bitflags_keeps_positions() {
        let registry = FlagRegistry::from_bitflags::<Permissions>().unwrap();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.lookup("ADMIN").unwrap(), 4);
        assert!(!registry.contains("ALL"));
    }

    #[test]
    fn sign_bit_constant_is_rejected() {
        let err = FlagRegistry::from_bitflags::<Signed>().unwrap_err();
        assert!(matches!(err, FlagError::Range { .. }));
        assert_eq!(err.context_str(), Some("bitflags constant `SIGN`"));
    }

    #[test]
    fn handler_converts_both_ways() {
        let registry = FlagRegistry::from_bitflags::<Permissions>().unwrap();
        let handler = BitHandler::from_bitflags(Permissions::READ | Permissions::ADMIN, registry);
        assert!(handler.flag("ADMIN").unwrap().is_set());
        assert!(!handler.flag("WRITE").unwrap().is_set());

        let typed: Permissions = (&handler | 1_i64 << 9).to_bitflags();
        assert_eq!(typed, Permissions::READ | Permissions::ADMIN);
    }
}
