//! Snapshots carry a handler across process boundaries as a bare integer.
//!
//! The registry is never serialized: a restored snapshot must be bound to the registry of the
//! *current* declaration, so flags added since the snapshot read as unset and removed flags are
//! no longer reachable.

use crate::error::{FlagError, FlagErrorExt};
use crate::handler::BitHandler;
use crate::registry::FlagRegistry;
use serde::{Deserialize, Serialize, Serializer};

/// The serialized form of a [`BitHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerSnapshot {
    value: i64,
}

impl HandlerSnapshot {
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }

    /// Rebuilds a handler against the current declaration.
    #[must_use]
    pub fn bind(self, registry: &FlagRegistry) -> BitHandler {
        BitHandler::new(self.value, registry.clone())
    }

    /// Encodes the snapshot with `postcard`.
    ///
    /// # Errors
    /// Returns [`FlagError::Serialization`] if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FlagError> {
        postcard::to_stdvec(self).context("Encoding handler snapshot")
    }

    /// Decodes a snapshot produced by [`HandlerSnapshot::to_bytes`].
    ///
    /// # Errors
    /// Returns [`FlagError::Serialization`] for truncated or malformed input.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FlagError> {
        postcard::from_bytes(bytes).context("Decoding handler snapshot")
    }
}

impl From<&BitHandler> for HandlerSnapshot {
    fn from(handler: &BitHandler) -> Self {
        Self { value: handler.value() }
    }
}

impl BitHandler {
    #[must_use]
    pub fn snapshot(&self) -> HandlerSnapshot {
        HandlerSnapshot::from(self)
    }
}

impl Serialize for BitHandler {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_only_the_integer() {
        let registry = FlagRegistry::new(["FLAG_0", "FLAG_1"]).unwrap();
        let handler = BitHandler::new(1, registry);
        assert_eq!(serde_json::to_string(&handler).unwrap(), "1");

        let snapshot: HandlerSnapshot = serde_json::from_str("1").unwrap();
        assert_eq!(snapshot, handler.snapshot());
    }

    #[test]
    fn binary_round_trip() {
        let registry = FlagRegistry::new(["FLAG_0", "FLAG_1", "FLAG_2"]).unwrap();
        let handler = BitHandler::new(5, registry.clone());

        let bytes = handler.snapshot().to_bytes().unwrap();
        let restored = HandlerSnapshot::from_bytes(&bytes).unwrap().bind(&registry);
        assert_eq!(restored, handler);
        assert!(restored.flag("FLAG_2").unwrap().is_set());
    }

    #[test]
    fn truncated_bytes_fail() {
        let err = HandlerSnapshot::from_bytes(&[]).unwrap_err();
        assert!(matches!(err, FlagError::Serialization { .. }));
        assert_eq!(err.context_str(), Some("Decoding handler snapshot"));
    }
}
