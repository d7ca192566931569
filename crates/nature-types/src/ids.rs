//! Type-safe identifier wrappers around `u64`.
//!
//! The mind service addresses every entity by integer id, so unlike most
//! identifiers in a Rust codebase these are not UUIDs. Wrapping them keeps
//! a player id from being passed where a generation id is expected.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `u64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Wrap a raw integer identifier.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Return the inner integer value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a community, allocated by the mind service.
    CommunityId
}

define_id! {
    /// Identifier of a generation: its 0-based position within the community.
    GenerationId
}

define_id! {
    /// Identifier of a player, unique within its generation.
    PlayerId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&PlayerId::new(7)).ok();
        assert_eq!(json.as_deref(), Some("7"));

        let restored: Result<GenerationId, _> = serde_json::from_str("3");
        assert_eq!(restored.ok(), Some(GenerationId::new(3)));
    }

    #[test]
    fn id_display_matches_integer() {
        let id = CommunityId::from(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(u64::from(id), 42);
    }
}
