//! Stable numeric identity types.
//!
//! Every identity in the engine is a small newtype over an integer rather
//! than a string, since ordering by id (lowest wins a movement conflict,
//! lowest attacker resolves first, ties break on id) is load-bearing
//! throughout the spec, not just a display convenience.

use serde::{Deserialize, Serialize};

macro_rules! define_numeric_id {
    ($name:ident, $repr:ty) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $repr);

        impl $name {
            pub const fn new(value: $repr) -> Self {
                Self(value)
            }

            pub const fn get(self) -> $repr {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                Self(value)
            }
        }
    };
}

define_numeric_id!(AgentId, u32);
define_numeric_id!(ItemId, u32);
define_numeric_id!(BuffId, u32);
define_numeric_id!(BattleId, u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_numeric() {
        assert!(AgentId::new(1) < AgentId::new(2));
        assert!(AgentId::new(10) > AgentId::new(9));
    }

    #[test]
    fn display_matches_inner_value() {
        assert_eq!(AgentId::new(7).to_string(), "7");
    }

    #[test]
    fn json_round_trip_is_bare_number() {
        let id = AgentId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: AgentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
