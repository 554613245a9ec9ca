use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

// Identifiers are opaque strings on the wire: room ids are minted by the server,
// player ids by the client. Both must be non-empty and usable as URL path segments.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() || trimmed.contains('/') {
                    return Err(DomainError::invalid_id(format!(
                        "{}: {:?}",
                        stringify!($name),
                        value
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

define_id!(RoomId);
define_id!(PlayerId);

impl PlayerId {
    /// Mint a fresh client-side player id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_empty_and_path_like_ids() {
        assert!(RoomId::parse("").is_err());
        assert!(RoomId::parse("   ").is_err());
        assert!(PlayerId::parse("a/b").is_err());
        assert_eq!(
            RoomId::parse(" 1a2b3c4d ").expect("valid room id").as_str(),
            "1a2b3c4d"
        );
    }

    #[test]
    fn generated_player_ids_are_distinct() {
        assert_ne!(PlayerId::generate(), PlayerId::generate());
    }

    #[test]
    fn ids_serialize_as_bare_strings() {
        let id = PlayerId::parse("p1").expect("valid player id");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"p1\"");
    }
}
