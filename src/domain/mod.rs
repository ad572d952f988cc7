//! Domain types for the catalog with strong typing.
//!
//! Identifiers follow the Newtype pattern so a `MovieId` can never be passed where
//! a `UserId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Returns the underlying i32 value.
            #[must_use]
            pub const fn value(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self::new(id)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a registered user.
    UserId
);
entity_id!(
    /// Unique identifier for a movie.
    MovieId
);
entity_id!(
    /// Unique identifier for a review.
    ReviewId
);

/// The part a person plays in a movie's crew or cast.
///
/// Directors, writers and actors share one association table; this tag tells the
/// rows apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditRole {
    Director,
    Writer,
    Actor,
}

impl CreditRole {
    pub const ALL: [Self; 3] = [Self::Director, Self::Writer, Self::Actor];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Director => "director",
            Self::Writer => "writer",
            Self::Actor => "actor",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == value)
    }
}

impl fmt::Display for CreditRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference tables a movie draft may point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Genre,
    Person,
    Country,
    Language,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Genre => "genre",
            Self::Person => "person",
            Self::Country => "country",
            Self::Language => "language",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_conversions() {
        let id = MovieId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(id), 42);
        assert_eq!(MovieId::from(42), id);
    }

    #[test]
    fn id_serialization_is_transparent() {
        let id = UserId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let deserialized: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn credit_role_round_trips_through_its_tag() {
        for role in CreditRole::ALL {
            assert_eq!(CreditRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(CreditRole::parse("producer"), None);
    }

    #[test]
    fn reference_kind_display() {
        assert_eq!(ReferenceKind::Language.to_string(), "language");
    }
}
