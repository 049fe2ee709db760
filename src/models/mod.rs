//! Domain models
//!
//! This module contains all domain models used throughout the application.
//! Rows are plain `FromRow` projections referenced by integer id; relations
//! are resolved through the repositories, never through embedded references.

/// Declares a closed set of values persisted as `TEXT`.
///
/// Generates `as_str`, `Display`, `FromStr` and `TryFrom<String>` (the latter
/// backs `#[sqlx(try_from = "String")]` on row structs).
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant),+
        }

        impl $name {
            /// Every value, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Persisted/wire representation
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::models::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::models::UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub mod invitation;
pub mod matches;
pub mod medal;
pub mod role;
pub mod standings;
pub mod tournament;
pub mod user;

pub use invitation::*;
pub use matches::*;
pub use medal::*;
pub use role::*;
pub use standings::*;
pub use tournament::*;
pub use user::*;

/// A persisted or submitted value outside an enum's closed set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl From<UnknownVariant> for crate::error::AppError {
    fn from(err: UnknownVariant) -> Self {
        let valid = match err.kind {
            "match type" => join(MatchType::ALL.iter().map(MatchType::as_str)),
            "match status" => join(MatchStatus::ALL.iter().map(MatchStatus::as_str)),
            "tournament status" => join(TournamentStatus::ALL.iter().map(TournamentStatus::as_str)),
            "invitation status" => join(InvitationStatus::ALL.iter().map(InvitationStatus::as_str)),
            "medal type" => join(MedalType::ALL.iter().map(MedalType::as_str)),
            _ => String::new(),
        };

        if valid.is_empty() {
            crate::error::AppError::Validation(err.to_string())
        } else {
            crate::error::AppError::Validation(format!("{err}. Valid values: {valid}"))
        }
    }
}

fn join<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}
