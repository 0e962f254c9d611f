//! Core types shared by proofs, identities and the trust graph.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Kind of identity. Only crev identities exist today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdType {
    #[default]
    Crev,
}

/// Reference to an identity as embedded in proofs.
///
/// `id` is the base64url-encoded Ed25519 public key and is the globally
/// unique key of the identity. `url` names the repository where the
/// identity publishes its proofs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PublicId {
    #[serde(default)]
    pub id_type: IdType,
    pub id: String,
    pub url: String,
}

impl PublicId {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id_type: IdType::Crev,
            id: id.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.url)
    }
}

macro_rules! ordinal_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All values, lowest first.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(Error::Format(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

ordinal_enum! {
    /// Thoroughness or understanding of a review.
    Level {
        None => "none",
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

ordinal_enum! {
    /// Outcome of a package review, worst first.
    Rating {
        Dangerous => "dangerous",
        Negative => "negative",
        Neutral => "neutral",
        Positive => "positive",
        Strong => "strong",
    }
}

ordinal_enum! {
    /// How much one identity trusts another.
    TrustLevel {
        Distrust => "distrust",
        None => "none",
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl Rating {
    /// `negative` or worse.
    pub fn is_failing(&self) -> bool {
        *self <= Rating::Negative
    }

    /// `positive` or `strong`.
    pub fn is_passing(&self) -> bool {
        *self >= Rating::Positive
    }
}
