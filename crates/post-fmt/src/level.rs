//! Audience tiers for encrypted inscriptions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Audience tier for encrypted content, ordered from widest to narrowest.
///
/// Higher values denote narrower audiences. The tier only selects which key
/// segment the caller's hierarchy lookup is asked for; it grants nothing by
/// itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum EncryptionLevel {
    /// Unencrypted, visible to everyone.
    #[default]
    Public = 0,
    /// Subscribers of the author.
    Subscriber = 1,
    /// Accounts the author follows back.
    Follower = 2,
    /// Mutual friends.
    Friend = 3,
    /// The author's inner circle.
    InnerCircle = 4,
    /// The author alone.
    OwnerOnly = 5,
}

/// Error for numeric levels outside the 0..=5 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("encryption level out of range (got {0})")]
pub struct LevelError(pub u8);

impl TryFrom<u8> for EncryptionLevel {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Public),
            1 => Ok(Self::Subscriber),
            2 => Ok(Self::Follower),
            3 => Ok(Self::Friend),
            4 => Ok(Self::InnerCircle),
            5 => Ok(Self::OwnerOnly),
            other => Err(LevelError(other)),
        }
    }
}

impl From<EncryptionLevel> for u8 {
    fn from(level: EncryptionLevel) -> Self {
        level as u8
    }
}

impl EncryptionLevel {
    /// True for the implicit level-0 tier.
    pub fn is_public(&self) -> bool {
        *self == Self::Public
    }
}

impl fmt::Display for EncryptionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Public => "public",
            Self::Subscriber => "subscriber",
            Self::Follower => "follower",
            Self::Friend => "friend",
            Self::InnerCircle => "inner-circle",
            Self::OwnerOnly => "owner-only",
        };
        write!(f, "{name}")
    }
}
