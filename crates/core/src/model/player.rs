use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Name used on score records when the player never set one.
pub const DEFAULT_PLAYER_NAME: &str = "Anonymous Player";

pub const MIN_NAME_CHARS: usize = 2;
pub const MAX_NAME_CHARS: usize = 20;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlayerNameError {
    #[error("player name must be at least 2 characters")]
    TooShort,

    #[error("player name must be at most 20 characters")]
    TooLong,
}

/// A trimmed, length-checked display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    /// # Errors
    ///
    /// Returns `PlayerNameError` if the trimmed name has fewer than 2 or more
    /// than 20 characters.
    pub fn parse(raw: &str) -> Result<Self, PlayerNameError> {
        let trimmed = raw.trim();
        let chars = trimmed.chars().count();
        if chars < MIN_NAME_CHARS {
            return Err(PlayerNameError::TooShort);
        }
        if chars > MAX_NAME_CHARS {
            return Err(PlayerNameError::TooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts() {
        assert_eq!(PlayerName::parse("  Ada ").unwrap().as_str(), "Ada");
    }

    #[test]
    fn length_bounds_count_characters() {
        assert_eq!(PlayerName::parse(" a ").unwrap_err(), PlayerNameError::TooShort);
        assert_eq!(
            PlayerName::parse(&"x".repeat(21)).unwrap_err(),
            PlayerNameError::TooLong
        );
        // multi-byte names are measured in characters, not bytes
        assert!(PlayerName::parse("สมชาย เก่งเลข").is_ok());
    }
}
