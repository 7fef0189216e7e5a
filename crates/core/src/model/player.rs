use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlayerNameError {
    #[error("player name cannot be empty")]
    Empty,

    #[error("player name is longer than {max} characters")]
    TooLong { max: usize },
}

/// Trimmed, non-empty display name of the person playing a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    pub const MAX_CHARS: usize = 40;

    /// # Errors
    ///
    /// Returns `PlayerNameError::Empty` for blank input and
    /// `PlayerNameError::TooLong` above `MAX_CHARS` characters.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PlayerNameError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PlayerNameError::Empty);
        }
        if trimmed.chars().count() > Self::MAX_CHARS {
            return Err(PlayerNameError::TooLong {
                max: Self::MAX_CHARS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name safe to embed in a file name: anything outside `[A-Za-z0-9_-]`
    /// becomes `_`, so path separators and dots never reach the filesystem.
    #[must_use]
    pub fn file_stem(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
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
    fn trims_and_validates() {
        assert_eq!(PlayerName::new("  Ada  ").unwrap().as_str(), "Ada");
        assert_eq!(PlayerName::new("   ").unwrap_err(), PlayerNameError::Empty);
        let long = "x".repeat(PlayerName::MAX_CHARS + 1);
        assert!(matches!(
            PlayerName::new(long),
            Err(PlayerNameError::TooLong { .. })
        ));
    }

    #[test]
    fn file_stem_replaces_spaces() {
        let name = PlayerName::new("Grace B Hopper").unwrap();
        assert_eq!(name.file_stem(), "Grace_B_Hopper");
    }

    #[test]
    fn file_stem_strips_path_characters() {
        assert_eq!(PlayerName::new("AC/DC").unwrap().file_stem(), "AC_DC");
        assert_eq!(PlayerName::new("..\\up").unwrap().file_stem(), "___up");
        assert_eq!(PlayerName::new(".hidden").unwrap().file_stem(), "_hidden");
        assert_eq!(PlayerName::new("Zoë-1").unwrap().file_stem(), "Zo_-1");
    }
}
