//! Leaderboard submission payloads
//!
//! The engine only supplies the final `{score, mode, level, lines}` tuple at
//! game over; this module types the wire contract and applies the same
//! validation the remote service does, so bad submissions are rejected before
//! they ever leave the client. Actual transport belongs to the surrounding
//! application layer.

use crate::mode::GameMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Usernames are trimmed and capped at this length
pub const MAX_USERNAME_LEN: usize = 20;

/// A score submission, as posted to `/api/leaderboard`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub username: String,
    pub score: u64,
    pub mode: GameMode,
    pub level: u32,
    pub lines: u32,
}

/// One row of a leaderboard listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u64,
    pub mode: GameMode,
    pub level: u32,
    pub lines: u32,
}

/// Response body of `GET /api/leaderboard?mode=`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub scores: Vec<LeaderboardEntry>,
    pub mode: GameMode,
}

/// Why a submission was rejected client-side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionError {
    EmptyUsername,
    UsernameTooLong,
    /// Usernames are alphanumeric/underscore only
    InvalidUsername,
    /// Zen games are not ranked
    IneligibleMode,
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::EmptyUsername => write!(f, "username is empty"),
            SubmissionError::UsernameTooLong => {
                write!(f, "username is longer than {} characters", MAX_USERNAME_LEN)
            }
            SubmissionError::InvalidUsername => {
                write!(f, "username may only contain letters, digits and underscores")
            }
            SubmissionError::IneligibleMode => write!(f, "this mode is not ranked"),
        }
    }
}

impl std::error::Error for SubmissionError {}

impl Submission {
    /// Build a validated submission from the game-over tuple
    pub fn new(
        username: &str,
        score: u64,
        mode: GameMode,
        level: u32,
        lines: u32,
    ) -> Result<Self, SubmissionError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(SubmissionError::EmptyUsername);
        }
        if username.len() > MAX_USERNAME_LEN {
            return Err(SubmissionError::UsernameTooLong);
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(SubmissionError::InvalidUsername);
        }
        if !mode.leaderboard_eligible() {
            return Err(SubmissionError::IneligibleMode);
        }
        Ok(Self {
            username: username.to_string(),
            score,
            mode,
            level,
            lines,
        })
    }

    /// Serialize for the POST body
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_plain_username() {
        let sub = Submission::new("block_fan42", 1200, GameMode::Marathon, 3, 21).unwrap();
        assert_eq!(sub.username, "block_fan42");
        assert_eq!(sub.score, 1200);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let sub = Submission::new("  ada  ", 100, GameMode::Sprint, 1, 4).unwrap();
        assert_eq!(sub.username, "ada");
    }

    #[test]
    fn rejects_empty_and_whitespace_usernames() {
        for name in ["", "   ", "\t"] {
            assert_eq!(
                Submission::new(name, 0, GameMode::Marathon, 1, 0),
                Err(SubmissionError::EmptyUsername)
            );
        }
    }

    #[test]
    fn rejects_overlong_usernames() {
        let name = "a".repeat(MAX_USERNAME_LEN + 1);
        assert_eq!(
            Submission::new(&name, 0, GameMode::Marathon, 1, 0),
            Err(SubmissionError::UsernameTooLong)
        );
        let name = "a".repeat(MAX_USERNAME_LEN);
        assert!(Submission::new(&name, 0, GameMode::Marathon, 1, 0).is_ok());
    }

    #[test]
    fn rejects_special_characters() {
        for name in ["hello world", "héllo", "semi;colon", "dash-er"] {
            assert_eq!(
                Submission::new(name, 0, GameMode::Marathon, 1, 0),
                Err(SubmissionError::InvalidUsername),
                "{name}"
            );
        }
    }

    #[test]
    fn rejects_zen_games() {
        assert_eq!(
            Submission::new("ada", 500, GameMode::Zen, 2, 12),
            Err(SubmissionError::IneligibleMode)
        );
    }

    #[test]
    fn serializes_modes_in_lowercase() {
        let sub = Submission::new("ada", 500, GameMode::Ultra, 2, 12).unwrap();
        let json = sub.to_json().unwrap();
        assert!(json.contains("\"mode\":\"ultra\""));
        assert!(json.contains("\"username\":\"ada\""));
    }

    #[test]
    fn response_round_trips() {
        let json = r#"{"scores":[{"username":"ada","score":900,"mode":"sprint","level":2,"lines":40}],"mode":"sprint"}"#;
        let response: LeaderboardResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.mode, GameMode::Sprint);
        assert_eq!(response.scores.len(), 1);
        assert_eq!(response.scores[0].score, 900);
    }
}
