//! Append-only conversation transcript
//!
//! Turns are immutable once appended. Ordinals are 1-based and strictly
//! increasing; they always equal the turn's position in the transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Agent,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => write!(f, "User"),
            Speaker::Agent => write!(f, "Agent"),
        }
    }
}

/// One message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    /// 1-based position in the transcript
    pub ordinal: u64,
    pub at: DateTime<Utc>,
}

/// An append-only log of conversation turns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn, assigning the next ordinal
    ///
    /// Appending never fails: the speaker enum makes invalid speakers
    /// unrepresentable and the text is unconstrained free text.
    pub fn append(&mut self, speaker: Speaker, text: impl Into<String>) -> &Turn {
        let index = self.turns.len();
        self.turns.push(Turn {
            speaker,
            text: text.into(),
            ordinal: index as u64 + 1,
            at: Utc::now(),
        });
        tracing::debug!("Appended {} turn #{}", speaker, index + 1);
        &self.turns[index]
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the transcript is empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// All turns in ordinal order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Render the transcript as newline-joined `"{speaker}: {text}"` lines
    ///
    /// Pure and repeatable; the downloadable `conversation.txt` artifact is
    /// exactly this string.
    pub fn export(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("{}: {}", turn.speaker, turn.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_are_one_based_and_increasing() {
        let mut transcript = Transcript::new();
        transcript.append(Speaker::User, "wrench");
        transcript.append(Speaker::Agent, "5% import");
        transcript.append(Speaker::User, "hammer");

        let ordinals: Vec<u64> = transcript.turns().iter().map(|t| t.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
    }

    #[test]
    fn test_append_returns_new_turn() {
        let mut transcript = Transcript::new();
        let turn = transcript.append(Speaker::User, "wrench");
        assert_eq!(turn.ordinal, 1);
        assert_eq!(turn.speaker, Speaker::User);
        assert_eq!(turn.text, "wrench");
    }

    #[test]
    fn test_export_format() {
        let mut transcript = Transcript::new();
        transcript.append(Speaker::User, "wrench");
        transcript.append(Speaker::Agent, "wrench: 5% import, 2% local (category: hardware)");

        assert_eq!(
            transcript.export(),
            "User: wrench\nAgent: wrench: 5% import, 2% local (category: hardware)"
        );
    }

    #[test]
    fn test_export_is_idempotent() {
        let mut transcript = Transcript::new();
        transcript.append(Speaker::User, "drill");
        transcript.append(Speaker::Agent, "drill: 8% import");

        let first = transcript.export();
        let second = transcript.export();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_export_is_empty_string() {
        assert_eq!(Transcript::new().export(), "");
    }
}
