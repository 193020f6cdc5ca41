//! Shared pipeline types.
//!
//! A `Command` is created per user utterance, filled in as it moves
//! through the pipeline (classify -> extract -> locate -> execute) and
//! discarded after the result is reported. Persistence of command
//! history is a separate concern (see `history`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::intent::Intent;

/// One user utterance moving through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// Text exactly as typed or transcribed
    pub raw_text: String,
    /// Lowercased, filler-stripped form used for filename extraction
    pub normalized_text: String,
    /// Classified intent (exactly one per command)
    pub intent: Intent,
    /// Extracted target, if any
    pub argument: Argument,
    /// When the command was received
    pub timestamp: DateTime<Utc>,
}

impl Command {
    pub fn new(raw_text: &str) -> Self {
        Self {
            raw_text: raw_text.to_string(),
            normalized_text: String::new(),
            intent: Intent::Unrecognized,
            argument: Argument::None,
            timestamp: Utc::now(),
        }
    }
}

/// Target candidate produced by argument extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Argument {
    File(String),
    Folder(String),
    None,
}

impl Argument {
    pub fn is_none(&self) -> bool {
        matches!(self, Argument::None)
    }

    /// The captured name, regardless of kind.
    pub fn name(&self) -> Option<&str> {
        match self {
            Argument::File(n) | Argument::Folder(n) => Some(n),
            Argument::None => None,
        }
    }
}

/// What a locator lookup is searching for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    File,
    Folder,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::File => "file",
            TargetKind::Folder => "folder",
        }
    }
}

/// A successful lookup. Never cached across commands; the filesystem
/// may have changed between lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub path: PathBuf,
    pub kind: TargetKind,
}

/// Uniform result of an executed (or short-circuited) command branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    pub affected_path: Option<PathBuf>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>, affected_path: Option<PathBuf>) -> Self {
        Self {
            success: true,
            message: message.into(),
            affected_path,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            affected_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_command_starts_unclassified() {
        let cmd = Command::new("open resume.pdf");
        assert_eq!(cmd.raw_text, "open resume.pdf");
        assert_eq!(cmd.intent, Intent::Unrecognized);
        assert!(cmd.argument.is_none());
    }

    #[test]
    fn test_argument_name() {
        assert_eq!(Argument::File("a.txt".into()).name(), Some("a.txt"));
        assert_eq!(Argument::Folder("music".into()).name(), Some("music"));
        assert_eq!(Argument::None.name(), None);
    }
}
