//! Intent classification.
//!
//! The classifier is an opaque text-to-label model behind the
//! `IntentClassifier` trait, injected at construction so test doubles
//! can substitute a deterministic stub. The built-in `KeywordClassifier`
//! is a deterministic keyword model over the same closed label set; a
//! trained model can be dropped in behind the same trait.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ZuriError;

/// Closed set of command intents. Every command gets exactly one label;
/// `Unrecognized` is the fallback the dispatcher must still handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Open a document or generic file
    OpenFile,
    /// Open a media file (audio/video/image)
    OpenMedia,
    /// Open a folder
    OpenFolder,
    /// Play any music file (argument ignored, first .mp3 wins)
    PlayMusic,
    /// Play any movie file (argument ignored, first .mp4 wins)
    PlayMovie,
    /// Report where a file lives, no mutation
    SearchFile,
    /// Soft delete (recycle bin)
    DeleteFile,
    /// Hard delete, irreversible
    DeleteForever,
    /// Copy a file to a picked directory
    CopyFile,
    /// Move a file to a picked directory
    MoveFile,
    /// Could not be mapped to any known intent
    Unrecognized,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::OpenFile => "open_file",
            Self::OpenMedia => "open_media",
            Self::OpenFolder => "open_folder",
            Self::PlayMusic => "play_music",
            Self::PlayMovie => "play_movie",
            Self::SearchFile => "search_file",
            Self::DeleteFile => "delete_file",
            Self::DeleteForever => "delete_forever",
            Self::CopyFile => "copy_file",
            Self::MoveFile => "move_file",
            Self::Unrecognized => "unrecognized",
        };
        write!(f, "{}", s)
    }
}

impl Intent {
    /// Parse from a label string (for history display and corpus tests).
    pub fn from_label(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "open_file" => Some(Self::OpenFile),
            "open_media" => Some(Self::OpenMedia),
            "open_folder" => Some(Self::OpenFolder),
            "play_music" => Some(Self::PlayMusic),
            "play_movie" => Some(Self::PlayMovie),
            "search_file" => Some(Self::SearchFile),
            "delete_file" => Some(Self::DeleteFile),
            "delete_forever" => Some(Self::DeleteForever),
            "copy_file" => Some(Self::CopyFile),
            "move_file" => Some(Self::MoveFile),
            "unrecognized" => Some(Self::Unrecognized),
            _ => None,
        }
    }
}

/// Opaque text-to-label classifier. Failure aborts only the current
/// command; the dispatcher reports it and moves on.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Intent, ZuriError>;
}

/// Deterministic keyword model over the closed label set.
///
/// Precedence matters: destructive verbs are checked first so that
/// "remove" never falls through to `move_file`, and play/folder checks
/// run before the generic open branch.
#[derive(Debug, Default, Clone)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }
}

const MEDIA_EXTENSIONS: &[&str] = &["mp3", "mp4", "wav", "mkv", "avi", "mov"];

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Result<Intent, ZuriError> {
        let t = text.trim().to_lowercase();
        if t.is_empty() {
            return Err(ZuriError::Classification("empty command text".to_string()));
        }

        let intent = keyword_intent(&t);
        debug!(intent = %intent, "classified command");
        Ok(intent)
    }
}

fn keyword_intent(t: &str) -> Intent {
    let destructive = t.contains("delete") || t.contains("remove") || t.contains("erase");
    if destructive {
        if t.contains("forever") || t.contains("permanently") || t.contains("for good") {
            return Intent::DeleteForever;
        }
        return Intent::DeleteFile;
    }

    if t.contains("copy") {
        return Intent::CopyFile;
    }
    if t.contains("move") {
        return Intent::MoveFile;
    }

    if t.contains("search") || t.contains("find") || t.contains("where is") || t.contains("locate")
    {
        return Intent::SearchFile;
    }

    if t.contains("play") {
        if t.contains("movie") || t.contains("film") || t.contains(".mp4") {
            return Intent::PlayMovie;
        }
        if t.contains("music") || t.contains("song") || t.contains(".mp3") {
            return Intent::PlayMusic;
        }
        return Intent::OpenMedia;
    }

    let opens = t.contains("open") || t.contains("show") || t.contains("access")
        || t.contains("launch");
    if opens {
        if t.contains("folder") || t.contains("directory") {
            return Intent::OpenFolder;
        }
        if MEDIA_EXTENSIONS.iter().any(|ext| t.contains(&format!(".{}", ext))) {
            return Intent::OpenMedia;
        }
        return Intent::OpenFile;
    }

    Intent::Unrecognized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Intent {
        KeywordClassifier::new().classify(text).unwrap()
    }

    #[test]
    fn test_open_and_media() {
        assert_eq!(classify("open resume.pdf"), Intent::OpenFile);
        assert_eq!(classify("open vacation.mp4"), Intent::OpenMedia);
        assert_eq!(classify("open folder music"), Intent::OpenFolder);
        assert_eq!(classify("show me the projects folder"), Intent::OpenFolder);
    }

    #[test]
    fn test_play() {
        assert_eq!(classify("play music"), Intent::PlayMusic);
        assert_eq!(classify("play a movie"), Intent::PlayMovie);
        assert_eq!(classify("play my favourite song"), Intent::PlayMusic);
    }

    #[test]
    fn test_destructive_precedence() {
        assert_eq!(classify("delete draft.txt"), Intent::DeleteFile);
        assert_eq!(classify("delete draft.txt forever"), Intent::DeleteForever);
        assert_eq!(classify("permanently remove old.log"), Intent::DeleteForever);
        // "remove" must not classify as move_file
        assert_eq!(classify("remove notes.docx"), Intent::DeleteFile);
    }

    #[test]
    fn test_copy_move_search() {
        assert_eq!(classify("copy report.pdf"), Intent::CopyFile);
        assert_eq!(classify("move notes.docx"), Intent::MoveFile);
        assert_eq!(classify("search for budget.xlsx"), Intent::SearchFile);
        assert_eq!(classify("where is thesis.pdf"), Intent::SearchFile);
    }

    #[test]
    fn test_unrecognized_and_empty() {
        assert_eq!(classify("make me a sandwich"), Intent::Unrecognized);
        assert!(KeywordClassifier::new().classify("   ").is_err());
    }

    #[test]
    fn test_label_round_trip() {
        for intent in [
            Intent::OpenFile,
            Intent::OpenMedia,
            Intent::OpenFolder,
            Intent::PlayMusic,
            Intent::PlayMovie,
            Intent::SearchFile,
            Intent::DeleteFile,
            Intent::DeleteForever,
            Intent::CopyFile,
            Intent::MoveFile,
            Intent::Unrecognized,
        ] {
            assert_eq!(Intent::from_label(&intent.to_string()), Some(intent));
        }
    }
}
