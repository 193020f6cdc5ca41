//! Per-intent action dispatch.
//!
//! The state machine of the system: Received -> Classified ->
//! ArgumentResolved -> Located -> Executed -> Reported. Every branch,
//! including early exits, terminates at Reported with an
//! `ActionResult`; no error from a single command propagates past this
//! boundary.
//!
//! Collaborators (classifier, locator, destination picker, opener) are
//! injected at construction so front ends and tests can substitute
//! their own.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::config::ZuriConfig;
use crate::error::ZuriError;
use crate::extract::ArgumentExtractor;
use crate::fileops;
use crate::history::HistoryDb;
use crate::intent::{Intent, IntentClassifier, KeywordClassifier};
use crate::locate::{Locator, TieredLocator};
use crate::types::{ActionResult, Argument, Command, ResolvedTarget, TargetKind};

/// Fixed short-circuit message when an intent needs an argument and
/// extraction produced none. The locator is never called in that case.
pub const MSG_NO_TARGET: &str = "Could not determine the target";
pub const MSG_NOT_RECOGNIZED: &str = "Command not recognized";

/// Pipeline stages, for tracing and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Classified,
    ArgumentResolved,
    Located,
    Executed,
    Reported,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Received => "received",
            Self::Classified => "classified",
            Self::ArgumentResolved => "argument_resolved",
            Self::Located => "located",
            Self::Executed => "executed",
            Self::Reported => "reported",
        };
        write!(f, "{}", s)
    }
}

/// Synchronously returns a chosen destination directory, or None when
/// the user cancelled. Required only for copy/move.
pub trait DestinationPicker: Send + Sync {
    fn pick_directory(&self, purpose: &str) -> Option<PathBuf>;
}

/// Picker for headless embedding: always cancelled.
pub struct NoPicker;

impl DestinationPicker for NoPicker {
    fn pick_directory(&self, _purpose: &str) -> Option<PathBuf> {
        None
    }
}

/// Hands a resolved path to the platform's default handler. Behind a
/// trait so tests don't spawn real viewer processes.
pub trait TargetOpener: Send + Sync {
    fn open(&self, path: &Path) -> ActionResult;
}

pub struct SystemOpener;

impl TargetOpener for SystemOpener {
    fn open(&self, path: &Path) -> ActionResult {
        fileops::open_path(path)
    }
}

/// Everything the caller needs after one command: the filled-in
/// command record and the result to report.
#[derive(Debug)]
pub struct Outcome {
    pub command: Command,
    pub result: ActionResult,
}

pub struct Dispatcher {
    classifier: Arc<dyn IntentClassifier>,
    extractor: ArgumentExtractor,
    locator: Arc<dyn Locator>,
    picker: Arc<dyn DestinationPicker>,
    opener: Arc<dyn TargetOpener>,
    history: Option<Mutex<HistoryDb>>,
}

impl Dispatcher {
    /// Production wiring: keyword classifier, tiered locator, system
    /// opener, no picker and no history until the front end supplies
    /// them.
    pub fn from_config(config: &ZuriConfig) -> Result<Self, ZuriError> {
        Ok(Self {
            classifier: Arc::new(KeywordClassifier::new()),
            extractor: ArgumentExtractor::new(config)?,
            locator: Arc::new(TieredLocator::from_config(config)),
            picker: Arc::new(NoPicker),
            opener: Arc::new(SystemOpener),
            history: None,
        })
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_locator(mut self, locator: Arc<dyn Locator>) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_picker(mut self, picker: Arc<dyn DestinationPicker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn with_opener(mut self, opener: Arc<dyn TargetOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn with_history(mut self, history: HistoryDb) -> Self {
        self.history = Some(Mutex::new(history));
        self
    }

    /// Process one command end to end. Never panics, never returns an
    /// error: every failure becomes a reported message.
    pub fn handle(&self, raw_text: &str) -> Outcome {
        debug!(stage = %Stage::Received, text = raw_text, "command received");

        let mut command = Command::new(raw_text);
        command.normalized_text = self.extractor.normalize(raw_text);

        let intent = match self.classifier.classify(raw_text) {
            Ok(intent) => intent,
            Err(e) => {
                let result = ActionResult::fail(format!("Error processing command: {}", e));
                debug!(stage = %Stage::Reported, message = %result.message, "classification failed");
                return Outcome { command, result };
            }
        };
        command.intent = intent;
        debug!(stage = %Stage::Classified, intent = %intent, "intent classified");

        self.log_history(raw_text, intent);

        let result = self.run_branch(&mut command);
        debug!(stage = %Stage::Executed, success = result.success, "branch finished");
        debug!(
            stage = %Stage::Reported,
            success = result.success,
            message = %result.message,
            "command reported"
        );
        Outcome { command, result }
    }

    fn run_branch(&self, command: &mut Command) -> ActionResult {
        match command.intent {
            Intent::OpenFile | Intent::OpenMedia => self.open_file(command),
            Intent::OpenFolder => self.open_folder(command),
            Intent::PlayMusic => self.play_any(".mp3", "Playing music", "No music files found"),
            Intent::PlayMovie => {
                self.play_any(".mp4", "Enjoy your movie", "No movie files found")
            }
            Intent::SearchFile => self.search_file(command),
            Intent::DeleteFile => self.delete(command, false),
            Intent::DeleteForever => self.delete(command, true),
            Intent::CopyFile => self.transfer(command, Transfer::Copy),
            Intent::MoveFile => self.transfer(command, Transfer::Move),
            Intent::Unrecognized => ActionResult::fail(MSG_NOT_RECOGNIZED),
        }
    }

    /// File argument for intents that require one. Fills in the
    /// command record; `None` means the fixed no-target short-circuit
    /// applies and the locator must not be called.
    fn file_argument(&self, command: &mut Command) -> Option<String> {
        let name = self
            .extractor
            .extract_filename(&command.raw_text, self.locator.as_ref())?;
        command.argument = Argument::File(name.clone());
        debug!(stage = %Stage::ArgumentResolved, argument = %name, "argument resolved");
        Some(name)
    }

    fn locate(&self, name: &str, kind: TargetKind) -> Option<ResolvedTarget> {
        let outcome = self.locator.find(name, kind);
        if !outcome.report.skipped.is_empty() {
            debug!(
                skipped = outcome.report.skipped.len(),
                "subtrees skipped during lookup"
            );
        }
        if outcome.report.budget_exhausted {
            warn!(name = name, "lookup stopped by scan budget");
        }
        if let Some(target) = &outcome.target {
            debug!(stage = %Stage::Located, path = %target.path.display(), "target located");
        }
        outcome.target
    }

    fn open_file(&self, command: &mut Command) -> ActionResult {
        let Some(name) = self.file_argument(command) else {
            return ActionResult::fail(MSG_NO_TARGET);
        };
        let Some(target) = self.locate(&name, TargetKind::File) else {
            return ActionResult::fail(format!("{} not found", name));
        };

        let opened = self.opener.open(&target.path);
        if opened.success {
            ActionResult::ok(format!("Opening {}", name), Some(target.path))
        } else {
            opened
        }
    }

    fn open_folder(&self, command: &mut Command) -> ActionResult {
        // Folder patterns first; fall back to stripping the verb
        // phrase from the raw text.
        let name = self
            .extractor
            .extract_folder_name(&command.raw_text)
            .unwrap_or_else(|| {
                command
                    .raw_text
                    .to_lowercase()
                    .replace("open folder", "")
                    .trim()
                    .to_string()
            });
        if name.is_empty() {
            return ActionResult::fail(MSG_NO_TARGET);
        }
        command.argument = Argument::Folder(name.clone());
        debug!(stage = %Stage::ArgumentResolved, argument = %name, "argument resolved");

        let Some(target) = self.locate(&name, TargetKind::Folder) else {
            return ActionResult::fail(format!("{} not found", name));
        };

        let opened = self.opener.open(&target.path);
        if opened.success {
            ActionResult::ok(format!("Opening folder {}", name), Some(target.path))
        } else {
            opened
        }
    }

    /// play_music / play_movie: the extracted argument is ignored; the
    /// first file matching the extension pattern wins.
    fn play_any(&self, pattern: &str, ok_message: &str, miss_message: &str) -> ActionResult {
        let Some(target) = self.locate(pattern, TargetKind::File) else {
            return ActionResult::fail(miss_message);
        };

        let opened = self.opener.open(&target.path);
        if opened.success {
            ActionResult::ok(ok_message, Some(target.path))
        } else {
            opened
        }
    }

    fn search_file(&self, command: &mut Command) -> ActionResult {
        let Some(name) = self.file_argument(command) else {
            return ActionResult::fail(MSG_NO_TARGET);
        };
        match self.locate(&name, TargetKind::File) {
            // Report only, no mutation
            Some(target) => ActionResult::ok(
                format!("File found at {}", target.path.display()),
                Some(target.path),
            ),
            None => ActionResult::fail(format!("{} not found", name)),
        }
    }

    fn delete(&self, command: &mut Command, permanent: bool) -> ActionResult {
        let Some(name) = self.file_argument(command) else {
            return ActionResult::fail(MSG_NO_TARGET);
        };
        let Some(target) = self.locate(&name, TargetKind::File) else {
            return ActionResult::fail(format!("{} not found", name));
        };

        if permanent {
            fileops::delete_hard(&target.path)
        } else {
            fileops::delete_soft(&target.path)
        }
    }

    fn transfer(&self, command: &mut Command, kind: Transfer) -> ActionResult {
        let Some(name) = self.file_argument(command) else {
            return ActionResult::fail(MSG_NO_TARGET);
        };
        let Some(target) = self.locate(&name, TargetKind::File) else {
            return ActionResult::fail(format!("{} not found", name));
        };

        let Some(dest_dir) = self.picker.pick_directory(kind.verb()) else {
            // Cancelled picker: report, mutate nothing
            return ActionResult::fail(format!("{} operation cancelled", kind.title()));
        };

        match kind {
            Transfer::Copy => fileops::copy_file(&target.path, &dest_dir),
            Transfer::Move => fileops::move_file(&target.path, &dest_dir),
        }
    }

    /// Best-effort history logging; the only silently-downgraded
    /// failure category.
    fn log_history(&self, raw_text: &str, intent: Intent) {
        let Some(history) = &self.history else {
            return;
        };
        match history.lock() {
            Ok(db) => {
                if let Err(e) = db.record(raw_text, intent) {
                    warn!("Failed to log command history: {}", e);
                }
            }
            Err(_) => warn!("History database lock poisoned; entry dropped"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Transfer {
    Copy,
    Move,
}

impl Transfer {
    fn verb(&self) -> &'static str {
        match self {
            Transfer::Copy => "copy",
            Transfer::Move => "move",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Transfer::Copy => "Copy",
            Transfer::Move => "Move",
        }
    }
}
