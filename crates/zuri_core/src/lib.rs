//! Zuri Core - natural-language file assistant pipeline.
//!
//! Free-form command text goes in; a classified intent and an extracted
//! target come out, resolved against an unindexed filesystem and
//! executed as a concrete file operation. The stages run strictly in
//! sequence per command: classify -> extract -> locate -> execute ->
//! report. Only `fileops` mutates the filesystem.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod fileops;
pub mod history;
pub mod intent;
pub mod locate;
pub mod types;

pub use config::ZuriConfig;
pub use dispatch::{DestinationPicker, Dispatcher, Outcome};
pub use error::ZuriError;
pub use intent::{Intent, IntentClassifier, KeywordClassifier};
pub use locate::{Locator, TieredLocator};
pub use types::{ActionResult, Argument, Command, ResolvedTarget, TargetKind};
