//! Heuristic argument extraction.
//!
//! Pulls a filename or folder-name candidate out of free-form command
//! text. Filename extraction works on a normalized form (lowercased,
//! filler vocabulary stripped); folder extraction runs its own patterns
//! over the original text. The two are independent: a command may yield
//! one, the other, or neither. A miss is a normal outcome, never an
//! error.

use regex::Regex;
use tracing::debug;

use crate::config::ZuriConfig;
use crate::error::ZuriError;
use crate::locate::Locator;
use crate::types::{Argument, TargetKind};

/// Verbs and fillers removed before filename matching, whole-word.
const FILLER_WORDS: &str =
    r"\b(open|play|delete|permanently|search|file|folder|move|copy|the|a|an)\b";

pub struct ArgumentExtractor {
    filler: Regex,
    whitespace: Regex,
    filename: Regex,
    folder_patterns: Vec<Regex>,
    extensions: Vec<String>,
}

impl ArgumentExtractor {
    pub fn new(config: &ZuriConfig) -> Result<Self, ZuriError> {
        let escaped: Vec<String> = config
            .extensions
            .iter()
            .map(|ext| regex::escape(ext))
            .collect();
        let filename_pattern = format!(r"([\w][\w\s\-]*?\.(?:{}))\b", escaped.join("|"));

        let folder_sources = [
            r"(?i)\bopen\s+(?:the\s+)?folder\s+(.+)$",
            r"(?i)\bopen\s+(?:the\s+|my\s+)?(.+?)\s+(?:folder|directory)\b",
            r"(?i)\bshow\s+(?:me\s+)?(?:the\s+|my\s+)?(.+?)\s+folder\b",
            r"(?i)\baccess\s+(?:my\s+)?(.+?)\s+(?:directory|folder)\b",
        ];
        let mut folder_patterns = Vec::with_capacity(folder_sources.len());
        for source in folder_sources {
            folder_patterns.push(compile(source)?);
        }

        Ok(Self {
            filler: compile(FILLER_WORDS)?,
            whitespace: compile(r"\s+")?,
            filename: compile(&filename_pattern)?,
            folder_patterns,
            extensions: config.extensions.clone(),
        })
    }

    /// Lowercase, strip the filler vocabulary whole-word, collapse
    /// whitespace.
    pub fn normalize(&self, raw_text: &str) -> String {
        let lowered = raw_text.to_lowercase();
        let stripped = self.filler.replace_all(&lowered, " ");
        self.whitespace.replace_all(&stripped, " ").trim().to_string()
    }

    /// Extract a filename candidate. With an explicit extension the
    /// matched text is returned verbatim, trimmed and with inner spaces
    /// removed. Without one, speculative extension completion asks the
    /// locator whether `<phrase>.<ext>` exists for each recognized
    /// extension; the bare phrase is the last resort.
    pub fn extract_filename(&self, raw_text: &str, locator: &dyn Locator) -> Option<String> {
        let cleaned = self.normalize(raw_text);
        if cleaned.is_empty() {
            return None;
        }

        if let Some(captures) = self.filename.captures(&cleaned) {
            let matched = captures.get(1)?.as_str().trim().replace(' ', "");
            debug!(filename = %matched, "explicit extension match");
            return Some(matched);
        }

        // Speculative extension completion: the one place extraction
        // consults the locator.
        for ext in &self.extensions {
            let candidate = format!("{}.{}", cleaned, ext);
            if locator.find(&candidate, TargetKind::File).target.is_some() {
                debug!(filename = %candidate, "speculative extension completion hit");
                return Some(candidate);
            }
        }

        Some(cleaned)
    }

    /// Extract a folder-name candidate from the original text.
    pub fn extract_folder_name(&self, raw_text: &str) -> Option<String> {
        for pattern in &self.folder_patterns {
            if let Some(captures) = pattern.captures(raw_text) {
                let name = captures.get(1)?.as_str().trim();
                if !name.is_empty() {
                    return Some(name.to_string());
                }
            }
        }
        None
    }

    /// Combined extraction: a folder pattern wins when one matches,
    /// otherwise a filename candidate is tried.
    pub fn extract(&self, raw_text: &str, locator: &dyn Locator) -> Argument {
        if let Some(folder) = self.extract_folder_name(raw_text) {
            return Argument::Folder(folder);
        }
        match self.extract_filename(raw_text, locator) {
            Some(name) => Argument::File(name),
            None => Argument::None,
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, ZuriError> {
    Regex::new(pattern).map_err(|e| ZuriError::Pattern(e.to_string()))
}
