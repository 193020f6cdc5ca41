//! Tiered, pattern-based filesystem search.
//!
//! Resolution precedence (first hit wins, no ranking):
//! 1. Well-known folder alias (folder lookups only) - no traversal.
//! 2. Priority tiers: likely user directories, walked depth-first in
//!    configured order with lexicographic entry ordering so results are
//!    reproducible across platforms and runs.
//! 3. Full-volume fallback over the configured roots, bounded by an
//!    optional deadline and a cancellation flag.
//!
//! Unreadable subtrees never abort a scan; each skip is recorded in the
//! `ScanReport` instead of being silently lost.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::ZuriConfig;
use crate::types::{ResolvedTarget, TargetKind};

/// A subtree the scan could not enter, with the reason it was skipped.
#[derive(Debug, Clone)]
pub struct SkippedSubtree {
    pub path: PathBuf,
    pub reason: String,
}

/// Aggregated observability for one lookup.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub skipped: Vec<SkippedSubtree>,
    /// True when the deadline or cancellation flag stopped the scan
    /// before it completed.
    pub budget_exhausted: bool,
}

/// Result of one lookup: at most one resolved path, plus the report.
#[derive(Debug, Clone)]
pub struct LocateOutcome {
    pub target: Option<ResolvedTarget>,
    pub report: ScanReport,
}

impl LocateOutcome {
    fn miss(report: ScanReport) -> Self {
        Self {
            target: None,
            report,
        }
    }

    fn hit(path: PathBuf, kind: TargetKind, report: ScanReport) -> Self {
        Self {
            target: Some(ResolvedTarget { path, kind }),
            report,
        }
    }
}

/// Filesystem lookup behind a trait so the dispatcher and the
/// extractor's speculative completion can be tested against stubs.
pub trait Locator: Send + Sync {
    /// Resolve `name` to at most one path. Never mutates the
    /// filesystem; idempotent while the filesystem is unchanged.
    fn find(&self, name: &str, kind: TargetKind) -> LocateOutcome;
}

/// Time/cancellation budget for one lookup.
struct ScanBudget {
    deadline: Option<Instant>,
    cancel: Arc<AtomicBool>,
}

impl ScanBudget {
    fn start(timeout: Option<Duration>, cancel: Arc<AtomicBool>) -> Self {
        Self {
            deadline: timeout.map(|t| Instant::now() + t),
            cancel,
        }
    }

    fn exhausted(&self) -> bool {
        if self.cancel.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

/// How one root scan ended.
enum ScanEnd {
    Found(PathBuf),
    NotFound,
    Stopped,
}

/// The production locator: alias shortcut, priority tiers, then the
/// full-volume fallback.
pub struct TieredLocator {
    priority_tiers: Vec<PathBuf>,
    fallback_roots: Vec<PathBuf>,
    folder_aliases: BTreeMap<String, PathBuf>,
    scan_timeout: Option<Duration>,
    cancel: Arc<AtomicBool>,
}

impl TieredLocator {
    pub fn from_config(config: &ZuriConfig) -> Self {
        let scan_timeout = match config.scan_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self {
            priority_tiers: config.priority_tiers.clone(),
            fallback_roots: config.fallback_roots.clone(),
            folder_aliases: config.folder_aliases.clone(),
            scan_timeout,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Locator over explicit roots, no aliases, no timeout. Used by
    /// tests and embedders that manage their own scopes.
    pub fn with_roots(priority_tiers: Vec<PathBuf>, fallback_roots: Vec<PathBuf>) -> Self {
        Self {
            priority_tiers,
            fallback_roots,
            folder_aliases: BTreeMap::new(),
            scan_timeout: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_aliases(mut self, folder_aliases: BTreeMap<String, PathBuf>) -> Self {
        self.folder_aliases = folder_aliases;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.scan_timeout = Some(timeout);
        self
    }

    /// Shared flag that stops any in-flight and future lookups until
    /// cleared. Lets a front end abort a long fallback scan.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn clear_cancel(&self) {
        self.cancel.store(false, Ordering::Relaxed);
    }

    /// Depth-first scan of one root. Entries are visited in
    /// lexicographic order at every level; errors skip the subtree and
    /// are recorded, siblings continue.
    fn scan_root(
        &self,
        root: &Path,
        needle: &str,
        kind: TargetKind,
        budget: &ScanBudget,
        report: &mut ScanReport,
    ) -> ScanEnd {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            if budget.exhausted() {
                return ScanEnd::Stopped;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.to_path_buf());
                    debug!(path = %path.display(), "skipping subtree: {}", err);
                    report.skipped.push(SkippedSubtree {
                        path,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let matches_kind = match kind {
                TargetKind::File => entry.file_type().is_file(),
                // The root itself is the scope, not a candidate
                TargetKind::Folder => entry.file_type().is_dir() && entry.depth() > 0,
            };
            if !matches_kind {
                continue;
            }

            let base = entry.file_name().to_string_lossy().to_lowercase();
            if base.contains(needle) {
                return ScanEnd::Found(entry.into_path());
            }
        }

        ScanEnd::NotFound
    }
}

impl Locator for TieredLocator {
    fn find(&self, name: &str, kind: TargetKind) -> LocateOutcome {
        let mut report = ScanReport::default();
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return LocateOutcome::miss(report);
        }

        // 1. Alias shortcut: a well-known name maps straight to its
        // directory, no pattern search performed.
        if kind == TargetKind::Folder {
            if let Some(dir) = self.folder_aliases.get(&needle) {
                if dir.is_dir() {
                    debug!(alias = %needle, path = %dir.display(), "alias shortcut");
                    return LocateOutcome::hit(dir.clone(), kind, report);
                }
            }
        }

        let budget = ScanBudget::start(self.scan_timeout, Arc::clone(&self.cancel));

        // 2. Priority tiers in configured order.
        for tier in &self.priority_tiers {
            if !tier.exists() {
                continue;
            }
            match self.scan_root(tier, &needle, kind, &budget, &mut report) {
                ScanEnd::Found(path) => return LocateOutcome::hit(path, kind, report),
                ScanEnd::NotFound => {}
                ScanEnd::Stopped => {
                    warn!(name = %needle, "lookup stopped before completing tier scan");
                    report.budget_exhausted = true;
                    return LocateOutcome::miss(report);
                }
            }
        }

        // 3. Full-volume fallback. Potentially very long; the budget is
        // the only thing bounding it.
        for root in &self.fallback_roots {
            if !root.exists() {
                continue;
            }
            debug!(root = %root.display(), name = %needle, "full-volume fallback scan");
            match self.scan_root(root, &needle, kind, &budget, &mut report) {
                ScanEnd::Found(path) => return LocateOutcome::hit(path, kind, report),
                ScanEnd::NotFound => {}
                ScanEnd::Stopped => {
                    warn!(name = %needle, "fallback scan stopped by budget");
                    report.budget_exhausted = true;
                    return LocateOutcome::miss(report);
                }
            }
        }

        LocateOutcome::miss(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_find_file_in_tier() {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path().join("Documents");
        fs::create_dir_all(docs.join("work")).unwrap();
        touch(&docs.join("work").join("resume.pdf"));

        let locator = TieredLocator::with_roots(vec![docs.clone()], vec![]);
        let outcome = locator.find("resume.pdf", TargetKind::File);
        assert_eq!(
            outcome.target.unwrap().path,
            docs.join("work").join("resume.pdf")
        );
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Quarterly-Report-2024.PDF"));

        let locator = TieredLocator::with_roots(vec![tmp.path().to_path_buf()], vec![]);
        let outcome = locator.find("report", TargetKind::File);
        assert!(outcome.target.is_some());
    }

    #[test]
    fn test_tier_precedence_over_fallback() {
        let tier = TempDir::new().unwrap();
        let volume = TempDir::new().unwrap();
        touch(&tier.path().join("notes.txt"));
        touch(&volume.path().join("notes.txt"));

        let locator = TieredLocator::with_roots(
            vec![tier.path().to_path_buf()],
            vec![volume.path().to_path_buf()],
        );
        let outcome = locator.find("notes.txt", TargetKind::File);
        assert_eq!(outcome.target.unwrap().path, tier.path().join("notes.txt"));
    }

    #[test]
    fn test_fallback_used_when_tiers_miss() {
        let tier = TempDir::new().unwrap();
        let volume = TempDir::new().unwrap();
        touch(&volume.path().join("orphan.csv"));

        let locator = TieredLocator::with_roots(
            vec![tier.path().to_path_buf()],
            vec![volume.path().to_path_buf()],
        );
        let outcome = locator.find("orphan.csv", TargetKind::File);
        assert_eq!(outcome.target.unwrap().path, volume.path().join("orphan.csv"));
    }

    #[test]
    fn test_deterministic_first_match() {
        let tmp = TempDir::new().unwrap();
        // Same-directory ties resolve lexicographically
        touch(&tmp.path().join("b-notes.txt"));
        touch(&tmp.path().join("a-notes.txt"));

        let locator = TieredLocator::with_roots(vec![tmp.path().to_path_buf()], vec![]);
        let outcome = locator.find("notes", TargetKind::File);
        assert_eq!(outcome.target.unwrap().path, tmp.path().join("a-notes.txt"));
    }

    #[test]
    fn test_find_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("stable.json"));

        let locator = TieredLocator::with_roots(vec![tmp.path().to_path_buf()], vec![]);
        let first = locator.find("stable", TargetKind::File);
        let second = locator.find("stable", TargetKind::File);
        assert_eq!(first.target, second.target);
    }

    #[test]
    fn test_folder_lookup() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("projects").join("zuri")).unwrap();

        let locator = TieredLocator::with_roots(vec![tmp.path().to_path_buf()], vec![]);
        let outcome = locator.find("zuri", TargetKind::Folder);
        assert_eq!(
            outcome.target.unwrap().path,
            tmp.path().join("projects").join("zuri")
        );
    }

    #[test]
    fn test_alias_shortcut_skips_search() {
        let tmp = TempDir::new().unwrap();
        let music = tmp.path().join("Music");
        fs::create_dir_all(&music).unwrap();

        let mut aliases = BTreeMap::new();
        aliases.insert("music".to_string(), music.clone());

        // No roots at all: only the alias can resolve this
        let locator = TieredLocator::with_roots(vec![], vec![]).with_aliases(aliases);
        let outcome = locator.find("Music", TargetKind::Folder);
        assert_eq!(outcome.target.unwrap().path, music);
    }

    #[test]
    fn test_alias_does_not_apply_to_file_lookups() {
        let tmp = TempDir::new().unwrap();
        let music = tmp.path().join("Music");
        fs::create_dir_all(&music).unwrap();

        let mut aliases = BTreeMap::new();
        aliases.insert("music".to_string(), music);

        let locator = TieredLocator::with_roots(vec![], vec![]).with_aliases(aliases);
        assert!(locator.find("music", TargetKind::File).target.is_none());
    }

    #[test]
    fn test_miss_returns_none() {
        let tmp = TempDir::new().unwrap();
        let locator = TieredLocator::with_roots(vec![tmp.path().to_path_buf()], vec![]);
        assert!(locator.find("nothing-here", TargetKind::File).target.is_none());
    }

    #[test]
    fn test_empty_name_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("anything.txt"));
        let locator = TieredLocator::with_roots(vec![tmp.path().to_path_buf()], vec![]);
        assert!(locator.find("  ", TargetKind::File).target.is_none());
    }

    #[test]
    fn test_cancellation_stops_lookup() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("present.txt"));

        let locator = TieredLocator::with_roots(vec![tmp.path().to_path_buf()], vec![]);
        locator.cancel_handle().store(true, Ordering::Relaxed);

        let outcome = locator.find("present.txt", TargetKind::File);
        assert!(outcome.target.is_none());
        assert!(outcome.report.budget_exhausted);

        locator.clear_cancel();
        assert!(locator.find("present.txt", TargetKind::File).target.is_some());
    }

    #[test]
    fn test_expired_deadline_stops_lookup() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("present.txt"));

        let locator = TieredLocator::with_roots(vec![tmp.path().to_path_buf()], vec![])
            .with_timeout(Duration::ZERO);
        let outcome = locator.find("present.txt", TargetKind::File);
        assert!(outcome.target.is_none());
        assert!(outcome.report.budget_exhausted);
    }
}
