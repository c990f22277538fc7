/*!
 * Directory and file scanning functionality
 */

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;
use crate::detect::{BinaryDetector, HeuristicDetector, SAMPLE_SIZE};
use crate::error::{Result, SnapshotError};
use crate::filter::{Decision, PathFilter};
use crate::gitignore::GitignoreRuleSet;
use crate::tree;
use crate::truncate::Truncator;
use crate::types::{EntryKind, FileSection, RunStats, SkipReason, Snapshot, TreeNode};
use crate::utils::language_for;

/// Sections and counters accumulated during one walk
#[derive(Default)]
struct WalkState {
    sections: Vec<FileSection>,
    stats: RunStats,
}

/// Scanner for directory contents
pub struct Scanner {
    /// Scanner configuration
    config: ScanConfig,
    /// Text/binary classification strategy
    detector: Box<dyn BinaryDetector>,
    /// Progress spinner
    progress: ProgressBar,
}

impl Scanner {
    /// Create a new scanner with the default binary heuristic and no progress output
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            detector: Box::new(HeuristicDetector::default()),
            progress: ProgressBar::hidden(),
        }
    }

    /// Replace the binary detection strategy
    pub fn with_detector(mut self, detector: impl BinaryDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Report progress on the given bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Scan the configured root and return the snapshot
    ///
    /// Fails only when the root is missing or not a directory; every
    /// per-file problem is counted in the stats instead.
    pub fn scan(&self) -> Result<Snapshot> {
        let abs_path = self.validate_root()?;
        let root_name = abs_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| abs_path.display().to_string());

        let filter = PathFilter::new(&self.config, self.load_gitignore(&abs_path));
        let truncator = Truncator::new(
            self.config.max_bytes,
            self.config.head_lines,
            self.config.tail_lines,
        );

        let mut state = WalkState::default();
        let children = self.scan_directory(&filter, &truncator, &abs_path, "", &mut state);
        let root = TreeNode::directory(root_name, children);
        let tree_lines = tree::render(&root);

        log::debug!(
            "Scan of {} finished: {:?}",
            abs_path.display(),
            state.stats
        );

        Ok(Snapshot {
            root_path: abs_path,
            root,
            tree_lines,
            sections: state.sections,
            stats: state.stats,
        })
    }

    fn validate_root(&self) -> Result<PathBuf> {
        let root = &self.config.root;
        let metadata =
            fs::metadata(root).map_err(|_| SnapshotError::RootNotFound(root.clone()))?;
        if !metadata.is_dir() {
            return Err(SnapshotError::NotADirectory(root.clone()));
        }
        Ok(fs::canonicalize(root)?)
    }

    fn load_gitignore(&self, root: &Path) -> GitignoreRuleSet {
        if !self.config.respect_gitignore {
            return GitignoreRuleSet::empty();
        }
        match GitignoreRuleSet::load(root) {
            Ok(rules) => rules,
            Err(e) => {
                log::warn!("Ignoring unreadable .gitignore: {}", e);
                GitignoreRuleSet::empty()
            }
        }
    }

    /// Scan one directory level and return its surviving children
    fn scan_directory(
        &self,
        filter: &PathFilter,
        truncator: &Truncator,
        abs_path: &Path,
        rel_path: &str,
        state: &mut WalkState,
    ) -> Vec<TreeNode> {
        let mut contents = Vec::new();

        let entries = WalkDir::new(abs_path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Error reading entry in {}: {}", abs_path.display(), e);
                    None
                }
            });

        for entry in entries {
            let entry_name = entry.file_name().to_string_lossy().to_string();
            let new_rel_path = if rel_path.is_empty() {
                entry_name.clone()
            } else {
                format!("{}/{}", rel_path, entry_name)
            };
            let kind = entry_kind(&entry);

            match (kind, filter.decide(entry.path(), kind, &new_rel_path)) {
                (EntryKind::Directory, Decision::Include) => {
                    state.stats.dirs_visited += 1;
                    let children =
                        self.scan_directory(filter, truncator, entry.path(), &new_rel_path, state);
                    contents.push(TreeNode::directory(entry_name, children));
                }
                (EntryKind::Directory, _) => {
                    log::debug!("Skipping directory {}", new_rel_path);
                }
                (EntryKind::File, Decision::Include) => {
                    contents.push(TreeNode::file(entry_name));
                    match self.process_file(truncator, entry.path(), &new_rel_path) {
                        Ok(section) => {
                            state.stats.files_included += 1;
                            if section.truncated {
                                state.stats.files_truncated += 1;
                            }
                            state.sections.push(section);
                        }
                        Err(reason) => {
                            log::debug!("Skipping {} ({:?})", new_rel_path, reason);
                            state.stats.files_skipped_binary += 1;
                        }
                    }
                }
                (EntryKind::File, _) => {
                    log::debug!("Skipping {} ({:?})", new_rel_path, SkipReason::Filtered);
                    state.stats.files_skipped_filtered += 1;
                }
            }
        }

        contents
    }

    /// Read, classify and render a single file
    fn process_file(
        &self,
        truncator: &Truncator,
        abs_path: &Path,
        rel_path: &str,
    ) -> std::result::Result<FileSection, SkipReason> {
        self.progress.inc(1);
        self.progress.set_message(rel_path.to_string());

        // Opening a FIFO or device would block or never end; follow links, read only regular files
        let metadata = fs::metadata(abs_path).map_err(|e| {
            log::debug!("Cannot stat {}: {}", abs_path.display(), e);
            SkipReason::Unreadable
        })?;
        if !metadata.is_file() {
            log::debug!("Not a regular file: {}", abs_path.display());
            return Err(SkipReason::Unreadable);
        }

        let mut file = File::open(abs_path).map_err(|e| {
            log::debug!("Cannot open {}: {}", abs_path.display(), e);
            SkipReason::Unreadable
        })?;

        let mut bytes = Vec::new();
        file.by_ref()
            .take(SAMPLE_SIZE as u64)
            .read_to_end(&mut bytes)
            .map_err(|_| SkipReason::Unreadable)?;

        if self.detector.is_binary(&bytes) {
            return Err(SkipReason::Binary);
        }

        file.read_to_end(&mut bytes)
            .map_err(|_| SkipReason::Unreadable)?;
        let size = bytes.len() as u64;
        let text = String::from_utf8(bytes).map_err(|_| SkipReason::Unreadable)?;

        let rendered = truncator.render(&text);
        let name = rel_path.rsplit('/').next().unwrap_or(rel_path);

        Ok(FileSection {
            path: rel_path.to_string(),
            language: language_for(name),
            content: rendered.content,
            truncated: rendered.truncated,
            skipped_binary: false,
            size,
        })
    }
}

/// Scan `config.root` with the default detector
pub fn snapshot(config: &ScanConfig) -> Result<Snapshot> {
    Scanner::new(config.clone()).scan()
}

/// Symlinks are not followed; anything that is not a real directory is a file
fn entry_kind(entry: &DirEntry) -> EntryKind {
    if entry.file_type().is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    }
}
