/*!
 * Path filtering
 *
 * Rules are checked in a fixed order and the first one that applies decides.
 *
 * Directories: excluded name, dot-directory policy, gitignore.
 *
 * Files: gitignore, excluded name, dot-file policy, exclude globs, include
 * globs, extension allow-list.
 *
 * Dot entries are hidden unless an include rule names them explicitly: an
 * include glob segment starting with `.` that matches the name, or (files
 * only) the full name listed in the extension set.
 *
 * Globs without a `/` are matched against the basename, globs with a `/`
 * against the `/`-separated path relative to the scan root.
 */

use std::collections::BTreeSet;
use std::path::Path;

use glob_match::glob_match;

use crate::config::ScanConfig;
use crate::gitignore::GitignoreRuleSet;
use crate::types::EntryKind;
use crate::utils::extension_of;

/// Outcome of filtering one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Include,
    /// Directory is neither listed nor descended into
    ExcludeDir,
    ExcludeFile,
}

/// Decides which entries belong in a snapshot
#[derive(Debug, Clone)]
pub struct PathFilter {
    include_exts: BTreeSet<String>,
    exclude_dirs: BTreeSet<String>,
    exclude_files: BTreeSet<String>,
    include_globs: Vec<String>,
    exclude_globs: Vec<String>,
    gitignore: GitignoreRuleSet,
}

impl PathFilter {
    /// Build a filter from a resolved config and the rules to honour.
    ///
    /// Pass [`GitignoreRuleSet::empty`] when `respect_gitignore` is off.
    pub fn new(config: &ScanConfig, gitignore: GitignoreRuleSet) -> Self {
        Self {
            include_exts: config.include_exts.clone(),
            exclude_dirs: config.exclude_dirs.clone(),
            exclude_files: config.exclude_files.clone(),
            include_globs: config.include_globs.clone(),
            exclude_globs: config.exclude_globs.clone(),
            gitignore,
        }
    }

    /// Decide whether `path` (absolute) with root-relative path `rel` is part of the snapshot
    pub fn decide(&self, path: &Path, kind: EntryKind, rel: &str) -> Decision {
        let name = rel.rsplit('/').next().unwrap_or(rel);

        match kind {
            EntryKind::Directory => self.decide_dir(path, name),
            EntryKind::File => self.decide_file(path, name, rel),
        }
    }

    fn decide_dir(&self, path: &Path, name: &str) -> Decision {
        if self.exclude_dirs.contains(name) {
            return Decision::ExcludeDir;
        }
        if name.starts_with('.') && !self.glob_names_dotfile(name) {
            return Decision::ExcludeDir;
        }
        if self.gitignore.is_ignored(path, true) {
            return Decision::ExcludeDir;
        }
        Decision::Include
    }

    fn decide_file(&self, path: &Path, name: &str, rel: &str) -> Decision {
        if self.gitignore.is_ignored(path, false) {
            return Decision::ExcludeFile;
        }
        if self.exclude_files.contains(name) {
            return Decision::ExcludeFile;
        }

        let dotfile = name.starts_with('.');
        if dotfile && !self.ext_names_dotfile(name) && !self.glob_names_dotfile(name) {
            return Decision::ExcludeFile;
        }

        if self
            .exclude_globs
            .iter()
            .any(|pattern| matches_glob(pattern, name, rel))
        {
            return Decision::ExcludeFile;
        }

        if !self.include_globs.is_empty()
            && !self
                .include_globs
                .iter()
                .any(|pattern| matches_glob(pattern, name, rel))
        {
            return Decision::ExcludeFile;
        }

        if !self.include_exts.is_empty()
            && !self.include_exts.contains(&extension_of(name))
            && !(dotfile && self.ext_names_dotfile(name))
        {
            return Decision::ExcludeFile;
        }

        Decision::Include
    }

    /// `.env` listed verbatim in the extension set opts the dotfile in
    fn ext_names_dotfile(&self, name: &str) -> bool {
        self.include_exts.contains(&name.to_lowercase())
    }

    /// An include glob with a segment like `.github` or `.*` matching the name
    fn glob_names_dotfile(&self, name: &str) -> bool {
        self.include_globs.iter().any(|pattern| {
            pattern
                .split('/')
                .any(|segment| segment.starts_with('.') && glob_match(segment, name))
        })
    }
}

fn matches_glob(pattern: &str, name: &str, rel: &str) -> bool {
    if pattern.contains('/') {
        glob_match(pattern, rel)
    } else {
        glob_match(pattern, name)
    }
}
