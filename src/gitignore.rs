/*!
 * Gitignore rule loading
 *
 * Rules come from the nearest `.gitignore` at or above the scan root. The
 * search stops at the first directory containing a `.git` entry so a
 * snapshot never picks up rules from an unrelated enclosing repository.
 * Matching is delegated to the `ignore` crate, which implements standard
 * gitignore precedence: the last matching rule wins and `!` re-includes.
 */

use std::fs;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::Result;

/// A single parsed gitignore line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitignoreRule {
    /// Pattern text without the `!` prefix
    pub pattern: String,
    /// Rule starts with `!` and re-includes matches
    pub negated: bool,
    /// Rule ends with `/` and only applies to directories
    pub dir_only: bool,
}

/// Ordered gitignore rules plus the compiled matcher
#[derive(Debug, Clone)]
pub struct GitignoreRuleSet {
    source: Option<PathBuf>,
    rules: Vec<GitignoreRule>,
    matcher: Gitignore,
}

impl Default for GitignoreRuleSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl GitignoreRuleSet {
    /// A rule set that ignores nothing
    pub fn empty() -> Self {
        Self {
            source: None,
            rules: Vec::new(),
            matcher: Gitignore::empty(),
        }
    }

    /// Load the nearest `.gitignore` at or above `root`, or an empty set if there is none
    pub fn load(root: &Path) -> Result<Self> {
        match find_gitignore(root) {
            Some(path) => Self::from_file(&path),
            None => {
                log::debug!("No .gitignore found at or above {}", root.display());
                Ok(Self::empty())
            }
        }
    }

    /// Parse a specific gitignore file; patterns are relative to its directory
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let contents = String::from_utf8_lossy(&bytes);
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut set = Self::parse(base_dir, &contents)?;
        set.source = Some(path.to_path_buf());
        log::debug!(
            "Loaded {} gitignore rules from {}",
            set.rules.len(),
            path.display()
        );
        Ok(set)
    }

    /// Parse gitignore text whose patterns are anchored at `base_dir`
    pub fn parse(base_dir: &Path, contents: &str) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(base_dir);
        let mut rules = Vec::new();

        for line in contents.lines() {
            let trimmed = line.trim_end();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            builder.add_line(None, trimmed)?;

            let (negated, pattern) = match trimmed.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, trimmed),
            };
            rules.push(GitignoreRule {
                pattern: pattern.to_string(),
                negated,
                dir_only: pattern.ends_with('/'),
            });
        }

        Ok(Self {
            source: None,
            rules,
            matcher: builder.build()?,
        })
    }

    /// File the rules were read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Rules in file order
    pub fn rules(&self) -> &[GitignoreRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `path` (absolute, or relative to the rule base) is ignored
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        if self.rules.is_empty() {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(path, is_dir)
            .is_ignore()
    }
}

/// Walk up from `root` looking for a `.gitignore`, stopping at the repository boundary
fn find_gitignore(root: &Path) -> Option<PathBuf> {
    for dir in root.ancestors() {
        let candidate = dir.join(".gitignore");
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").exists() {
            break;
        }
    }
    None
}
