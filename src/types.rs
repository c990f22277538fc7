/*!
 * Core types and data structures for projsnap
 */

use std::path::PathBuf;

/// Kind of a filesystem entry as seen by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Directory containing other entries
    Directory,
    /// Anything that is not a directory (regular files, symlinks, ...)
    File,
}

/// One filesystem entry that survived filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Entry basename
    pub name: String,
    /// Entry kind
    pub kind: EntryKind,
    /// Children in walk order; always empty for files
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a directory node
    pub fn directory(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
            children,
        }
    }

    /// Create a file node
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            children: Vec::new(),
        }
    }

    /// Whether this node is a directory
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// One included file, ready for the document writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSection {
    /// Relative path from the scan root, `/`-separated
    pub path: String,
    /// Fence language inferred from the extension
    pub language: Option<&'static str>,
    /// Rendered (possibly truncated) content
    pub content: String,
    /// Whether head/tail truncation was applied
    pub truncated: bool,
    /// Whether the file was classified binary.
    ///
    /// Always false for sections a scan returns: binary files are listed in
    /// the tree and counted in [`RunStats::files_skipped_binary`] instead.
    pub skipped_binary: bool,
    /// Original size in bytes
    pub size: u64,
}

/// Counters collected during a single scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub files_included: usize,
    pub files_truncated: usize,
    pub files_skipped_binary: usize,
    pub files_skipped_filtered: usize,
    pub dirs_visited: usize,
}

/// Why a file did not make it into the sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Filtered,
    Binary,
    Unreadable,
}

/// Result of a scan
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Absolute scan root
    pub root_path: PathBuf,
    /// Filtered directory structure
    pub root: TreeNode,
    /// Rendered ASCII tree
    pub tree_lines: Vec<String>,
    /// Included files in walk order
    pub sections: Vec<FileSection>,
    /// Run statistics
    pub stats: RunStats,
}

impl Snapshot {
    /// Sum of the original sizes of all included files
    pub fn included_bytes(&self) -> u64 {
        self.sections.iter().map(|s| s.size).sum()
    }

    /// Number of characters in the rendered sections
    pub fn included_chars(&self) -> usize {
        self.sections.iter().map(|s| s.content.chars().count()).sum()
    }
}
