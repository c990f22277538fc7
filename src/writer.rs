/*!
 * Markdown writer implementation for projsnap
 */

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::{FileSection, RunStats, Snapshot};
use crate::utils::{fence_for, format_file_size};

/// Markdown writer for snapshots
pub struct MarkdownWriter {
    /// Append the stats section
    show_stats: bool,
}

impl MarkdownWriter {
    /// Create a new Markdown writer
    pub fn new(show_stats: bool) -> Self {
        Self { show_stats }
    }

    /// Write the snapshot to `path`, creating parent directories as needed
    pub fn write(&self, snapshot: &Snapshot, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(self.render(snapshot).as_bytes())?;
        writer.flush()?;

        log::debug!("Wrote snapshot to {}", path.display());
        Ok(())
    }

    /// Render the whole document
    pub fn render(&self, snapshot: &Snapshot) -> String {
        let mut out = String::new();

        out.push_str("# Project Snapshot\n\n");
        out.push_str("## Directory Tree\n\n");
        out.push_str("```text\n");
        for line in &snapshot.tree_lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("```\n\n");

        for section in &snapshot.sections {
            self.write_section(section, &mut out);
        }

        if self.show_stats {
            self.write_stats(&snapshot.stats, &mut out);
        }

        out
    }

    /// Write one file heading and fenced block
    fn write_section(&self, section: &FileSection, out: &mut String) {
        let content = section.content.trim_matches(|c| c == '\n' || c == '\r');
        let fence = fence_for(content);
        let annotation = if section.truncated {
            format!("{}, truncated", format_file_size(section.size))
        } else {
            format_file_size(section.size)
        };

        let _ = writeln!(out, "## {} ({})", section.path, annotation);
        let _ = writeln!(out, "{}{}", fence, section.language.unwrap_or(""));
        if !content.is_empty() {
            out.push_str(content);
            out.push('\n');
        }
        let _ = writeln!(out, "{}\n", fence);
    }

    /// Write the stats section
    fn write_stats(&self, stats: &RunStats, out: &mut String) {
        out.push_str("---\n");
        out.push_str("## Snapshot Stats\n\n");
        let _ = writeln!(out, "- files_included: {}", stats.files_included);
        let _ = writeln!(out, "- files_truncated: {}", stats.files_truncated);
        let _ = writeln!(out, "- files_skipped_binary: {}", stats.files_skipped_binary);
        let _ = writeln!(out, "- files_skipped_filtered: {}", stats.files_skipped_filtered);
        let _ = writeln!(out, "- dirs_visited: {}", stats.dirs_visited);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TreeNode;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn sample() -> Snapshot {
        Snapshot {
            root_path: PathBuf::from("/proj"),
            root: TreeNode::directory("proj", vec![TreeNode::file("a.py")]),
            tree_lines: vec!["proj".to_string(), "`-- a.py".to_string()],
            sections: vec![FileSection {
                path: "a.py".to_string(),
                language: Some("python"),
                content: "print('hi')\n".to_string(),
                truncated: false,
                skipped_binary: false,
                size: 12,
            }],
            stats: RunStats {
                files_included: 1,
                ..RunStats::default()
            },
        }
    }

    #[test]
    fn test_render_document() {
        let doc = MarkdownWriter::new(true).render(&sample());
        let expected = "# Project Snapshot\n\n\
## Directory Tree\n\n\
```text\nproj\n`-- a.py\n```\n\n\
## a.py (12 bytes)\n```python\nprint('hi')\n```\n\n\
---\n## Snapshot Stats\n\n\
- files_included: 1\n\
- files_truncated: 0\n\
- files_skipped_binary: 0\n\
- files_skipped_filtered: 0\n\
- dirs_visited: 0\n";
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_stats_can_be_hidden() {
        let doc = MarkdownWriter::new(false).render(&sample());
        assert!(!doc.contains("Snapshot Stats"));
        assert!(doc.ends_with("```\n\n"));
    }

    #[test]
    fn test_truncated_annotation_and_plain_fence() {
        let mut snapshot = sample();
        snapshot.sections[0] = FileSection {
            path: "bin/run".to_string(),
            language: None,
            content: "a\n... [truncated] ...\nz".to_string(),
            truncated: true,
            skipped_binary: false,
            size: 4096,
        };
        let doc = MarkdownWriter::new(false).render(&snapshot);
        assert!(doc.contains("## bin/run (4.00 KB, truncated)\n```\na\n"));
    }

    #[test]
    fn test_fence_grows_around_backticks() {
        let mut snapshot = sample();
        snapshot.sections[0].content = "```rust\nfn main() {}\n```".to_string();
        let doc = MarkdownWriter::new(false).render(&snapshot);
        assert!(doc.contains("````python\n```rust\nfn main() {}\n```\n````\n"));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshots").join("out.md");
        MarkdownWriter::new(true).write(&sample(), &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Project Snapshot"));
    }
}
