/*!
 * projsnap - Generate a Markdown snapshot of a source tree for LLM context
 *
 * This library walks a directory once, filters its entries, and produces an
 * ASCII tree plus size-bounded, fenced file contents as a single document.
 */

pub mod config;
pub mod detect;
pub mod error;
pub mod filter;
pub mod gitignore;
pub mod report;
pub mod scanner;
pub mod tree;
pub mod truncate;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use config::{Args, Config, FileConfig, ScanConfig};
pub use detect::{BinaryDetector, HeuristicDetector};
pub use error::{Result, SnapshotError};
pub use filter::{Decision, PathFilter};
pub use gitignore::{GitignoreRule, GitignoreRuleSet};
pub use report::{FileReportInfo, ReportFormat, Reporter, ScanReport};
pub use scanner::{snapshot, Scanner};
pub use truncate::{Rendered, Truncator, TRUNCATION_MARKER};
pub use types::{EntryKind, FileSection, RunStats, SkipReason, Snapshot, TreeNode};
pub use utils::format_file_size;
pub use writer::MarkdownWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
