/*!
 * Reporting functionality for projsnap
 *
 * Prints a summary of a snapshot run to the console using the tabled
 * library for consistent table rendering.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::{RunStats, Snapshot};
use crate::utils::format_file_size;

/// Size and path of one included file
#[derive(Debug, Clone)]
pub struct FileReportInfo {
    pub path: String,
    pub size: u64,
    pub truncated: bool,
}

/// Statistics for a snapshot run
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Output file path
    pub output_file: String,
    /// Time taken to scan and write
    pub duration: Duration,
    /// Walk counters
    pub stats: RunStats,
    /// Total bytes of included files
    pub included_bytes: u64,
    /// Total characters written into sections
    pub total_chars: usize,
    /// Included files in walk order
    pub files: Vec<FileReportInfo>,
}

impl ScanReport {
    /// Collect report data from a finished snapshot
    pub fn from_snapshot(snapshot: &Snapshot, output_file: String, duration: Duration) -> Self {
        Self {
            output_file,
            duration,
            stats: snapshot.stats,
            included_bytes: snapshot.included_bytes(),
            total_chars: snapshot.included_chars(),
            files: snapshot
                .sections
                .iter()
                .map(|s| FileReportInfo {
                    path: s.path.clone(),
                    size: s.size,
                    truncated: s.truncated,
                })
                .collect(),
        }
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for snapshot runs
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ScanReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ScanReport) {
        println!("\n{}", self.generate_report(report));
    }

    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.stats;
        let rows = vec![
            SummaryRow {
                key: "Output File".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "Files Included".to_string(),
                value: self.format_number(stats.files_included),
            },
            SummaryRow {
                key: "Files Truncated".to_string(),
                value: self.format_number(stats.files_truncated),
            },
            SummaryRow {
                key: "Skipped (binary/unreadable)".to_string(),
                value: self.format_number(stats.files_skipped_binary),
            },
            SummaryRow {
                key: "Skipped (filtered)".to_string(),
                value: self.format_number(stats.files_skipped_filtered),
            },
            SummaryRow {
                key: "Directories Visited".to_string(),
                value: self.format_number(stats.dirs_visited),
            },
            SummaryRow {
                key: "Included Size".to_string(),
                value: format_file_size(report.included_bytes),
            },
            SummaryRow {
                key: "LLM Tokens".to_string(),
                value: format!(
                    "{} tokens (estimated)",
                    self.format_number(report.total_chars / 4)
                ),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Size")]
            size: String,

            #[tabled(rename = "Truncated")]
            truncated: String,
        }

        // Largest first
        let mut files: Vec<_> = report.files.iter().collect();
        files.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));

        let files_to_show = if files.len() > 15 {
            &files[0..10]
        } else {
            &files[..]
        };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|info| FileRow {
                path: info.path.clone(),
                size: format_file_size(info.size),
                truncated: (if info.truncated { "yes" } else { "" }).to_string(),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &ScanReport) -> String {
        let summary_table = self.create_summary_table(report);
        let files_table = self.create_files_table(report);

        let files_title = if report.files.len() > 15 {
            "TOP 10 LARGEST FILES"
        } else {
            "INCLUDED FILES"
        };

        format!(
            "{}\n{}\n\nSNAPSHOT COMPLETE\n{}",
            files_title, files_table, summary_table
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(file_count: usize) -> ScanReport {
        ScanReport {
            output_file: "snap.md".to_string(),
            duration: Duration::from_millis(12),
            stats: RunStats {
                files_included: file_count,
                files_skipped_binary: 2,
                ..RunStats::default()
            },
            included_bytes: 2048,
            total_chars: 4000,
            files: (0..file_count)
                .map(|i| FileReportInfo {
                    path: format!("src/file_{:02}.py", i),
                    size: i as u64 * 10,
                    truncated: i == 0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_console_report_contents() {
        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&report(3));
        assert!(text.contains("INCLUDED FILES"));
        assert!(text.contains("src/file_02.py"));
        assert!(text.contains("snap.md"));
        assert!(text.contains("2.00 KB"));
        assert!(text.contains("1.0K tokens (estimated)"));
    }

    #[test]
    fn test_large_reports_show_top_ten() {
        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&report(20));
        assert!(text.contains("TOP 10 LARGEST FILES"));
        assert!(text.contains("src/file_19.py"));
        assert!(!text.contains("src/file_00.py"));
    }
}
