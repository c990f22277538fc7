/*!
 * Command-line interface for projsnap
 */

use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use projsnap::config::{Args, Config};
use projsnap::report::{ReportFormat, Reporter, ScanReport};
use projsnap::scanner::Scanner;
use projsnap::writer::MarkdownWriter;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    init_logging(args.debug);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> projsnap::Result<()> {
    // Create configuration
    let config = Config::from_args(args)?;
    log::debug!("Resolved configuration: {:#?}", config);

    let progress = if config.show_progress {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos} files")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    } else {
        ProgressBar::hidden()
    };

    let start_time = Instant::now();

    let scanner = Scanner::new(config.scan.clone()).with_progress(progress.clone());
    // Invalid roots fail here, before anything is written
    let snapshot = scanner.scan()?;

    let writer = MarkdownWriter::new(config.scan.show_stats);
    writer.write(&snapshot, &config.output_file)?;

    let duration = start_time.elapsed();
    progress.finish_and_clear();

    log::info!(
        "Project snapshot saved to: {}",
        config.output_file.display()
    );

    if config.show_report {
        let report = ScanReport::from_snapshot(
            &snapshot,
            config.output_file.display().to_string(),
            duration,
        );
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    Ok(())
}
