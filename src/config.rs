/*!
 * Configuration handling for projsnap
 *
 * Three layers feed a run: command-line arguments, an optional config file
 * (TOML, JSON or INI) and built-in defaults. For every option the CLI value
 * wins over the file value, which wins over the default. The scanner only
 * ever sees the fully resolved [`ScanConfig`].
 */

use std::collections::{BTreeSet, HashMap};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use clap::Parser;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Result, ResultExt};
use crate::utils::{
    normalize_ext, DEFAULT_EXCLUDE_DIRS, DEFAULT_EXCLUDE_FILES, DEFAULT_INCLUDE_EXTS,
};
use crate::{bail, ensure};

/// Lines kept from the start of a truncated file unless configured
pub const DEFAULT_HEAD_LINES: usize = 200;

/// Lines kept from the end of a truncated file unless configured
pub const DEFAULT_TAIL_LINES: usize = 80;

/// Output file template used when neither `--out` nor a template is given
pub const DEFAULT_OUT_TEMPLATE: &str = "snapshots/{label}_{date}_{time}.md";

/// Label substituted into the output template unless configured
pub const DEFAULT_LABEL: &str = "snapshot";

static ENV_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(?:\{(\w+)\}|(\w+))").expect("valid env var regex"));

static LIST_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,]+").expect("valid list separator regex"));

/// Command-line arguments for projsnap
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "projsnap",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate a Markdown project snapshot for LLMs",
    long_about = "Writes a single Markdown document containing an ASCII directory tree followed by the (size-bounded) contents of the selected files."
)]
pub struct Args {
    /// Root directory to scan
    #[clap(long)]
    pub root: Option<String>,

    /// Output markdown file (overrides --out-template)
    #[clap(long)]
    pub out: Option<String>,

    /// Path to config file (TOML/JSON/INI)
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Skip files matched by the nearest .gitignore
    #[clap(long)]
    pub respect_gitignore: bool,

    /// Omit the stats section from the snapshot
    #[clap(long)]
    pub no_stats: bool,

    /// Whitelist of file extensions (e.g. .py .json '')
    #[clap(long, num_args = 0..)]
    pub include_ext: Option<Vec<String>>,

    /// Directory names to exclude
    #[clap(long, num_args = 0..)]
    pub exclude_dir: Option<Vec<String>>,

    /// File names to exclude
    #[clap(long, num_args = 0..)]
    pub exclude_file: Option<Vec<String>>,

    /// Glob(s) a file's relative path must match
    #[clap(long, num_args = 0..)]
    pub include_glob: Option<Vec<String>>,

    /// Glob(s) that exclude a file when matched
    #[clap(long, num_args = 0..)]
    pub exclude_glob: Option<Vec<String>>,

    /// Max bytes per file before head/tail truncation; 0 = unlimited
    #[clap(long)]
    pub max_bytes: Option<u64>,

    /// If truncated, include first N lines
    #[clap(long)]
    pub head_lines: Option<usize>,

    /// If truncated, include last N lines
    #[clap(long)]
    pub tail_lines: Option<usize>,

    /// Label used in the output filename template
    #[clap(long)]
    pub label: Option<String>,

    /// Output filename template, supports {label}, {date}, {time}
    #[clap(long)]
    pub out_template: Option<String>,

    /// Enable debug logging and print resolved options
    #[clap(long)]
    pub debug: bool,

    /// Hide the progress spinner
    #[clap(long)]
    pub no_progress: bool,

    /// Don't print the summary report
    #[clap(long, short = 'q')]
    pub quiet: bool,
}

/// Options read from a config file; every field is optional
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub root: Option<String>,
    pub out: Option<String>,
    pub include_exts: Option<Vec<String>>,
    pub exclude_dirs: Option<Vec<String>>,
    pub exclude_files: Option<Vec<String>>,
    pub include_globs: Option<Vec<String>>,
    pub exclude_globs: Option<Vec<String>>,
    pub respect_gitignore: Option<bool>,
    pub max_bytes: Option<u64>,
    pub head_lines: Option<usize>,
    pub tail_lines: Option<usize>,
    pub show_stats: Option<bool>,
    pub label: Option<String>,
    pub out_template: Option<String>,
}

impl FileConfig {
    /// Load a config file, picking the format from its suffix
    pub fn load(path: &Path) -> Result<Self> {
        ensure!(
            path.is_file(),
            Config,
            "Config file not found: {}",
            path.display()
        );

        let text = fs::read_to_string(path)?;
        let suffix = path
            .extension()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        log::debug!("Loading config from {}", path.display());

        match suffix.as_str() {
            "toml" | "tml" => Ok(toml::from_str(&text)?),
            "json" => Ok(serde_json::from_str(&text)?),
            "ini" | "cfg" => Self::from_ini(&text),
            _ => serde_json::from_str::<Self>(&text).with_context(|| {
                format!("Unsupported config format: {}", path.display())
            }),
        }
    }

    /// Parse INI text: `[DEFAULT]` values overlaid by the `[snapshot]` section
    pub fn from_ini(text: &str) -> Result<Self> {
        let sections = parse_ini(text);
        let mut merged: HashMap<String, String> =
            sections.get("DEFAULT").cloned().unwrap_or_default();
        if let Some(snapshot) = sections.get("snapshot") {
            merged.extend(snapshot.clone());
        }

        let mut map = Map::new();
        for (key, raw) in merged {
            let value = match key.as_str() {
                "include_exts" | "exclude_dirs" | "exclude_files" | "include_globs"
                | "exclude_globs" => Value::from(split_list(&raw)),
                "max_bytes" | "head_lines" | "tail_lines" => {
                    let number: u64 = raw
                        .trim()
                        .parse::<u64>()
                        .with_context(|| format!("Invalid integer for {}", key))?;
                    Value::from(number)
                }
                "respect_gitignore" | "show_stats" => Value::from(parse_bool(&raw)),
                _ => Value::from(raw),
            };
            map.insert(key, value);
        }

        Ok(serde_json::from_value(Value::Object(map))?)
    }
}

/// Fully resolved scan options handed to the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Directory to snapshot
    pub root: PathBuf,
    /// Allowed extensions, lowercase with leading dot; `""` means no extension
    pub include_exts: BTreeSet<String>,
    /// Directory basenames never descended into
    pub exclude_dirs: BTreeSet<String>,
    /// File basenames never included
    pub exclude_files: BTreeSet<String>,
    /// Globs a file must match (if any are given)
    pub include_globs: Vec<String>,
    /// Globs that exclude a file
    pub exclude_globs: Vec<String>,
    /// Apply the nearest .gitignore
    pub respect_gitignore: bool,
    /// Byte cap per file; 0 = unlimited
    pub max_bytes: u64,
    /// Lines kept from the start of a truncated file
    pub head_lines: usize,
    /// Lines kept from the end of a truncated file
    pub tail_lines: usize,
    /// Emit the stats section
    pub show_stats: bool,
}

impl ScanConfig {
    /// A permissive configuration: no filters, no truncation
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_exts: BTreeSet::new(),
            exclude_dirs: BTreeSet::new(),
            exclude_files: BTreeSet::new(),
            include_globs: Vec::new(),
            exclude_globs: Vec::new(),
            respect_gitignore: false,
            max_bytes: 0,
            head_lines: DEFAULT_HEAD_LINES,
            tail_lines: DEFAULT_TAIL_LINES,
            show_stats: true,
        }
    }

    pub fn include_exts<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.include_exts = exts.into_iter().map(|e| normalize_ext(e.as_ref())).collect();
        self
    }

    pub fn exclude_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_globs<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_globs = globs.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_globs<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_globs = globs.into_iter().map(Into::into).collect();
        self
    }

    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Set the byte cap and head/tail line budgets in one go
    pub fn limits(mut self, max_bytes: u64, head_lines: usize, tail_lines: usize) -> Self {
        self.max_bytes = max_bytes;
        self.head_lines = head_lines;
        self.tail_lines = tail_lines;
        self
    }

    pub fn show_stats(mut self, show: bool) -> Self {
        self.show_stats = show;
        self
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Resolved scan options
    pub scan: ScanConfig,
    /// Where the snapshot is written
    pub output_file: PathBuf,
    /// Show the progress spinner
    pub show_progress: bool,
    /// Print the summary report
    pub show_report: bool,
}

impl Config {
    /// Create configuration from command-line arguments, loading `--config` if given
    pub fn from_args(args: Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file, Local::now())
    }

    /// Merge CLI arguments over file values over defaults
    pub fn merge(args: Args, file: FileConfig, now: DateTime<Local>) -> Result<Self> {
        let root = args
            .root
            .or(file.root)
            .unwrap_or_else(|| ".".to_string());

        let include_exts = args
            .include_ext
            .or(file.include_exts)
            .unwrap_or_else(|| owned(&DEFAULT_INCLUDE_EXTS));
        let exclude_dirs = args
            .exclude_dir
            .or(file.exclude_dirs)
            .unwrap_or_else(|| owned(&DEFAULT_EXCLUDE_DIRS));
        let exclude_files = args
            .exclude_file
            .or(file.exclude_files)
            .unwrap_or_else(|| owned(&DEFAULT_EXCLUDE_FILES));

        let scan = ScanConfig::new(expand_path(&root))
            .include_exts(include_exts)
            .exclude_dirs(exclude_dirs)
            .exclude_files(exclude_files)
            .include_globs(args.include_glob.or(file.include_globs).unwrap_or_default())
            .exclude_globs(args.exclude_glob.or(file.exclude_globs).unwrap_or_default())
            .respect_gitignore(
                args.respect_gitignore
                    .then_some(true)
                    .or(file.respect_gitignore)
                    .unwrap_or(false),
            )
            .limits(
                args.max_bytes.or(file.max_bytes).unwrap_or(0),
                args.head_lines
                    .or(file.head_lines)
                    .unwrap_or(DEFAULT_HEAD_LINES),
                args.tail_lines
                    .or(file.tail_lines)
                    .unwrap_or(DEFAULT_TAIL_LINES),
            )
            .show_stats(
                args.no_stats
                    .then_some(false)
                    .or(file.show_stats)
                    .unwrap_or(true),
            );

        let output_file = output_path(
            args.out.or(file.out),
            args.out_template.or(file.out_template),
            args.label.or(file.label),
            now,
        );

        if output_file.as_os_str().is_empty() {
            bail!(InvalidArgument, "Output file path is empty");
        }

        Ok(Self {
            scan,
            output_file,
            show_progress: !args.no_progress,
            show_report: !args.quiet,
        })
    }
}

/// Resolve the output path from `--out` or the filename template
pub fn output_path(
    out: Option<String>,
    template: Option<String>,
    label: Option<String>,
    now: DateTime<Local>,
) -> PathBuf {
    if let Some(out) = out.filter(|o| !o.trim().is_empty()) {
        return PathBuf::from(out);
    }

    let template = template.unwrap_or_else(|| DEFAULT_OUT_TEMPLATE.to_string());
    let label = label.unwrap_or_else(|| DEFAULT_LABEL.to_string());

    PathBuf::from(
        template
            .replace("{label}", &label)
            .replace("{date}", &now.format("%Y%m%d").to_string())
            .replace("{time}", &now.format("%H%M%S").to_string()),
    )
}

/// Expand `~` and `$VAR` / `${VAR}` and make the path absolute when it exists
pub fn expand_path(raw: &str) -> PathBuf {
    let raw = raw.trim();
    let raw = if raw.is_empty() { "." } else { raw };

    // Unknown variables are left untouched
    let with_vars = ENV_VAR.replace_all(raw, |caps: &Captures| {
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        env::var(name).unwrap_or_else(|_| caps[0].to_string())
    });

    let expanded = match with_vars.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches('/')),
            None => PathBuf::from(with_vars.as_ref()),
        },
        _ => PathBuf::from(with_vars.as_ref()),
    };

    fs::canonicalize(&expanded).unwrap_or(expanded)
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn split_list(raw: &str) -> Vec<String> {
    LIST_SEPARATOR
        .split(raw.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Minimal INI reader: sections, `key = value` / `key: value`, `#` and `;` comments
fn parse_ini(text: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current = "DEFAULT".to_string();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = name.trim().to_string();
            continue;
        }

        if let Some(idx) = line.find(&['=', ':'][..]) {
            let key = line[..idx].trim().to_lowercase();
            let value = line[idx + 1..].trim().to_string();
            sections.entry(current.clone()).or_default().insert(key, value);
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::merge(Args::default(), FileConfig::default(), fixed_now()).unwrap();
        let scan = &config.scan;

        assert!(scan.include_exts.contains(".py"));
        assert!(scan.include_exts.contains(""));
        assert!(scan.exclude_dirs.contains(".git"));
        assert!(scan.exclude_files.contains("scratch.py"));
        assert!(scan.include_globs.is_empty());
        assert!(!scan.respect_gitignore);
        assert_eq!(scan.max_bytes, 0);
        assert_eq!(scan.head_lines, DEFAULT_HEAD_LINES);
        assert_eq!(scan.tail_lines, DEFAULT_TAIL_LINES);
        assert!(scan.show_stats);
        assert_eq!(
            config.output_file,
            PathBuf::from("snapshots/snapshot_20240309_070501.md")
        );
    }

    #[test]
    fn test_cli_overrides_file() {
        let args = Args {
            include_ext: Some(vec!["rs".to_string()]),
            max_bytes: Some(10),
            no_stats: true,
            out: Some("out.md".to_string()),
            ..Args::default()
        };
        let file = FileConfig {
            include_exts: Some(vec![".py".to_string()]),
            max_bytes: Some(99),
            head_lines: Some(3),
            show_stats: Some(true),
            respect_gitignore: Some(true),
            ..FileConfig::default()
        };

        let config = Config::merge(args, file, fixed_now()).unwrap();
        let scan = &config.scan;

        assert_eq!(scan.include_exts, BTreeSet::from([".rs".to_string()]));
        assert_eq!(scan.max_bytes, 10);
        assert_eq!(scan.head_lines, 3);
        assert!(!scan.show_stats);
        assert!(scan.respect_gitignore);
        assert_eq!(config.output_file, PathBuf::from("out.md"));
    }

    #[test]
    fn test_empty_cli_list_overrides_file_list() {
        let args = Args {
            exclude_dir: Some(vec![]),
            ..Args::default()
        };
        let file = FileConfig {
            exclude_dirs: Some(vec!["target".to_string()]),
            ..FileConfig::default()
        };
        let config = Config::merge(args, file, fixed_now()).unwrap();
        assert!(config.scan.exclude_dirs.is_empty());
    }

    #[test]
    fn test_output_template() {
        let path = output_path(
            None,
            Some("dumps/{label}-{date}.md".to_string()),
            Some("api".to_string()),
            fixed_now(),
        );
        assert_eq!(path, PathBuf::from("dumps/api-20240309.md"));
    }

    #[test]
    fn test_load_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.config.toml");
        fs::write(
            &path,
            r#"
root = "./app"
include_exts = [".py", ""]
exclude_globs = ["**/migrations/**"]
respect_gitignore = true
max_bytes = 300000
head_lines = 20
"#,
        )
        .unwrap();

        let config = FileConfig::load(&path).unwrap();
        assert_eq!(config.root.as_deref(), Some("./app"));
        assert_eq!(
            config.include_exts,
            Some(vec![".py".to_string(), String::new()])
        );
        assert_eq!(
            config.exclude_globs,
            Some(vec!["**/migrations/**".to_string()])
        );
        assert_eq!(config.respect_gitignore, Some(true));
        assert_eq!(config.max_bytes, Some(300000));
        assert_eq!(config.head_lines, Some(20));
        assert_eq!(config.tail_lines, None);
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, r#"{"exclude_files": ["a.py"], "show_stats": false}"#).unwrap();

        let config = FileConfig::load(&path).unwrap();
        assert_eq!(config.exclude_files, Some(vec!["a.py".to_string()]));
        assert_eq!(config.show_stats, Some(false));
    }

    #[test]
    fn test_load_ini() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.ini");
        fs::write(
            &path,
            "[DEFAULT]\nmax_bytes = 100\nlabel = base\n\n[snapshot]\n; comment\ninclude_exts = .py, .json .sh\nrespect_gitignore = yes\nlabel = api\n",
        )
        .unwrap();

        let config = FileConfig::load(&path).unwrap();
        assert_eq!(config.max_bytes, Some(100));
        assert_eq!(
            config.include_exts,
            Some(vec![
                ".py".to_string(),
                ".json".to_string(),
                ".sh".to_string()
            ])
        );
        assert_eq!(config.respect_gitignore, Some(true));
        assert_eq!(config.label.as_deref(), Some("api"));
    }

    #[test]
    fn test_ini_rejects_bad_integer() {
        let err = FileConfig::from_ini("[snapshot]\nhead_lines = lots\n").unwrap_err();
        assert!(err.to_string().contains("head_lines"));
    }

    #[test]
    fn test_missing_config_file() {
        let err = FileConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_expand_path_env_var() {
        let dir = tempdir().unwrap();
        let canonical = dir.path().canonicalize().unwrap();
        env::set_var("PROJSNAP_TEST_ROOT", canonical.as_os_str());

        assert_eq!(expand_path("$PROJSNAP_TEST_ROOT"), canonical);
        assert_eq!(expand_path("${PROJSNAP_TEST_ROOT}"), canonical);
        assert_eq!(
            expand_path("$PROJSNAP_UNSET_VAR_XYZ/x"),
            PathBuf::from("$PROJSNAP_UNSET_VAR_XYZ/x")
        );
    }
}
