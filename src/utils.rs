/*!
 * Utility functions for projsnap
 */

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Lowercase an extension and give it a leading dot; `""` stays `""`
pub fn normalize_ext(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.is_empty() || ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Extension of a file name in the same form as [`normalize_ext`]
pub fn extension_of(name: &str) -> String {
    match Path::new(name).extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy().to_lowercase()),
        _ => String::new(),
    }
}

/// Fence language for a file name, if its extension is known
pub fn language_for(name: &str) -> Option<&'static str> {
    LANGUAGES.get(extension_of(name).as_str()).copied()
}

/// Shortest backtick fence (at least three) that does not occur in `content`
pub fn fence_for(content: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in content.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat(longest.max(2) + 1)
}

/// Default extension allow-list; `""` admits files without an extension
pub static DEFAULT_INCLUDE_EXTS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        ".py", ".json", ".test", ".sh", ".toml", ".yml", ".yaml", ".cfg", ".ini", ".html", "",
    ]
});

/// Default directory names never descended into
pub static DEFAULT_EXCLUDE_DIRS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "__pycache__",
        ".git",
        ".venv",
        "venv",
        ".idea",
        ".mypy_cache",
        "data",
        "bu",
        "bootstrap",
        "out",
        "config",
        ".ipynb_checkpoints",
        "assets",
        ".pytest_cache",
    ]
});

/// Default file names never included
pub static DEFAULT_EXCLUDE_FILES: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["scratch.json", "scratch.py"]);

/// Extension to fence language
static LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (".test", "test"),
        (".py", "python"),
        (".md", "markdown"),
        (".json", "json"),
        (".toml", "toml"),
        (".yml", "yaml"),
        (".yaml", "yaml"),
        (".txt", "text"),
        (".cfg", "ini"),
        (".ini", "ini"),
        (".html", "html"),
        (".css", "css"),
        (".sh", "bash"),
        (".rs", "rust"),
        (".go", "go"),
        (".js", "javascript"),
        (".ts", "typescript"),
        (".tsx", "tsx"),
        (".jsx", "jsx"),
        (".c", "c"),
        (".h", "c"),
        (".cpp", "cpp"),
        (".hpp", "cpp"),
        (".java", "java"),
        (".rb", "ruby"),
        (".sql", "sql"),
        (".xml", "xml"),
    ])
});
