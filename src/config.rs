//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--max-depth`, `--theme`, etc.)
//! 2. `$TMF_CONFIG` environment variable (path to config file)
//! 3. Project-local `.tmf.toml` in the current working directory
//! 4. Global `~/.config/tmf/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::treemap::scan::{ScanOptions, SortBy, DEFAULT_IGNORE_PATTERNS};

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Include hidden entries when scanning directories.
    pub show_hidden: Option<bool>,
    /// Enable mouse support in interactive mode.
    pub mouse: Option<bool>,
}

/// Directory scan settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Deepest directory level to read; unset means unlimited.
    pub max_depth: Option<usize>,
    /// Sort order: "size" or "name".
    pub sort_by: Option<String>,
    /// Directories always listed first.
    pub dirs_first: Option<bool>,
    /// Entry names to skip. Replaces the built-in list when set.
    pub ignore: Option<Vec<String>>,
}

/// Batch output settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// "tree" or "json".
    pub format: Option<String>,
    /// Print sizes next to names in tree output.
    pub show_sizes: Option<bool>,
}

/// Input watcher settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WatcherConfig {
    /// Reload the tree when the input changes (interactive mode).
    pub enabled: Option<bool>,
    /// Debounce interval in milliseconds.
    pub debounce_ms: Option<u64>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub tree_fg: Option<String>,
    pub tree_selected_bg: Option<String>,
    pub tree_selected_fg: Option<String>,
    pub tree_dir_fg: Option<String>,
    pub tree_file_fg: Option<String>,
    pub size_fg: Option<String>,
    pub match_fg: Option<String>,
    pub search_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `$TMF_LOG` is unset, e.g. "info" or "treemap_filter=debug".
    pub level: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub scan: ScanConfig,
    pub output: OutputConfig,
    pub watcher: WatcherConfig,
    pub theme: ThemeConfig,
    pub log: LogConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
/// Default log filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Batch output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Tree,
    Json,
}

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that one is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("TMF_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".tmf.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("tmf").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return None,
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            // Runs before the subscriber exists, so tracing would drop this
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`. Values set in `other` win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                show_hidden: other.general.show_hidden.or(self.general.show_hidden),
                mouse: other.general.mouse.or(self.general.mouse),
            },
            scan: ScanConfig {
                max_depth: other.scan.max_depth.or(self.scan.max_depth),
                sort_by: other.scan.sort_by.clone().or(self.scan.sort_by),
                dirs_first: other.scan.dirs_first.or(self.scan.dirs_first),
                ignore: other.scan.ignore.clone().or(self.scan.ignore),
            },
            output: OutputConfig {
                format: other.output.format.clone().or(self.output.format),
                show_sizes: other.output.show_sizes.or(self.output.show_sizes),
            },
            watcher: WatcherConfig {
                enabled: other.watcher.enabled.or(self.watcher.enabled),
                debounce_ms: other.watcher.debounce_ms.or(self.watcher.debounce_ms),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: match (&self.theme.custom, &other.theme.custom) {
                    (_, Some(o)) => Some(o.clone()),
                    (Some(s), None) => Some(s.clone()),
                    (None, None) => None,
                },
            },
            log: LogConfig {
                level: other.log.level.clone().or(self.log.level),
                file: other.log.file.clone().or(self.log.file),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        let paths = candidate_paths();
        for path in paths.iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn show_hidden(&self) -> bool {
        self.general.show_hidden.unwrap_or(false)
    }

    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(false)
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.scan.max_depth
    }

    /// Sort mode: "size" or "name".
    pub fn sort_by(&self) -> &str {
        self.scan.sort_by.as_deref().unwrap_or("size")
    }

    pub fn dirs_first(&self) -> bool {
        self.scan.dirs_first.unwrap_or(false)
    }

    pub fn ignore_patterns(&self) -> Vec<String> {
        match &self.scan.ignore {
            Some(patterns) => patterns.clone(),
            None => DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Scan options assembled from the `[general]` and `[scan]` sections.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            show_hidden: self.show_hidden(),
            max_depth: self.max_depth(),
            ignore: self.ignore_patterns(),
            sort_by: SortBy::parse(self.sort_by()),
            dirs_first: self.dirs_first(),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        match self.output.format.as_deref() {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Tree,
        }
    }

    pub fn show_sizes(&self) -> bool {
        self.output.show_sizes.unwrap_or(true)
    }

    pub fn watcher_enabled(&self) -> bool {
        self.watcher.enabled.unwrap_or(true)
    }

    pub fn debounce_ms(&self) -> u64 {
        self.watcher.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log.file.as_deref()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert!(!cfg.show_hidden());
        assert!(!cfg.mouse_enabled());
        assert_eq!(cfg.max_depth(), None);
        assert_eq!(cfg.sort_by(), "size");
        assert!(!cfg.dirs_first());
        assert!(cfg.ignore_patterns().contains(&".git".to_string()));
        assert_eq!(cfg.output_format(), OutputFormat::Tree);
        assert!(cfg.show_sizes());
        assert!(cfg.watcher_enabled());
        assert_eq!(cfg.debounce_ms(), 300);
        assert_eq!(cfg.theme_scheme(), "dark");
        assert_eq!(cfg.log_level(), "warn");
        assert!(cfg.log_file().is_none());
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[general]
show_hidden = true
mouse = true

[scan]
max_depth = 4
sort_by = "name"
dirs_first = true
ignore = ["build"]

[output]
format = "json"
show_sizes = false

[watcher]
enabled = false
debounce_ms = 500

[theme]
scheme = "light"

[log]
level = "treemap_filter=debug"
file = "/tmp/tmf.log"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert!(cfg.show_hidden());
        assert!(cfg.mouse_enabled());
        assert_eq!(cfg.max_depth(), Some(4));
        assert_eq!(cfg.sort_by(), "name");
        assert!(cfg.dirs_first());
        assert_eq!(cfg.ignore_patterns(), vec!["build".to_string()]);
        assert_eq!(cfg.output_format(), OutputFormat::Json);
        assert!(!cfg.show_sizes());
        assert!(!cfg.watcher_enabled());
        assert_eq!(cfg.debounce_ms(), 500);
        assert_eq!(cfg.theme_scheme(), "light");
        assert_eq!(cfg.log_level(), "treemap_filter=debug");
        assert_eq!(cfg.log_file(), Some(Path::new("/tmp/tmf.log")));
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[general]
show_hidden = true
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert!(cfg.show_hidden());
        assert_eq!(cfg.sort_by(), "size");
        assert_eq!(cfg.output_format(), OutputFormat::Tree);
    }

    #[test]
    fn test_toml_parsing_empty() {
        let cfg: AppConfig = toml::from_str("").expect("parse failed");
        assert!(!cfg.show_hidden());
        assert!(cfg.watcher_enabled());
    }

    #[test]
    fn test_scan_options_from_config() {
        let cfg = AppConfig {
            general: GeneralConfig {
                show_hidden: Some(true),
                ..Default::default()
            },
            scan: ScanConfig {
                max_depth: Some(2),
                sort_by: Some("name".to_string()),
                dirs_first: Some(true),
                ignore: Some(Vec::new()),
            },
            ..Default::default()
        };
        let options = cfg.scan_options();
        assert!(options.show_hidden);
        assert_eq!(options.max_depth, Some(2));
        assert_eq!(options.sort_by, SortBy::Name);
        assert!(options.dirs_first);
        assert!(options.ignore.is_empty());
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            general: GeneralConfig {
                show_hidden: Some(false),
                mouse: Some(true),
            },
            scan: ScanConfig {
                max_depth: Some(3),
                sort_by: Some("name".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let over = AppConfig {
            general: GeneralConfig {
                show_hidden: Some(true),
                ..Default::default()
            },
            scan: ScanConfig {
                max_depth: Some(8),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert!(merged.show_hidden()); // overridden
        assert!(merged.mouse_enabled()); // from base
        assert_eq!(merged.max_depth(), Some(8)); // overridden
        assert_eq!(merged.sort_by(), "name"); // from base
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            watcher: WatcherConfig {
                enabled: Some(false),
                debounce_ms: Some(500),
            },
            ..Default::default()
        };
        let over = AppConfig::default();

        let merged = base.merge(&over);
        assert!(!merged.watcher_enabled());
        assert_eq!(merged.debounce_ms(), 500);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(
            f,
            r#"
[general]
show_hidden = true

[scan]
sort_by = "name"
"#
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert!(cfg.show_hidden());
        assert_eq!(cfg.sort_by(), "name");
        assert_eq!(cfg.debounce_ms(), 300);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_file(Path::new("/nonexistent/config.toml"));
        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[general]
show_hidden = true

[scan]
max_depth = 2
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            scan: ScanConfig {
                max_depth: Some(6),
                ..Default::default()
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        assert_eq!(cfg.max_depth(), Some(6));
        assert!(cfg.show_hidden());
    }

    #[test]
    fn test_theme_custom_colors() {
        let toml = r##"
[theme]
scheme = "custom"

[theme.custom]
tree_fg = "#c0caf5"
match_fg = "#ff9e64"
"##;
        let cfg: AppConfig = toml::from_str(toml).expect("parse");
        assert_eq!(cfg.theme_scheme(), "custom");
        let custom = cfg.theme.custom.as_ref().expect("custom present");
        assert_eq!(custom.tree_fg.as_deref(), Some("#c0caf5"));
        assert_eq!(custom.match_fg.as_deref(), Some("#ff9e64"));
        assert!(custom.border_fg.is_none());
    }
}
