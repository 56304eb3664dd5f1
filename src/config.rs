//! Application configuration: TOML file loading and defaults.
//!
//! Resolution order (later layers override earlier ones):
//! 1. Built-in defaults
//! 2. Global `~/.config/treepick/config.toml`
//! 3. Project-local `.treepick.toml` in the current working directory
//! 4. `$TREEPICK_CONFIG` environment variable (path to config file)
//! 5. `--config <FILE>` on the command line

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::fs::tree::{IgnoreSet, DEFAULT_IGNORE_DIRS};

// ── Section configs ──────────────────────────────────────────────────────────

/// Tree scanning settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// Directory names whose scan waits for an explicit expand.
    pub ignore_dirs: Option<Vec<String>>,
}

/// Output file locations.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Where `s` writes the selected paths.
    pub selection_file: Option<String>,
    /// Where `e` writes the selected file contents.
    pub content_file: Option<String>,
}

/// Content viewer settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ViewerConfig {
    pub syntax_highlight: Option<bool>,
    /// Syntax highlighting theme (syntect theme name).
    pub syntax_theme: Option<String>,
}

/// Color overrides for the `custom` scheme, as `#rrggbb` strings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub tree_fg: Option<String>,
    pub tree_dir_fg: Option<String>,
    pub cursor_bg: Option<String>,
    pub cursor_fg: Option<String>,
    pub selected_fg: Option<String>,
    pub partial_fg: Option<String>,
    pub placeholder_fg: Option<String>,
    pub viewer_fg: Option<String>,
    pub viewer_line_nr_fg: Option<String>,
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
    pub custom: Option<ThemeColorsConfig>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub tree: TreeConfig,
    pub output: OutputConfig,
    pub viewer: ViewerConfig,
    pub theme: ThemeConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

pub const DEFAULT_SELECTION_FILE: &str = "selected_directories.txt";
pub const DEFAULT_CONTENT_FILE: &str = "file_contents.txt";
pub const DEFAULT_SYNTAX_THEME: &str = "base16-ocean.dark";

// ── Config file locator ──────────────────────────────────────────────────────

/// Candidate config files, lowest priority first.
///
/// Does not include the `--config` path.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("treepick").join("config.toml"));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".treepick.toml"));
    }

    if let Ok(env_path) = std::env::var("TREEPICK_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    paths
}

/// Read and parse a TOML config file. Returns `None` if the file doesn't
/// exist or can't be parsed (logged as a warning).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => {
            tracing::debug!(path = %path.display(), "config file loaded");
            Some(cfg)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid config file skipped");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            tree: TreeConfig {
                ignore_dirs: other.tree.ignore_dirs.clone().or(self.tree.ignore_dirs),
            },
            output: OutputConfig {
                selection_file: other
                    .output
                    .selection_file
                    .clone()
                    .or(self.output.selection_file),
                content_file: other
                    .output
                    .content_file
                    .clone()
                    .or(self.output.content_file),
            },
            viewer: ViewerConfig {
                syntax_highlight: other
                    .viewer
                    .syntax_highlight
                    .or(self.viewer.syntax_highlight),
                syntax_theme: other
                    .viewer
                    .syntax_theme
                    .clone()
                    .or(self.viewer.syntax_theme),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: other.theme.custom.clone().or(self.theme.custom),
            },
        }
    }

    /// Merge every readable file in `paths`, in order.
    fn load_layers(paths: &[PathBuf]) -> AppConfig {
        paths
            .iter()
            .filter_map(|path| load_file(path))
            .fold(AppConfig::default(), |acc, layer| acc.merge(&layer))
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    pub fn load(cli_config_path: Option<&Path>) -> AppConfig {
        let mut paths = candidate_paths();
        if let Some(cli_path) = cli_config_path {
            paths.push(cli_path.to_path_buf());
        }
        Self::load_layers(&paths)
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// The ignore-set for the tree; the built-in list unless configured.
    /// An empty `ignore_dirs` list defers nothing.
    pub fn ignore_set(&self) -> IgnoreSet {
        match &self.tree.ignore_dirs {
            Some(names) if names.is_empty() => IgnoreSet::empty(),
            Some(names) => IgnoreSet::new(names.iter().cloned()),
            None => IgnoreSet::new(DEFAULT_IGNORE_DIRS.iter().copied()),
        }
    }

    pub fn selection_file(&self) -> PathBuf {
        PathBuf::from(
            self.output
                .selection_file
                .as_deref()
                .unwrap_or(DEFAULT_SELECTION_FILE),
        )
    }

    pub fn content_file(&self) -> PathBuf {
        PathBuf::from(
            self.output
                .content_file
                .as_deref()
                .unwrap_or(DEFAULT_CONTENT_FILE),
        )
    }

    /// Whether the viewer highlights syntax.
    pub fn syntax_highlight(&self) -> bool {
        self.viewer.syntax_highlight.unwrap_or(true)
    }

    /// Syntax highlighting theme name.
    pub fn syntax_theme_name(&self) -> &str {
        self.viewer
            .syntax_theme
            .as_deref()
            .unwrap_or(DEFAULT_SYNTAX_THEME)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
