use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::components::help::HelpOverlay;
use crate::components::viewer::Highlighter;
use crate::config::AppConfig;
use crate::content::{self, ViewerState};
use crate::error::Result;
use crate::export;
use crate::fs::selection;
use crate::fs::tree::{ScanOutcome, TreeModel};
use crate::theme::{resolve_theme, ThemeColors};
use crate::viewport::{VisibleItem, Viewport};

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Application mode.
#[derive(Debug, Default)]
pub enum AppMode {
    #[default]
    Tree,
    /// Overlay listing the selected files.
    SelectedList { paths: Vec<PathBuf>, scroll: usize },
    /// Full-screen paged content viewer.
    Viewer(ViewerState),
    Help { scroll: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    created: Instant,
}

/// Main application state.
pub struct App {
    pub tree: TreeModel,
    pub viewport: Viewport,
    pub mode: AppMode,
    pub config: AppConfig,
    pub theme: ThemeColors,
    /// `None` when syntax highlighting is disabled.
    pub highlighter: Option<Highlighter>,
    pub should_quit: bool,
    pub status_message: Option<StatusMessage>,
    /// Number of fully selected files, kept up to date by toggles and loads.
    pub selected_files: usize,
    /// Rows available to the tree, as of the last draw.
    pub tree_height: usize,
    /// Lines available to the viewer, as of the last draw.
    pub viewer_height: usize,
}

impl App {
    /// Create a new App rooted at the given path.
    pub fn new(root: &Path, config: AppConfig) -> Result<Self> {
        let tree = TreeModel::initialize(root, config.ignore_set())?;
        let viewport = Viewport::new(&tree);
        let theme = resolve_theme(&config.theme);
        let highlighter = config
            .syntax_highlight()
            .then(|| Highlighter::new(config.syntax_theme_name()));
        let mut app = Self {
            tree,
            viewport,
            mode: AppMode::Tree,
            config,
            theme,
            highlighter,
            should_quit: false,
            status_message: None,
            selected_files: 0,
            tree_height: 20,
            viewer_height: 20,
        };
        if app.tree.scan_failures() > 0 {
            let count = counted(app.tree.scan_failures(), "entry", "entries");
            app.set_error_message(format!("{count} could not be scanned"));
        }
        Ok(app)
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ── Status line ─────────────────────────────────────────────────────────

    pub fn set_status_message(&mut self, msg: String) {
        self.set_status(msg, StatusKind::Info);
    }

    pub fn set_warning_message(&mut self, msg: String) {
        self.set_status(msg, StatusKind::Warning);
    }

    pub fn set_error_message(&mut self, msg: String) {
        self.set_status(msg, StatusKind::Error);
    }

    fn set_status(&mut self, text: String, kind: StatusKind) {
        self.status_message = Some(StatusMessage {
            text,
            kind,
            created: Instant::now(),
        });
    }

    /// Clear the status message once it has been shown long enough.
    pub fn clear_expired_status(&mut self) {
        if let Some(msg) = &self.status_message {
            if msg.created.elapsed() > STATUS_TTL {
                self.status_message = None;
            }
        }
    }

    fn report_scan(&mut self, outcome: &ScanOutcome) {
        if let Some(first) = outcome.failures.first() {
            let count = counted(outcome.failures.len(), "entry", "entries");
            self.set_error_message(format!("{count} could not be scanned: {first}"));
        }
    }


    /// Summary for the status bar: loaded contents of the directory under
    /// the cursor, then the selection count.
    pub fn status_info(&mut self) -> String {
        let mut parts = Vec::new();
        if let Some(item) = self.viewport.current() {
            let id = item.target();
            let node = self.tree.node(id);
            if node.is_dir && node.loaded {
                let counts = self.tree.descendant_counts(id);
                parts.push(format!(
                    "{} in {}",
                    counted(counts.files, "file", "files"),
                    counted(counts.total, "entry", "entries")
                ));
            }
        }
        if self.selected_files > 0 {
            parts.push(format!(
                "{} selected",
                counted(self.selected_files, "file", "files")
            ));
        }
        if parts.is_empty() {
            return String::new();
        }
        format!("{} ", parts.join(" · "))
    }

    // ── Tree navigation ─────────────────────────────────────────────────────

    pub fn select_next(&mut self) {
        self.viewport.select_next();
    }

    pub fn select_previous(&mut self) {
        self.viewport.select_previous();
    }

    pub fn select_first(&mut self) {
        self.viewport.select_first();
    }

    pub fn select_last(&mut self) {
        self.viewport.select_last();
    }

    pub fn page_down(&mut self) {
        self.viewport.page_down(self.tree_height);
    }

    pub fn page_up(&mut self) {
        self.viewport.page_up(self.tree_height);
    }

    /// Expand or collapse the directory under the cursor.
    ///
    /// On a placeholder row this scans the deferred directory it stands for.
    pub fn toggle_expand(&mut self) {
        let Some(item) = self.viewport.current() else {
            return;
        };
        let id = item.target();
        if !self.tree.node(id).is_dir {
            return;
        }
        let path = self.tree.node(id).path.clone();
        if let Some(outcome) = self.tree.expand(&path) {
            self.report_scan(&outcome);
            // Children loaded under a selected directory arrive selected.
            self.selected_files += selection::selected_files_below(&self.tree, id);
        }
        self.viewport.rebuild(&self.tree);
    }

    /// Collapse the directory under the cursor, or move to its parent.
    pub fn collapse_or_parent(&mut self) {
        match self.viewport.current() {
            Some(VisibleItem::Placeholder { owner }) => {
                self.viewport.select_node(owner);
            }
            Some(VisibleItem::Node(id)) => {
                if self.tree.collapse(id) {
                    self.viewport.rebuild(&self.tree);
                } else if let Some(parent) = self.tree.node(id).parent {
                    self.viewport.select_node(parent);
                }
            }
            None => {}
        }
    }

    pub fn toggle_selection(&mut self) {
        let Some(item) = self.viewport.current() else {
            return;
        };
        let id = item.target();
        let before = selection::selected_files_below(&self.tree, id);
        selection::toggle(&mut self.tree, id);
        let after = selection::selected_files_below(&self.tree, id);
        self.selected_files = self.selected_files - before + after;
        self.viewport.rebuild(&self.tree);
    }

    // ── Output actions ──────────────────────────────────────────────────────

    /// Write every selected path to the selection file.
    pub fn save_selection(&mut self) {
        let paths = selection::selected_paths(&self.tree);
        let target = self.config.selection_file();
        match export::write_output(&target, &export::export_selection(&paths)) {
            Ok(()) => self.set_status_message(format!(
                "Saved {} to {}",
                counted(paths.len(), "path", "paths"),
                target.display()
            )),
            Err(e) => self.set_error_message(e.to_string()),
        }
    }

    /// Selected files, or `None` (with a status message) when there are none.
    fn selected_files_or_notice(&mut self) -> Option<Vec<PathBuf>> {
        let files = selection::selected_files(&self.tree);
        if files.is_empty() {
            self.set_warning_message("No files selected".to_string());
            return None;
        }
        Some(files)
    }

    pub fn list_selected(&mut self) {
        if let Some(paths) = self.selected_files_or_notice() {
            self.mode = AppMode::SelectedList { paths, scroll: 0 };
        }
    }

    /// Open the viewer on the selected non-binary files.
    pub fn view_selected(&mut self) {
        let Some(files) = self.selected_files_or_notice() else {
            return;
        };
        let (viewable, skipped) = content::partition_binary(&files);
        let warning = content::skipped_warning(&skipped);
        match ViewerState::open(viewable, self.viewer_height) {
            Some(state) => {
                self.mode = AppMode::Viewer(state);
                if let Some(w) = warning {
                    self.set_warning_message(w);
                }
            }
            None => self.set_warning_message(
                warning.unwrap_or_else(|| "Nothing to view".to_string()),
            ),
        }
    }

    /// Write the contents of the selected non-binary files to the content file.
    pub fn export_content(&mut self) {
        let Some(files) = self.selected_files_or_notice() else {
            return;
        };
        let (entries, skipped) = content::collect_entries(&files);
        let target = self.config.content_file();
        if let Err(e) = export::write_output(&target, &export::export_content(&entries)) {
            self.set_error_message(e.to_string());
            return;
        }
        let saved = format!(
            "Exported {} to {}",
            counted(entries.len(), "file", "files"),
            target.display()
        );
        match content::skipped_warning(&skipped) {
            Some(w) => self.set_warning_message(format!("{saved}. {w}")),
            None => self.set_status_message(saved),
        }
    }

    // ── Overlays ────────────────────────────────────────────────────────────

    pub fn open_help(&mut self) {
        self.mode = AppMode::Help { scroll: 0 };
    }

    /// Return to the tree view.
    pub fn close_overlay(&mut self) {
        self.mode = AppMode::Tree;
    }

    /// Scroll the selected-list or help overlay.
    pub fn scroll_overlay(&mut self, down: bool) {
        let scroll = match &mut self.mode {
            AppMode::SelectedList { paths, scroll } => {
                if down && *scroll + 1 < paths.len() {
                    *scroll += 1;
                }
                scroll
            }
            AppMode::Help { scroll } => {
                if down && *scroll + 1 < HelpOverlay::total_lines() {
                    *scroll += 1;
                }
                scroll
            }
            _ => return,
        };
        if !down {
            *scroll = scroll.saturating_sub(1);
        }
    }

    // ── Viewer ──────────────────────────────────────────────────────────────

    pub fn viewer_mut(&mut self) -> Option<&mut ViewerState> {
        match &mut self.mode {
            AppMode::Viewer(state) => Some(state),
            _ => None,
        }
    }

    /// Record the viewer height from the last layout; keeps the open page
    /// anchored on its first line.
    pub fn set_viewer_height(&mut self, height: usize) {
        self.viewer_height = height.max(1);
        let height = self.viewer_height;
        if let Some(state) = self.viewer_mut() {
            state.resize(height);
        }
    }
}

fn counted(n: usize, singular: &str, plural: &str) -> String {
    format!("{n} {}", if n == 1 { singular } else { plural })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("main.rs"), "fn main() {}\n").unwrap();
        fs::write(dir.path().join("src").join("lib.rs"), "pub mod app;\n").unwrap();
        fs::write(dir.path().join("README.md"), "# demo\n").unwrap();
        fs::write(dir.path().join("logo.png"), [0x89, 0x50, 0x4E, 0x47, 0, 0, 0, 0]).unwrap();
        dir
    }

    /// Config writing both output files into `out`.
    fn test_config(out: &Path) -> AppConfig {
        AppConfig {
            output: OutputConfig {
                selection_file: Some(out.join("sel.txt").display().to_string()),
                content_file: Some(out.join("content.txt").display().to_string()),
            },
            ..Default::default()
        }
    }

    fn test_app(dir: &TempDir, out: &TempDir) -> App {
        let mut config = test_config(out.path());
        config.viewer.syntax_highlight = Some(false);
        App::new(dir.path(), config).unwrap()
    }

    fn goto(app: &mut App, path: &Path) {
        let id = app.tree.lookup(path).expect("node exists");
        assert!(app.viewport.select_node(id), "{} not visible", path.display());
    }

    #[test]
    fn test_new_app_starts_on_root() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let app = test_app(&dir, &out);
        assert!(!app.should_quit);
        assert!(matches!(app.mode, AppMode::Tree));
        assert_eq!(app.viewport.cursor(), 0);
        // root, src, README.md, logo.png
        assert_eq!(app.viewport.len(), 4);
    }

    #[test]
    fn test_new_app_rejects_missing_root() {
        let out = TempDir::new().unwrap();
        let result = App::new(Path::new("/nonexistent/root"), test_config(out.path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_navigation_bounds() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);
        app.select_previous();
        assert_eq!(app.viewport.cursor(), 0);
        app.select_last();
        assert_eq!(app.viewport.cursor(), 3);
        app.select_next();
        assert_eq!(app.viewport.cursor(), 3);
        app.select_first();
        assert_eq!(app.viewport.cursor(), 0);
    }

    #[test]
    fn test_expand_and_collapse_or_parent() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);
        let src = dir.path().join("src");
        goto(&mut app, &src);

        app.toggle_expand();
        assert_eq!(app.viewport.len(), 6);
        app.select_next();
        let lib = app.tree.lookup(&src.join("lib.rs")).unwrap();
        assert_eq!(app.viewport.current(), Some(VisibleItem::Node(lib)));

        // On a file: jump to parent.
        app.collapse_or_parent();
        let src_id = app.tree.lookup(&src).unwrap();
        assert_eq!(app.viewport.current(), Some(VisibleItem::Node(src_id)));

        // On an expanded directory: collapse.
        app.collapse_or_parent();
        assert_eq!(app.viewport.len(), 4);
        assert_eq!(app.viewport.current(), Some(VisibleItem::Node(src_id)));
    }

    #[test]
    fn test_placeholder_expands_owner() {
        let dir = setup_test_dir();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        File::create(dir.path().join("node_modules").join("dep.js")).unwrap();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);

        let nm = dir.path().join("node_modules");
        goto(&mut app, &nm);
        app.select_next();
        assert!(matches!(app.viewport.current(), Some(VisibleItem::Placeholder { .. })));

        app.toggle_expand();
        assert!(app.tree.lookup(&nm.join("dep.js")).is_some());
        assert!(!app
            .viewport
            .items()
            .iter()
            .any(|i| matches!(i, VisibleItem::Placeholder { .. })));
    }

    #[test]
    fn test_toggle_selection_updates_summary() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);
        goto(&mut app, &dir.path().join("src"));
        app.toggle_selection();
        assert_eq!(app.selected_files, 2);
        app.toggle_selection();
        assert_eq!(app.selected_files, 0);
    }

    #[test]
    fn test_selected_count_tracks_lazy_loads() {
        let dir = setup_test_dir();
        let nested = dir.path().join("src").join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("x.rs"), "").unwrap();
        fs::write(nested.join("y.rs"), "").unwrap();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);

        goto(&mut app, &dir.path().join("src"));
        app.toggle_expand();
        // Select the unscanned directory, then scan it by expanding.
        goto(&mut app, &nested);
        app.toggle_selection();
        assert_eq!(app.selected_files, 0);
        app.toggle_expand();
        assert_eq!(app.selected_files, 2);
        assert_eq!(app.selected_files, selection::selected_files(&app.tree).len());

        goto(&mut app, &dir.path().join("src"));
        app.toggle_selection();
        assert_eq!(app.selected_files, 4);
        goto(&mut app, &nested.join("x.rs"));
        app.toggle_selection();
        assert_eq!(app.selected_files, 3);
        assert_eq!(app.selected_files, selection::selected_files(&app.tree).len());
    }

    #[test]
    fn test_save_selection_writes_file() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);
        goto(&mut app, &dir.path().join("README.md"));
        app.toggle_selection();
        app.save_selection();

        let written = fs::read_to_string(out.path().join("sel.txt")).unwrap();
        assert_eq!(written, format!("{}\n", dir.path().join("README.md").display()));
        let msg = app.status_message.as_ref().unwrap();
        assert_eq!(msg.kind, StatusKind::Info);
        assert!(msg.text.starts_with("Saved 1 path to"));
    }

    #[test]
    fn test_save_selection_reports_write_error() {
        let dir = setup_test_dir();
        let mut config = AppConfig::default();
        config.output.selection_file = Some(
            dir.path()
                .join("no_such_dir")
                .join("sel.txt")
                .display()
                .to_string(),
        );
        config.viewer.syntax_highlight = Some(false);
        let mut app = App::new(dir.path(), config).unwrap();
        app.save_selection();
        let msg = app.status_message.as_ref().unwrap();
        assert_eq!(msg.kind, StatusKind::Error);
        assert!(msg.text.starts_with("Cannot write"));
    }

    #[test]
    fn test_actions_without_selection_warn() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);
        app.view_selected();
        assert!(matches!(app.mode, AppMode::Tree));
        assert_eq!(app.status_message.as_ref().unwrap().text, "No files selected");
        app.list_selected();
        assert!(matches!(app.mode, AppMode::Tree));
        app.export_content();
        assert!(!out.path().join("content.txt").exists());
    }

    #[test]
    fn test_view_skips_binary_files() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);
        // Select everything.
        app.select_first();
        app.toggle_selection();
        app.view_selected();

        match &app.mode {
            AppMode::Viewer(state) => {
                assert_eq!(state.file_count(), 3);
                assert!(!state.current_path().ends_with("logo.png"));
            }
            other => panic!("expected viewer, got {other:?}"),
        }
        let msg = app.status_message.as_ref().unwrap();
        assert_eq!(msg.kind, StatusKind::Warning);
        assert!(msg.text.contains("Skipped 1 binary file"));
        assert!(msg.text.contains("logo.png"));
    }

    #[test]
    fn test_view_only_binary_stays_in_tree() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);
        goto(&mut app, &dir.path().join("logo.png"));
        app.toggle_selection();
        app.view_selected();
        assert!(matches!(app.mode, AppMode::Tree));
        assert!(app.status_message.as_ref().unwrap().text.contains("Skipped 1 binary file"));
    }

    #[test]
    fn test_export_content_writes_headers() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);
        goto(&mut app, &dir.path().join("src"));
        app.toggle_selection();
        app.export_content();

        let written = fs::read_to_string(out.path().join("content.txt")).unwrap();
        let lib = dir.path().join("src").join("lib.rs");
        let main = dir.path().join("src").join("main.rs");
        let lib_at = written.find(&format!("FILE: {}", lib.display())).unwrap();
        let main_at = written.find(&format!("FILE: {}", main.display())).unwrap();
        assert!(lib_at < main_at);
        assert!(written.contains("fn main() {}\n"));
        assert!(app.status_message.as_ref().unwrap().text.starts_with("Exported 2 files"));
    }

    #[test]
    fn test_selected_list_scrolls_within_bounds() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);
        goto(&mut app, &dir.path().join("src"));
        app.toggle_selection();
        app.list_selected();

        app.scroll_overlay(false);
        app.scroll_overlay(true);
        app.scroll_overlay(true);
        match &app.mode {
            AppMode::SelectedList { paths, scroll } => {
                assert_eq!(paths.len(), 2);
                assert_eq!(*scroll, 1);
            }
            other => panic!("expected list, got {other:?}"),
        }
        app.close_overlay();
        assert!(matches!(app.mode, AppMode::Tree));
    }

    #[test]
    fn test_viewer_height_resizes_open_viewer() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);
        goto(&mut app, &dir.path().join("README.md"));
        app.toggle_selection();
        app.view_selected();
        app.set_viewer_height(7);
        assert_eq!(app.viewer_mut().unwrap().page_height(), 7);
    }

    #[test]
    fn test_status_message_expiry() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);
        app.set_status_message("hello".into());
        app.clear_expired_status();
        assert!(app.status_message.is_some());

        if let Some(msg) = app.status_message.as_mut() {
            msg.created = Instant::now() - Duration::from_secs(10);
        }
        app.clear_expired_status();
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_status_info_counts_loaded_entries() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);
        // root: src/{main.rs, lib.rs}, README.md, logo.png
        assert_eq!(app.status_info(), "4 files in 5 entries ");

        goto(&mut app, &dir.path().join("README.md"));
        assert_eq!(app.status_info(), "");
        app.toggle_selection();
        assert_eq!(app.status_info(), "1 file selected ");

        goto(&mut app, &dir.path().join("src"));
        assert_eq!(app.status_info(), "2 files in 2 entries · 1 file selected ");
    }

    #[test]
    fn test_help_scroll_is_bounded() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);
        app.open_help();
        for _ in 0..500 {
            app.scroll_overlay(true);
        }
        match app.mode {
            AppMode::Help { scroll } => assert_eq!(scroll, HelpOverlay::total_lines() - 1),
            ref other => panic!("expected help, got {other:?}"),
        }
    }

    #[test]
    fn test_quit() {
        let dir = setup_test_dir();
        let out = TempDir::new().unwrap();
        let mut app = test_app(&dir, &out);
        app.quit();
        assert!(app.should_quit);
    }
}
