//! Theme data model: built-in palettes and resolution from config.
//!
//! Two built-in palettes (dark and light) plus custom hex overrides from the
//! config file.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

// ── Runtime theme colors ─────────────────────────────────────────────────────

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tree panel
    pub tree_fg: Color,
    pub tree_dir_fg: Color,
    pub cursor_bg: Color,
    pub cursor_fg: Color,
    /// Glyph and name of fully selected rows.
    pub selected_fg: Color,
    /// Glyph of partially selected directories.
    pub partial_fg: Color,
    pub placeholder_fg: Color,

    // Viewer
    pub viewer_fg: Color,
    pub viewer_line_nr_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    pub border_fg: Color,

    // Semantic colors (not configurable)
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,
    pub dim_fg: Color,
}

impl Default for ThemeColors {
    fn default() -> Self {
        dark_theme()
    }
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(205, 214, 244),      // #cdd6f4 (text)
        tree_dir_fg: Color::Rgb(137, 180, 250),  // #89b4fa (blue)
        cursor_bg: Color::Rgb(69, 71, 90),       // #45475a (surface1)
        cursor_fg: Color::Rgb(205, 214, 244),    // #cdd6f4
        selected_fg: Color::Rgb(166, 227, 161),  // #a6e3a1 (green)
        partial_fg: Color::Rgb(249, 226, 175),   // #f9e2af (yellow)
        placeholder_fg: Color::Rgb(108, 112, 134), // #6c7086 (overlay0)

        viewer_fg: Color::Rgb(205, 214, 244),
        viewer_line_nr_fg: Color::Rgb(108, 112, 134),

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112), // #585b70 (surface2)

        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        warning_fg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        success_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        info_fg: Color::Rgb(137, 180, 250),    // #89b4fa (blue)
        dim_fg: Color::Rgb(108, 112, 134),     // #6c7086
    }
}

/// Light theme using Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(76, 79, 105),        // #4c4f69 (text)
        tree_dir_fg: Color::Rgb(30, 102, 245),   // #1e66f5 (blue)
        cursor_bg: Color::Rgb(204, 208, 218),    // #ccd0da (surface1)
        cursor_fg: Color::Rgb(76, 79, 105),
        selected_fg: Color::Rgb(64, 160, 43),    // #40a02b (green)
        partial_fg: Color::Rgb(223, 142, 29),    // #df8e1d (yellow)
        placeholder_fg: Color::Rgb(156, 160, 176), // #9ca0b0 (overlay0)

        viewer_fg: Color::Rgb(76, 79, 105),
        viewer_line_nr_fg: Color::Rgb(156, 160, 176),

        status_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)

        error_fg: Color::Rgb(210, 15, 57),    // #d20f39 (red)
        warning_fg: Color::Rgb(223, 142, 29), // #df8e1d (yellow)
        success_fg: Color::Rgb(64, 160, 43),  // #40a02b (green)
        info_fg: Color::Rgb(30, 102, 245),
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

// ── Color parsing ────────────────────────────────────────────────────────────

/// Parse a hex color string like `"#aabbcc"` into a `ratatui::style::Color`.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

// ── Theme resolution ─────────────────────────────────────────────────────────

/// Resolve the final `ThemeColors` from config.
///
/// - `"dark"` (default): dark Catppuccin palette
/// - `"light"`: light Catppuccin palette
/// - `"custom"`: dark palette with custom hex values on top
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    match config.scheme.as_deref().unwrap_or("dark") {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(),
    }
}

fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    let overrides = [
        (&mut theme.tree_fg, &custom.tree_fg),
        (&mut theme.tree_dir_fg, &custom.tree_dir_fg),
        (&mut theme.cursor_bg, &custom.cursor_bg),
        (&mut theme.cursor_fg, &custom.cursor_fg),
        (&mut theme.selected_fg, &custom.selected_fg),
        (&mut theme.partial_fg, &custom.partial_fg),
        (&mut theme.placeholder_fg, &custom.placeholder_fg),
        (&mut theme.viewer_fg, &custom.viewer_fg),
        (&mut theme.viewer_line_nr_fg, &custom.viewer_line_nr_fg),
        (&mut theme.status_bg, &custom.status_bg),
        (&mut theme.status_fg, &custom.status_fg),
        (&mut theme.border_fg, &custom.border_fg),
    ];
    for (slot, hex) in overrides {
        match hex.as_deref().map(|h| (h, parse_hex_color(h))) {
            Some((_, Some(color))) => *slot = color,
            Some((h, None)) => tracing::warn!(color = h, "invalid theme color ignored"),
            None => {}
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
