use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use super::overlay_area;
use crate::theme::ThemeColors;

/// A single keybinding entry for display.
struct KeyEntry {
    key: &'static str,
    description: &'static str,
}

const fn entry(key: &'static str, description: &'static str) -> KeyEntry {
    KeyEntry { key, description }
}

/// A category of keybindings.
struct KeyCategory {
    name: &'static str,
    entries: &'static [KeyEntry],
}

const TREE_KEYS: &[KeyEntry] = &[
    entry("j / ↓", "Move down"),
    entry("k / ↑", "Move up"),
    entry("g / Home", "Jump to first item"),
    entry("G / End", "Jump to last item"),
    entry("PgDn / PgUp", "Move by one screen"),
    entry("Enter / l / →", "Expand or collapse directory"),
    entry("h / ←", "Collapse directory or go to parent"),
    entry("Space", "Toggle selection"),
];

const OUTPUT_KEYS: &[KeyEntry] = &[
    entry("s", "Save selected paths"),
    entry("p", "List selected files"),
    entry("v", "View selected files"),
    entry("e", "Export selected file contents"),
];

const VIEWER_KEYS: &[KeyEntry] = &[
    entry("n / l / → / Space / PgDn", "Next page"),
    entry("b / h / ← / PgUp", "Previous page"),
    entry("Tab / N", "Next file"),
    entry("Shift+Tab / P", "Previous file"),
    entry("q / Esc", "Close viewer"),
];

const GENERAL_KEYS: &[KeyEntry] = &[
    entry("?", "Toggle this help"),
    entry("q / Ctrl+c", "Quit"),
];

const CATEGORIES: &[KeyCategory] = &[
    KeyCategory {
        name: "Tree",
        entries: TREE_KEYS,
    },
    KeyCategory {
        name: "Selection output",
        entries: OUTPUT_KEYS,
    },
    KeyCategory {
        name: "Viewer",
        entries: VIEWER_KEYS,
    },
    KeyCategory {
        name: "General",
        entries: GENERAL_KEYS,
    },
];

/// Help overlay widget showing all keybindings.
pub struct HelpOverlay<'a> {
    theme: &'a ThemeColors,
    scroll_offset: usize,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a ThemeColors, scroll_offset: usize) -> Self {
        Self {
            theme,
            scroll_offset,
        }
    }

    fn build_content_lines(&self) -> Vec<Line<'static>> {
        let heading = Style::default()
            .fg(self.theme.info_fg)
            .add_modifier(Modifier::BOLD);
        let key_style = Style::default()
            .fg(self.theme.warning_fg)
            .add_modifier(Modifier::BOLD);
        let mut lines = Vec::new();

        for category in CATEGORIES {
            lines.push(Line::from(vec![
                Span::styled(format!("── {} ", category.name), heading),
                Span::styled("─".repeat(30), Style::default().fg(self.theme.dim_fg)),
            ]));
            for entry in category.entries {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<28}", entry.key), key_style),
                    Span::styled(entry.description, Style::default().fg(self.theme.tree_fg)),
                ]));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(self.theme.dim_fg),
        )));
        lines
    }

    /// Number of content lines, for scroll bounds.
    pub fn total_lines() -> usize {
        CATEGORIES.iter().map(|c| c.entries.len() + 2).sum::<usize>() + 1
    }
}

impl<'a> Widget for HelpOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let overlay = overlay_area(area, 72, 40);
        Clear.render(overlay, buf);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.info_fg))
            .style(Style::default().bg(self.theme.status_bg));
        let inner = block.inner(overlay);
        block.render(overlay, buf);

        let lines = self.build_content_lines();
        let scroll = self
            .scroll_offset
            .min(lines.len().saturating_sub(inner.height as usize));
        for (i, line) in lines
            .iter()
            .skip(scroll)
            .take(inner.height as usize)
            .enumerate()
        {
            buf.set_line(inner.x + 1, inner.y + i as u16, line, inner.width.saturating_sub(2));
        }
    }
}
