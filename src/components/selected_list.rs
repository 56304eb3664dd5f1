use std::path::{Path, PathBuf};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use super::overlay_area;
use crate::theme::ThemeColors;

/// Overlay listing the selected files, relative to the tree root.
pub struct SelectedListOverlay<'a> {
    paths: &'a [PathBuf],
    root: &'a Path,
    scroll: usize,
    theme: &'a ThemeColors,
}

impl<'a> SelectedListOverlay<'a> {
    pub fn new(paths: &'a [PathBuf], root: &'a Path, scroll: usize, theme: &'a ThemeColors) -> Self {
        Self {
            paths,
            root,
            scroll,
            theme,
        }
    }

    fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

impl<'a> Widget for SelectedListOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let overlay = overlay_area(area, 100, 40);
        Clear.render(overlay, buf);

        let block = Block::default()
            .title(format!(" Selected files ({}) ", self.paths.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.info_fg))
            .style(Style::default().bg(self.theme.status_bg));
        let inner = block.inner(overlay);
        block.render(overlay, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let visible = inner.height as usize;
        let scroll = self.scroll.min(self.paths.len().saturating_sub(1));
        for (i, path) in self.paths.iter().skip(scroll).take(visible).enumerate() {
            let line = Line::from(Span::styled(
                self.display_path(path),
                Style::default().fg(self.theme.tree_fg),
            ));
            buf.set_line(inner.x + 1, inner.y + i as u16, &line, inner.width.saturating_sub(2));
        }

        if self.paths.len() > visible {
            let indicator = Span::styled(
                format!(" {}/{} ", scroll + 1, self.paths.len()),
                Style::default().fg(self.theme.dim_fg),
            );
            let x = overlay.x + overlay.width.saturating_sub(indicator.width() as u16 + 1);
            let y = overlay.y + overlay.height - 1;
            buf.set_span(x, y, &indicator, indicator.width() as u16);
        }
    }
}
