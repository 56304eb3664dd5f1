use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::fs::tree::{SelectionState, TreeModel};
use crate::theme::ThemeColors;
use crate::viewport::{render_window, Row, RowKind, Viewport};

/// Tree widget: draws the window of the visible-node sequence around the
/// cursor, with scroll indicators on the block border.
pub struct TreeWidget<'a> {
    tree: &'a TreeModel,
    viewport: &'a Viewport,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(tree: &'a TreeModel, viewport: &'a Viewport, theme: &'a ThemeColors) -> Self {
        Self {
            tree,
            viewport,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    fn row_style(&self, row: &Row) -> Style {
        if row.is_cursor {
            return Style::default()
                .bg(self.theme.cursor_bg)
                .fg(self.theme.cursor_fg)
                .add_modifier(Modifier::BOLD);
        }
        let base = match row.kind {
            RowKind::Directory => Style::default()
                .fg(self.theme.tree_dir_fg)
                .add_modifier(Modifier::BOLD),
            RowKind::File => Style::default().fg(self.theme.tree_fg),
            RowKind::Placeholder => {
                return Style::default()
                    .fg(self.theme.placeholder_fg)
                    .add_modifier(Modifier::ITALIC)
            }
        };
        match row.selection {
            Some(SelectionState::Full) => base.fg(self.theme.selected_fg),
            Some(SelectionState::Partial) => base.fg(self.theme.partial_fg),
            _ => base,
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (window, rows) = {
            let height = self
                .block
                .as_ref()
                .map_or(area, |b| b.inner(area))
                .height as usize;
            render_window(self.tree, self.viewport, height)
        };

        let inner_area = if let Some(mut block) = self.block.clone() {
            let indicator = Style::default().fg(self.theme.dim_fg);
            if window.hidden_above > 0 {
                block = block.title_top(
                    Line::from(Span::styled(format!(" ▲ {} more ", window.hidden_above), indicator))
                        .right_aligned(),
                );
            }
            if window.hidden_below > 0 {
                block = block.title_bottom(
                    Line::from(Span::styled(format!(" ▼ {} more ", window.hidden_below), indicator))
                        .right_aligned(),
                );
            }
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        for (i, row) in rows.iter().enumerate() {
            let y = inner_area.y + i as u16;
            if y >= inner_area.y + inner_area.height {
                break;
            }
            let style = self.row_style(row);
            let mut text = row.text.clone();
            if row.is_cursor {
                // Fill the highlight across the whole row.
                let pad = (inner_area.width as usize).saturating_sub(text.chars().count());
                text.push_str(&" ".repeat(pad));
            }
            let line = Line::from(Span::styled(text, style));
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
