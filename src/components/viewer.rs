use std::path::Path;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::config::DEFAULT_SYNTAX_THEME;
use crate::content::{PageView, ViewerState};
use crate::theme::ThemeColors;

/// Syntax definitions and color theme, loaded once per session.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    /// Load the built-in syntaxes and the named theme, falling back to the
    /// default theme for unknown names.
    pub fn new(theme_name: &str) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = match themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                tracing::warn!(theme = theme_name, "unknown syntax theme, using default");
                themes.remove(DEFAULT_SYNTAX_THEME).unwrap_or_default()
            }
        };
        Self {
            syntax_set: SyntaxSet::load_defaults_nonewlines(),
            theme,
        }
    }

    fn syntax_for(&self, path: &Path) -> &SyntaxReference {
        let by_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.syntax_set.find_syntax_by_extension(ext));
        // Names like `Makefile` are registered as extensions too.
        let by_name = || {
            path.file_name()
                .and_then(|n| n.to_str())
                .and_then(|name| self.syntax_set.find_syntax_by_extension(name))
        };
        by_extension
            .or_else(by_name)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Highlight one page. Parsing state starts fresh at the first line.
    pub fn highlight(&self, path: &Path, lines: &[&str]) -> Vec<Line<'static>> {
        let mut highlighter = HighlightLines::new(self.syntax_for(path), &self.theme);
        lines
            .iter()
            .map(|line| match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => Line::from(
                    ranges
                        .into_iter()
                        .map(|(style, text)| {
                            let fg = style.foreground;
                            Span::styled(text.to_string(), Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)))
                        })
                        .collect::<Vec<_>>(),
                ),
                Err(_) => Line::raw(line.to_string()),
            })
            .collect()
    }
}

/// Full-screen viewer: one page of the current file with a line-number gutter.
pub struct ViewerWidget<'a> {
    state: &'a ViewerState,
    highlighter: Option<&'a Highlighter>,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> ViewerWidget<'a> {
    pub fn new(
        state: &'a ViewerState,
        highlighter: Option<&'a Highlighter>,
        theme: &'a ThemeColors,
    ) -> Self {
        Self {
            state,
            highlighter,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Title naming the file and its position in the list.
    pub fn title(state: &ViewerState) -> String {
        format!(
            " {} [{}/{}] ",
            state.current_path().display(),
            state.file_index() + 1,
            state.file_count()
        )
    }

    pub fn page_label(state: &ViewerState) -> String {
        format!(" page {}/{} ", state.page_index() + 1, state.page_count())
    }
}

impl<'a> Widget for ViewerWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let (lines, first_line_number) = match self.state.current_page() {
            PageView::Lines {
                lines,
                first_line_number,
            } => (lines, first_line_number),
            PageView::Error(e) => {
                let msg = format!("Error reading file: {e}");
                let line = Line::from(Span::styled(msg, Style::default().fg(self.theme.error_fg)));
                buf.set_line(inner.x, inner.y, &line, inner.width);
                return;
            }
        };

        if lines.is_empty() {
            let line = Line::from(Span::styled(
                "(empty file)",
                Style::default().fg(self.theme.dim_fg),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        let body: Vec<Line<'static>> = match self.highlighter {
            Some(h) => h.highlight(self.state.current_path(), &lines),
            None => lines
                .iter()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(self.theme.viewer_fg))))
                .collect(),
        };

        let last_number = first_line_number + lines.len() - 1;
        let gutter_width = last_number.to_string().len();
        let gutter_style = Style::default()
            .fg(self.theme.viewer_line_nr_fg)
            .add_modifier(Modifier::DIM);

        for (i, line) in body.into_iter().take(inner.height as usize).enumerate() {
            let y = inner.y + i as u16;
            let mut spans = vec![Span::styled(
                format!("{:>width$} │ ", first_line_number + i, width = gutter_width),
                gutter_style,
            )];
            spans.extend(line.spans);
            buf.set_line(inner.x, y, &Line::from(spans), inner.width);
        }
    }
}
