use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::StatusKind;
use crate::theme::ThemeColors;

pub const TREE_HINTS: &str = " spc:select  s:save  p:list  v:view  e:export  ?:help  q:quit ";
pub const VIEWER_HINTS: &str = " n/b:page  tab:file  q:close ";
pub const LIST_HINTS: &str = " j/k:scroll  q:close ";

/// Truncate to `max` characters, keeping the end and marking the cut.
fn truncate_left(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().skip(len - max).collect();
    }
    let tail: String = s.chars().skip(len - (max - 3)).collect();
    format!("...{tail}")
}

/// Status bar: root path, selection summary and key hints, or a transient
/// status message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    info: &'a str,
    hints: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<(&'a str, StatusKind)>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            info,
            hints: TREE_HINTS,
            theme,
            status_message: None,
        }
    }

    pub fn hints(mut self, hints: &'a str) -> Self {
        self.hints = hints;
        self
    }

    pub fn status_message(mut self, msg: &'a str, kind: StatusKind) -> Self {
        self.status_message = Some((msg, kind));
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;

        if let Some((msg, kind)) = self.status_message {
            let style = match kind {
                StatusKind::Error => Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_bg),
                StatusKind::Warning => Style::default()
                    .bg(self.theme.status_bg)
                    .fg(self.theme.warning_fg),
                StatusKind::Info => Style::default()
                    .bg(self.theme.status_bg)
                    .fg(self.theme.success_fg),
            };
            let display: String = msg.chars().take(width).collect();
            let line = Line::from(Span::styled(format!("{display:<width$}"), style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Normal bar: [path] [info] [key hints]
        let hints_len = self.hints.chars().count();
        let remaining = width.saturating_sub(hints_len);
        let info_len = self.info.chars().count();
        let path_budget = remaining.saturating_sub(info_len + 1);
        let path_display = truncate_left(self.path_str, path_budget);
        let gap = remaining
            .saturating_sub(path_display.chars().count())
            .saturating_sub(info_len);

        let bar = Style::default().bg(self.theme.status_bg);
        let spans = vec![
            Span::styled(path_display, bar.fg(self.theme.status_fg)),
            Span::styled(" ".repeat(gap), bar),
            Span::styled(self.info, bar.fg(self.theme.info_fg)),
            Span::styled(
                self.hints,
                bar.fg(self.theme.dim_fg).add_modifier(Modifier::DIM),
            ),
        ];
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn test_theme() -> ThemeColors {
        theme::dark_theme()
    }

    fn row_text(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn test_status_message_info() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("/path", "info", &tc)
            .status_message("Saved 3 paths to out.txt", StatusKind::Info);

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(row_text(&buf, 80).contains("Saved 3 paths to out.txt"));
        assert_eq!(buf.cell((0, 0)).unwrap().fg, tc.success_fg);
    }

    #[test]
    fn test_status_message_error() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("/path", "info", &tc)
            .status_message("Cannot write out.txt: permission denied", StatusKind::Error);

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(row_text(&buf, 80).contains("permission denied"));
        let cell = buf.cell((0, 0)).unwrap();
        assert_eq!(cell.bg, tc.error_fg);
        // The background fills the whole bar.
        assert_eq!(buf.cell((79, 0)).unwrap().bg, tc.error_fg);
    }

    #[test]
    fn test_status_message_warning() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("/path", "info", &tc)
            .status_message("Skipped 1 binary file: a.png", StatusKind::Warning);
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        assert_eq!(buf.cell((0, 0)).unwrap().fg, tc.warning_fg);
    }

    #[test]
    fn test_normal_bar_rendering() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("/home/user/project", "3 files selected", &tc);

        let area = Rect::new(0, 0, 120, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = row_text(&buf, 120);
        assert!(content.starts_with("/home/user/project"));
        assert!(content.contains("3 files selected"));
        assert!(content.contains("spc:select"));
        assert!(content.contains("q:quit"));
    }

    #[test]
    fn test_viewer_hints() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("/p", "", &tc).hints(VIEWER_HINTS);
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        assert!(row_text(&buf, 60).contains("tab:file"));
    }

    #[test]
    fn test_long_path_truncated_from_left() {
        assert_eq!(truncate_left("/a/very/long/path", 10), "...ng/path");
        assert_eq!(truncate_left("short", 10), "short");
        assert_eq!(truncate_left("/ünïcode/päth", 6), "...äth");
        assert_eq!(truncate_left("abcdef", 2), "ef");
    }

    #[test]
    fn test_zero_area_does_not_panic() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("/path", "info", &tc);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
