use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::help::HelpOverlay;
use crate::components::selected_list::SelectedListOverlay;
use crate::components::status_bar::{StatusBarWidget, LIST_HINTS, TREE_HINTS, VIEWER_HINTS};
use crate::components::tree::TreeWidget;
use crate::components::viewer::ViewerWidget;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    // Inner height: the border takes two rows.
    let inner_height = main_area.height.saturating_sub(2) as usize;

    if matches!(app.mode, AppMode::Viewer(_)) {
        app.set_viewer_height(inner_height);
        render_viewer(app, frame, main_area);
    } else {
        app.tree_height = inner_height.max(1);
        render_tree(app, frame, main_area);
    }

    match &app.mode {
        AppMode::SelectedList { paths, scroll } => {
            let root = &app.tree.node(app.tree.root()).path;
            frame.render_widget(
                SelectedListOverlay::new(paths, root, *scroll, &app.theme),
                main_area,
            );
        }
        AppMode::Help { scroll } => {
            frame.render_widget(HelpOverlay::new(&app.theme, *scroll), main_area);
        }
        AppMode::Tree | AppMode::Viewer(_) => {}
    }

    render_status_bar(app, frame, status_area);
}

fn render_tree(app: &App, frame: &mut Frame, area: Rect) {
    let root = app.tree.node(app.tree.root());
    let block = Block::default()
        .title(format!(" {} ", root.name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg));
    let widget = TreeWidget::new(&app.tree, &app.viewport, &app.theme).block(block);
    frame.render_widget(widget, area);
}

fn render_viewer(app: &App, frame: &mut Frame, area: Rect) {
    let AppMode::Viewer(state) = &app.mode else {
        return;
    };
    let block = Block::default()
        .title(ViewerWidget::title(state))
        .title_bottom(Line::from(ViewerWidget::page_label(state)).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg));
    let widget = ViewerWidget::new(state, app.highlighter.as_ref(), &app.theme).block(block);
    frame.render_widget(widget, area);
}

fn render_status_bar(app: &mut App, frame: &mut Frame, area: Rect) {
    let info = app.status_info();
    let root = app.tree.node(app.tree.root()).path.display().to_string();
    let hints = match app.mode {
        AppMode::Viewer(_) => VIEWER_HINTS,
        AppMode::SelectedList { .. } | AppMode::Help { .. } => LIST_HINTS,
        AppMode::Tree => TREE_HINTS,
    };

    let mut widget = StatusBarWidget::new(&root, &info, &app.theme).hints(hints);
    if let Some(msg) = &app.status_message {
        widget = widget.status_message(&msg.text, msg.kind);
    }
    frame.render_widget(widget, area);
}
