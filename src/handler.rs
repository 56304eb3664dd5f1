use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};

/// Handle a key event according to the current mode.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.mode {
        AppMode::Tree => handle_tree_key(app, key),
        AppMode::Viewer(_) => handle_viewer_key(app, key),
        AppMode::SelectedList { .. } => handle_overlay_key(app, key, KeyCode::Char('p')),
        AppMode::Help { .. } => handle_overlay_key(app, key, KeyCode::Char('?')),
    }
}

fn handle_tree_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Right | KeyCode::Enter | KeyCode::Char('l') => app.toggle_expand(),
        KeyCode::Left | KeyCode::Char('h') => app.collapse_or_parent(),
        KeyCode::Char(' ') => app.toggle_selection(),
        KeyCode::Char('s') => app.save_selection(),
        KeyCode::Char('p') => app.list_selected(),
        KeyCode::Char('v') => app.view_selected(),
        KeyCode::Char('e') => app.export_content(),
        KeyCode::Char('?') => app.open_help(),
        _ => {}
    }
}

fn handle_viewer_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
        app.close_overlay();
        return;
    }
    let Some(viewer) = app.viewer_mut() else {
        return;
    };
    match key.code {
        KeyCode::Right
        | KeyCode::PageDown
        | KeyCode::Char('l')
        | KeyCode::Char(' ')
        | KeyCode::Char('n') => {
            viewer.next_page();
        }
        KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') | KeyCode::Char('b') => {
            viewer.previous_page();
        }
        KeyCode::Tab | KeyCode::Char('N') => {
            viewer.next_file();
        }
        KeyCode::BackTab | KeyCode::Char('P') => {
            viewer.previous_file();
        }
        _ => {}
    }
}

fn handle_overlay_key(app: &mut App, key: KeyEvent, close_key: KeyCode) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.close_overlay(),
        code if code == close_key => app.close_overlay(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_overlay(true),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_overlay(false),
        _ => {}
    }
}
