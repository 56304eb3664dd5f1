pub mod help;
pub mod selected_list;
pub mod status_bar;
pub mod tree;
pub mod viewer;

use ratatui::layout::Rect;

/// Centered overlay: 70% wide and 80% tall, capped at `max_width` x `max_height`.
pub(crate) fn overlay_area(area: Rect, max_width: u16, max_height: u16) -> Rect {
    let width = ((area.width as u32 * 7 / 10) as u16).min(max_width);
    let height = ((area.height as u32 * 8 / 10) as u16).min(max_height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
