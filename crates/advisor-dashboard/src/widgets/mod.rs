//! Dashboard widgets module
//!
//! Ratatui widgets for the market dashboard. Each widget renders one part of
//! the `DashboardView` or the section gate output.

use ratatui::style::Color;

mod metrics_panel;
mod quota_banner;
mod section_panel;

pub use metrics_panel::MetricsPanelWidget;
pub use quota_banner::QuotaBannerWidget;
pub use section_panel::SectionPanelWidget;

/// Convert color name string to ratatui Color.
///
/// Shared utility used by multiple widgets to convert status color names
/// (from `FetchStatus::color_name()`) to ratatui `Color` values.
pub fn status_color_from_name(color_name: &str) -> Color {
    match color_name {
        "gray" => Color::DarkGray,
        "yellow" => Color::Yellow,
        "green" => Color::Green,
        "red" => Color::Red,
        "magenta" => Color::Magenta,
        _ => Color::White,
    }
}

/// Flatten a buffer into its symbols, row by row
#[cfg(test)]
pub(crate) fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut text = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            text.push_str(buf[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}
