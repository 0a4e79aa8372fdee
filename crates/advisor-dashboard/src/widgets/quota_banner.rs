//! Quota exceeded banner

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub struct QuotaBannerWidget;

impl QuotaBannerWidget {
    pub fn render(message: &str, area: Rect, buf: &mut Buffer) {
        Paragraph::new(message)
            .style(Style::default().fg(Color::Magenta).bold())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(" QUOTA ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta)),
            )
            .render(area, buf);
    }
}
