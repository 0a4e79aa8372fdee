//! Headline metrics panel widget
//!
//! Shows market size, growth rate, average deal size and maturity side by
//! side. The metric currently being revealed is highlighted.

use super::status_color_from_name;
use crate::state::{DashboardView, Stage};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders},
};

pub struct MetricsPanelWidget;

impl MetricsPanelWidget {
    /// Render the headline metrics
    pub fn render(view: &DashboardView, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" MARKET OVERVIEW ")
            .title(
                Line::from(format!(" {} ", view.status.label()))
                    .right_aligned()
                    .style(Style::default().fg(status_color_from_name(view.status.color_name()))),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 {
            Self::render_compact(view, inner, buf);
            return;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(inner);

        for (column, (label, value, stage)) in columns.iter().zip(Self::cells(view)) {
            let active = view.stage == stage;
            let value_style = if active {
                Style::default().fg(Color::Yellow).bold()
            } else if view.stage > stage {
                Style::default().fg(Color::White).bold()
            } else {
                Style::default().fg(Color::DarkGray)
            };

            buf.set_string(column.x + 1, column.y, label, Style::default().fg(Color::Gray));
            buf.set_string(column.x + 1, column.y + 1, value, value_style);
        }
    }

    /// Single-line rendering for short areas
    pub fn render_compact(view: &DashboardView, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let compact = Self::cells(view)
            .iter()
            .map(|(label, value, _)| format!("{}: {}", label, value))
            .collect::<Vec<_>>()
            .join(" | ");

        buf.set_string(area.x, area.y, &compact, Style::default().fg(Color::White));
    }

    fn cells(view: &DashboardView) -> [(&'static str, &str, Stage); 4] {
        [
            ("Market Size", view.display_market_size.as_str(), Stage::Market),
            ("Growth Rate", view.display_growth_rate.as_str(), Stage::Growth),
            ("Avg Deal Size", view.display_deal_size.as_str(), Stage::Deal),
            ("Maturity", view.display_maturity.as_str(), Stage::Maturity),
        ]
    }
}
