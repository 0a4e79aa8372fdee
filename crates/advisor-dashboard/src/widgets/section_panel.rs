//! Detail section widget
//!
//! Renders one market detail section as a table, a loading notice, or
//! the empty-state message when the gate collapsed every section.

use crate::sections::SectionView;
use advisor_core::{DashboardSnapshot, SectionKind};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

/// Shown inside a section that is still waiting for data
pub const SECTION_LOADING_TEXT: &str = "This section will update when data arrives";

pub struct SectionPanelWidget;

impl SectionPanelWidget {
    /// Render a single section
    pub fn render(
        kind: SectionKind,
        view: SectionView,
        snapshot: Option<&DashboardSnapshot>,
        area: Rect,
        buf: &mut Buffer,
    ) {
        if view == SectionView::Hidden {
            return;
        }

        let block = Block::default()
            .title(format!(" {} ", kind.title().to_uppercase()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        block.render(area, buf);

        let snapshot = match (view, snapshot) {
            (SectionView::Data(_), Some(snapshot)) => snapshot,
            _ => {
                buf.set_string(
                    inner.x + 1,
                    inner.y,
                    SECTION_LOADING_TEXT,
                    Style::default().fg(Color::DarkGray).italic(),
                );
                return;
            }
        };

        let (header, widths) = Self::columns(kind);
        let header = Row::new(header.iter().map(|h| Cell::from(*h))).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let table = Table::new(Self::rows(kind, snapshot), widths)
            .header(header)
            .column_spacing(1);

        Widget::render(table, inner, buf);
    }

    /// Render the collapsed state
    pub fn render_empty(message: &str, area: Rect, buf: &mut Buffer) {
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(" MARKET DETAILS ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        paragraph.render(area, buf);
    }

    fn columns(kind: SectionKind) -> (&'static [&'static str], Vec<Constraint>) {
        match kind {
            SectionKind::KeyPlayers => (
                &["Company", "Share", "HQ"][..],
                vec![Constraint::Min(16), Constraint::Length(7), Constraint::Length(14)],
            ),
            SectionKind::TechnologyAdoption => (
                &["Technology", "Adoption"][..],
                vec![Constraint::Min(16), Constraint::Length(9)],
            ),
            SectionKind::GeographicDistribution => (
                &["Region", "Share"][..],
                vec![Constraint::Min(16), Constraint::Length(7)],
            ),
            SectionKind::InvestmentTrends => (
                &["Period", "Total", "Deals"][..],
                vec![Constraint::Min(10), Constraint::Length(10), Constraint::Length(6)],
            ),
        }
    }

    fn rows(kind: SectionKind, snapshot: &DashboardSnapshot) -> Vec<Row<'static>> {
        let percent = |value: f64| format!("{:.1}%", value);
        match kind {
            SectionKind::KeyPlayers => snapshot
                .key_players
                .iter()
                .map(|player| {
                    Row::new(vec![
                        Cell::from(Self::truncate_text(&player.name, 24)),
                        Cell::from(percent(player.market_share_percent))
                            .style(Style::default().fg(Color::Green)),
                        Cell::from(player.headquarters.clone().unwrap_or_default())
                            .style(Style::default().fg(Color::Gray)),
                    ])
                })
                .collect(),
            SectionKind::TechnologyAdoption => snapshot
                .technology_adoption
                .iter()
                .map(|tech| {
                    Row::new(vec![
                        Cell::from(Self::truncate_text(&tech.technology, 24)),
                        Cell::from(percent(tech.adoption_rate_percent))
                            .style(Style::default().fg(Color::Green)),
                    ])
                })
                .collect(),
            SectionKind::GeographicDistribution => snapshot
                .geographic_distribution
                .iter()
                .map(|share| {
                    Row::new(vec![
                        Cell::from(Self::truncate_text(&share.region, 24)),
                        Cell::from(percent(share.share_percent))
                            .style(Style::default().fg(Color::Green)),
                    ])
                })
                .collect(),
            SectionKind::InvestmentTrends => snapshot
                .investment_trends
                .iter()
                .map(|trend| {
                    Row::new(vec![
                        Cell::from(trend.period.clone()),
                        Cell::from(format!("${}M", trend.total_usd_m))
                            .style(Style::default().fg(Color::Cyan)),
                        Cell::from(trend.deal_count.to_string()),
                    ])
                })
                .collect(),
        }
    }

    /// Truncate text to fit width
    fn truncate_text(text: &str, max_len: usize) -> String {
        if text.chars().count() <= max_len {
            text.to_string()
        } else {
            let kept: String = text.chars().take(max_len.saturating_sub(1)).collect();
            format!("{}…", kept)
        }
    }
}
