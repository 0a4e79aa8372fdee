//! Main UI layout and rendering
//!
//! Defines the overall dashboard layout and delegates to individual widgets.

use crate::{
    app::{App, TabSelection},
    sections::GateOutput,
    widgets::{MetricsPanelWidget, QuotaBannerWidget, SectionPanelWidget},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Draw the entire dashboard UI
pub fn draw(frame: &mut Frame, app: &App) {
    let view = app.controller.view();
    let banner_height = if view.quota_message.is_some() { 4 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Header (selection + keybindings)
            Constraint::Length(banner_height), // Quota banner
            Constraint::Min(0),                // Content area
            Constraint::Length(1),             // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);

    if let Some(message) = &view.quota_message {
        frame.render_widget(
            WidgetAdapter::new(|area, buf| QuotaBannerWidget::render(message, area, buf)),
            chunks[1],
        );
    }

    match app.selected_tab {
        TabSelection::Overview => {
            let content = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(4), Constraint::Min(0)])
                .split(chunks[2]);

            frame.render_widget(
                WidgetAdapter::new(|area, buf| MetricsPanelWidget::render(&view, area, buf)),
                content[0],
            );
            render_sections(frame, content[1], app);
        }
        TabSelection::Details => render_details(frame, chunks[2], app),
    }

    render_footer(frame, chunks[3], app);
}

/// Render the header with the current selection and keybindings
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let title = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            "MARKET ADVISOR",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.params.to_string(), Style::default().fg(Color::Gray)),
    ])])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, header_chunks[0]);

    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let keybindings = Paragraph::new(vec![Line::from(vec![
        key("[q]"),
        Span::raw("uit "),
        key("[r]"),
        Span::raw("etry "),
        key("[i]"),
        Span::raw("ndustry re"),
        key("[g]"),
        Span::raw("ion "),
        key("[e]"),
        Span::raw("xport "),
        key("[Tab]"),
    ])])
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Right);
    frame.render_widget(keybindings, header_chunks[1]);
}

/// Render the section gate output, panels side by side in a grid
fn render_sections(frame: &mut Frame, area: Rect, app: &App) {
    let snapshot = app.controller.snapshot();
    let panels = match app.controller.sections() {
        GateOutput::Panels(panels) => panels,
        GateOutput::Empty(message) => {
            frame.render_widget(
                WidgetAdapter::new(|area, buf| SectionPanelWidget::render_empty(message, area, buf)),
                area,
            );
            return;
        }
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2); 2])
        .split(area);

    for (row_index, row_panels) in panels.chunks(2).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, row_panels.len() as u32); row_panels.len()])
            .split(rows[row_index]);

        for (cell, &(kind, view)) in cells.iter().zip(row_panels) {
            frame.render_widget(
                WidgetAdapter::new(|area, buf| {
                    SectionPanelWidget::render(kind, view, snapshot.as_deref(), area, buf)
                }),
                *cell,
            );
        }
    }
}

/// Render the details tab: every visible section stacked full width
fn render_details(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab header
            Constraint::Min(0),    // Sections
        ])
        .split(area);

    let tabs = Tabs::new(vec!["Overview", "Details"])
        .block(Block::default().borders(Borders::ALL).title("View"))
        .select(1)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    let snapshot = app.controller.snapshot();
    let panels = match app.controller.sections() {
        GateOutput::Panels(panels) => panels,
        GateOutput::Empty(message) => {
            frame.render_widget(
                WidgetAdapter::new(|area, buf| SectionPanelWidget::render_empty(message, area, buf)),
                chunks[1],
            );
            return;
        }
    };

    let stacked = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, panels.len() as u32); panels.len()])
        .split(chunks[1]);

    for (cell, &(kind, view)) in stacked.iter().zip(&panels) {
        frame.render_widget(
            WidgetAdapter::new(|area, buf| {
                SectionPanelWidget::render(kind, view, snapshot.as_deref(), area, buf)
            }),
            *cell,
        );
    }
}

/// Render the footer: fetch status and the latest notice
fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let status = app.controller.fetch_state().status;
    let mut spans = vec![Span::styled(
        format!(" {} ", status.label()),
        Style::default().fg(crate::widgets::status_color_from_name(status.color_name())),
    )];
    if let Some(notice) = &app.notice {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(notice.clone(), Style::default().fg(Color::Gray)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Widget adapter to bridge static render methods to ratatui's Widget trait
struct WidgetAdapter<F>
where
    F: FnOnce(Rect, &mut Buffer),
{
    render_fn: F,
}

impl<F> WidgetAdapter<F>
where
    F: FnOnce(Rect, &mut Buffer),
{
    fn new(render_fn: F) -> Self {
        Self { render_fn }
    }
}

impl<F> Widget for WidgetAdapter<F>
where
    F: FnOnce(Rect, &mut Buffer),
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        (self.render_fn)(area, buf);
    }
}
