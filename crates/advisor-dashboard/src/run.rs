//! Main run loop for the dashboard application
//!
//! Handles terminal initialization, event loop, and cleanup.

use crate::{
    app::App,
    event::{self, DashboardAction, InputEvent},
    source::StatsSource,
    terminal, ui, Result,
};
use advisor_core::{AdvisorConfig, FetchParams};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Main entry point for running the dashboard
pub async fn run(source: Arc<dyn StatsSource>, config: AdvisorConfig, params: FetchParams) -> Result<()> {
    let tick = Duration::from_millis(config.dashboard.tick_ms.max(1));

    terminal::install_panic_hook();
    let mut terminal = terminal::init()?;
    let guard = terminal::TerminalGuard::new();

    let mut app = App::new(source, config, params);
    app.start();

    loop {
        app.tick();
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll blocks for at most one tick; timers keep running on the runtime
        if let InputEvent::Action(action) = event::next_input(tick)? {
            match action {
                DashboardAction::Quit => app.should_quit = true,
                DashboardAction::Refresh => app.refresh(),
                DashboardAction::NextRegion => app.next_region(),
                DashboardAction::NextIndustry => app.next_industry(),
                DashboardAction::Export => {
                    app.export_report().await;
                }
                DashboardAction::NextTab => app.next_tab(),
                DashboardAction::PrevTab => app.prev_tab(),
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!("Dashboard closed after {} load(s)", app.exporter.load_count());
    app.controller.shutdown();
    guard.restore()?;

    Ok(())
}
