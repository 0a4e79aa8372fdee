//! Terminal setup and teardown utilities
//!
//! Raw mode and the alternate screen are entered once and left exactly
//! once, whether the dashboard exits normally, with an error, or by panic.

use crate::Result;
use advisor_core::AdvisorError;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};

/// Terminal type for the dashboard
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

fn dashboard_error(action: &'static str) -> impl FnOnce(io::Error) -> AdvisorError {
    move |e| AdvisorError::Dashboard(format!("Failed to {}: {}", action, e))
}

/// Initialize the terminal for TUI rendering
pub fn init() -> Result<Tui> {
    enable_raw_mode().map_err(dashboard_error("enable raw mode"))?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(dashboard_error("enter alternate screen"))?;

    Terminal::new(CrosstermBackend::new(stdout)).map_err(dashboard_error("create terminal"))
}

/// Restore the terminal to its original state
pub fn restore() -> Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen).map_err(dashboard_error("leave alternate screen"))?;
    disable_raw_mode().map_err(dashboard_error("disable raw mode"))?;
    Ok(())
}

/// Restore the terminal before the default panic message is printed
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        default_hook(info);
    }));
}

/// RAII guard for terminal state
///
/// Restores the terminal on drop unless [`TerminalGuard::restore`] already
/// did.
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    pub fn new() -> Self {
        Self { active: true }
    }

    /// Restore now and report any failure
    pub fn restore(mut self) -> Result<()> {
        self.active = false;
        restore()
    }
}

impl Default for TerminalGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Touches the real terminal, run manually with --ignored
    #[test]
    #[ignore]
    fn test_init_restore() {
        let terminal = init().expect("Failed to init terminal");
        assert!(terminal.size().is_ok());
        TerminalGuard::new().restore().expect("Failed to restore terminal");
    }

    #[test]
    fn test_error_mapping() {
        let err = dashboard_error("enable raw mode")(io::Error::new(io::ErrorKind::Other, "not a tty"));
        assert!(matches!(err, AdvisorError::Dashboard(_)));
        assert_eq!(err.to_string(), "Dashboard error: Failed to enable raw mode: not a tty");
    }
}
