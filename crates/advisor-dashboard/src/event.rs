//! Terminal input for the dashboard
//!
//! Crossterm events are reduced to the handful of actions the dashboard
//! understands. Anything else, including a poll that times out, becomes
//! [`InputEvent::Idle`] so the run loop can drain controller events.

use crate::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

/// What the user asked the dashboard to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    Quit,
    /// Retry the current selection
    Refresh,
    NextRegion,
    NextIndustry,
    Export,
    NextTab,
    PrevTab,
}

impl DashboardAction {
    /// Key map: `q`/Ctrl+C, `r`/F5, `g`, `i`, `e`, Tab, Shift+Tab
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return (key.code == KeyCode::Char('c')).then_some(Self::Quit);
        }
        let action = match key.code {
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'q' => Self::Quit,
                'r' => Self::Refresh,
                'g' => Self::NextRegion,
                'i' => Self::NextIndustry,
                'e' => Self::Export,
                _ => return None,
            },
            KeyCode::F(5) => Self::Refresh,
            KeyCode::BackTab => Self::PrevTab,
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Self::PrevTab,
            KeyCode::Tab => Self::NextTab,
            _ => return None,
        };
        Some(action)
    }
}

/// One step of terminal input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Action(DashboardAction),
    /// Terminal was resized; the next draw picks up the new size
    Resize,
    /// Nothing actionable arrived within the poll window
    Idle,
}

/// Wait up to `timeout` for terminal input
pub fn next_input(timeout: Duration) -> Result<InputEvent> {
    if !event::poll(timeout)? {
        return Ok(InputEvent::Idle);
    }
    Ok(match event::read()? {
        Event::Key(key) => DashboardAction::from_key(key).map_or(InputEvent::Idle, InputEvent::Action),
        Event::Resize(..) => InputEvent::Resize,
        _ => InputEvent::Idle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Option<DashboardAction> {
        DashboardAction::from_key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(key(KeyCode::Char('q'), KeyModifiers::NONE), Some(DashboardAction::Quit));
        assert_eq!(key(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(DashboardAction::Quit));
        assert_eq!(key(KeyCode::Char('c'), KeyModifiers::NONE), None);
        assert_eq!(key(KeyCode::Char('r'), KeyModifiers::CONTROL), None);
    }

    #[test]
    fn test_selection_keys() {
        assert_eq!(key(KeyCode::Char('r'), KeyModifiers::NONE), Some(DashboardAction::Refresh));
        assert_eq!(key(KeyCode::F(5), KeyModifiers::NONE), Some(DashboardAction::Refresh));
        assert_eq!(key(KeyCode::Char('g'), KeyModifiers::NONE), Some(DashboardAction::NextRegion));
        assert_eq!(key(KeyCode::Char('I'), KeyModifiers::SHIFT), Some(DashboardAction::NextIndustry));
        assert_eq!(key(KeyCode::Char('e'), KeyModifiers::NONE), Some(DashboardAction::Export));
        assert_eq!(key(KeyCode::Char('x'), KeyModifiers::NONE), None);
    }

    #[test]
    fn test_tab_navigation() {
        assert_eq!(key(KeyCode::Tab, KeyModifiers::NONE), Some(DashboardAction::NextTab));
        assert_eq!(key(KeyCode::Tab, KeyModifiers::SHIFT), Some(DashboardAction::PrevTab));
        assert_eq!(key(KeyCode::BackTab, KeyModifiers::SHIFT), Some(DashboardAction::PrevTab));
    }
}
