/*
[INPUT]:  Crossterm key codes
[OUTPUT]: Tab switches and quit requests on DashboardApp
[POS]:    TUI key handling
[UPDATE]: When adding hotkeys
*/

use crossterm::event::KeyCode;

use super::app::{DashboardApp, Tab};

/// Handles key events for the TUI.
///
/// Returns `true` if quit is requested, `false` otherwise.
pub(crate) fn handle_key_event(app: &mut DashboardApp, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Tab | KeyCode::Char('l') => {
            app.next_tab();
            false
        }
        KeyCode::Char('1') => {
            app.set_tab(Tab::Dashboard);
            false
        }
        KeyCode::Char('2') => {
            app.set_tab(Tab::Logs);
            false
        }
        _ => false,
    }
}
