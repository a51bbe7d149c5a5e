//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  In browse mode keys are
//! commands; in compose mode they edit the quote being typed.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in `ui::draw_status_bar`.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Mode};

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match app.mode {
        Mode::Browse => handle_browse(app, key),
        Mode::Compose => handle_compose(app, key),
    }
}

fn handle_browse(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Enter => app.render_selected(),
        KeyCode::Char('n') => app.rotate_now(),
        KeyCode::Char('p') => app.toggle_rotation(),
        KeyCode::Char('i') => app.start_compose(),
        _ => {}
    }
}

fn handle_compose(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_compose(),
        KeyCode::Enter => app.submit_compose(),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.cancel_compose(),
        KeyCode::Char(c) => app.push_char(c),
        _ => {}
    }
}
