//! Keyboard input handling for the TUI.
//!
//! Translates key events into application state changes. Every preference
//! change is written through the settings store by the `App` methods.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{can_add_date_char, can_add_title_char, App, AppState};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    match app.state {
        AppState::EditingDate => handle_date_input(app, key),
        AppState::EditingTitle => handle_title_input(app, key),
        _ => handle_normal_input(app, key),
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('d') => app.start_date_edit(),
        KeyCode::Char('t') => app.start_title_edit(),
        KeyCode::Char('l') => app.toggle_language(),
        KeyCode::Char('b') => app.cycle_bg_color(),
        KeyCode::Char('c') => app.cycle_accent_color(),
        KeyCode::Char('r') => app.reset(),
        KeyCode::Char('u') => app.warm_cache_background(),
        _ => {}
    }
    Ok(false)
}

fn handle_date_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.commit_date(),
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Backspace => {
            app.date_input.pop();
        }
        KeyCode::Char(c) if can_add_date_char(&app.date_input, c) => app.date_input.push(c),
        _ => {}
    }
    Ok(false)
}

fn handle_title_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.commit_title(),
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Backspace => {
            app.title_input.pop();
        }
        KeyCode::Char(c) if can_add_title_char(&app.title_input, c) => app.title_input.push(c),
        _ => {}
    }
    Ok(false)
}
