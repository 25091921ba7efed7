use std::io;

use crossterm::event::KeyCode;

use crate::tui::app::{App, Pane};

/// Handle input and return true if the app should quit
pub fn handle_input(app: &mut App, key: KeyCode) -> io::Result<bool> {
    match key {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Tab | KeyCode::BackTab => {
            app.focused_pane = match app.focused_pane {
                Pane::Keymap => Pane::Output,
                Pane::Output => Pane::Keymap,
            };
            return Ok(false);
        }
        // Layer toggles, as TG(n) would on the board
        KeyCode::Char(c @ '0'..='4') => {
            app.toggle_layer(c as usize - '0' as usize);
            return Ok(false);
        }
        KeyCode::Char('r') => {
            app.release_all();
            return Ok(false);
        }
        KeyCode::Char('c') => {
            app.clear_output();
            return Ok(false);
        }
        KeyCode::Char('R') => {
            app.reload_settings();
            return Ok(false);
        }
        _ => {}
    }

    match app.focused_pane {
        Pane::Keymap => handle_keymap_input(app, key),
        Pane::Output => handle_output_input(app, key),
    }

    Ok(false)
}

fn handle_keymap_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Left | KeyCode::Char('h') => app.move_cursor(0, -1),
        KeyCode::Right | KeyCode::Char('l') => app.move_cursor(0, 1),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1, 0),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1, 0),
        KeyCode::Enter => app.tap_selected(),
        KeyCode::Char(' ') => app.toggle_hold_selected(),
        _ => {}
    }
}

fn handle_output_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.output_scroll = app.output_scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.output_scroll = app.output_scroll.saturating_add(1);
        }
        KeyCode::Home | KeyCode::Char('g') => app.output_scroll = 0,
        KeyCode::End | KeyCode::Char('G') => {
            app.output_scroll = app.output.len().saturating_sub(1);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxmap_core::{KeyPos, Layer, Settings};

    fn app() -> App {
        App::new(&Settings::new())
    }

    #[test]
    fn test_quit_and_pane_cycle() {
        let mut app = app();
        assert!(!handle_input(&mut app, KeyCode::Tab).unwrap());
        assert_eq!(app.focused_pane, Pane::Output);
        assert!(!handle_input(&mut app, KeyCode::BackTab).unwrap());
        assert_eq!(app.focused_pane, Pane::Keymap);
        assert!(handle_input(&mut app, KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn test_cursor_skips_absent_cells() {
        let mut app = app();
        app.cursor = KeyPos::new(2, 5);
        handle_input(&mut app, KeyCode::Right).unwrap();
        assert_eq!(app.cursor, KeyPos::new(2, 8));
        app.cursor = KeyPos::new(5, 1);
        handle_input(&mut app, KeyCode::Left).unwrap();
        assert_eq!(app.cursor, KeyPos::new(5, 1));
    }

    #[test]
    fn test_layer_digits_toggle() {
        let mut app = app();
        handle_input(&mut app, KeyCode::Char('4')).unwrap();
        assert_eq!(app.shown_layer(), Layer::Qwerty);
        handle_input(&mut app, KeyCode::Char('4')).unwrap();
        assert_eq!(app.shown_layer(), Layer::Base);
    }

    #[test]
    fn test_enter_taps_into_output() {
        let mut app = app();
        app.cursor = KeyPos::new(1, 1);
        handle_input(&mut app, KeyCode::Enter).unwrap();
        assert!(app.output.iter().any(|l| l.starts_with("$ tap k11")));
    }

    #[test]
    fn test_status_shows_only_latest_typing() {
        let mut app = App::new(&Settings::new().with_identity("ergodox_ez", "anydoby", "1"));
        handle_input(&mut app, KeyCode::Char('1')).unwrap();
        app.cursor = KeyPos::new(0, 0);
        handle_input(&mut app, KeyCode::Enter).unwrap();
        handle_input(&mut app, KeyCode::Enter).unwrap();
        assert_eq!(app.status, "tap k00 | typed: ergodox_ez/anydoby @ 1");
        assert!(app.sim.host().ops().is_empty());
        assert!(app.sim.host().typed().is_empty());
    }

    #[test]
    fn test_reload_without_file_keeps_state() {
        let mut app = app();
        handle_input(&mut app, KeyCode::Char('1')).unwrap();
        handle_input(&mut app, KeyCode::Char('R')).unwrap();
        assert!(app.status.starts_with("reload failed"));
        assert_eq!(app.shown_layer(), Layer::Symbols);
    }

    #[test]
    fn test_reload_reads_edited_file() {
        let path = std::env::temp_dir().join(format!("doxmap-tui-{}.toml", std::process::id()));
        std::fs::write(&path, "[identity]\nversion = \"1\"\n").unwrap();
        let mut app = App::new(&Settings::from_file(&path).unwrap());
        assert!(app.identification.ends_with("@ 1"));

        std::fs::write(&path, "[identity]\nversion = \"2\"\n").unwrap();
        handle_input(&mut app, KeyCode::Char('R')).unwrap();
        assert_eq!(app.status, "Settings reloaded");
        assert!(app.identification.ends_with("@ 2"));
        std::fs::remove_file(&path).unwrap();
    }
}
