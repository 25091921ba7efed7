mod footer;
mod header;
mod keymap_panel;
mod output_panel;

use ratatui::prelude::*;

use crate::tui::app::App;

pub fn draw_ui(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Header: name, layer, LEDs
            Constraint::Length(16), // Keymap grid, two text rows per key row
            Constraint::Min(6),     // Output log
            Constraint::Length(2),  // Footer
        ])
        .split(frame.area());

    header::render(frame, app, root[0]);
    keymap_panel::render(frame, app, root[1]);
    output_panel::render(frame, app, root[2]);
    footer::render(frame, app, root[3]);
}
