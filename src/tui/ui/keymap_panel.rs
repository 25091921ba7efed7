use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use doxmap_core::{KeyAction, KeyPos, Keymap, COLS, ROWS};

use crate::tui::app::{App, Pane};
use crate::tui::theme::theme;

const CELL_WIDTH: usize = 9;

/// Short form of a token for a grid cell
fn cell_label(action: KeyAction) -> String {
    let token = match action {
        KeyAction::Transparent => return "___".to_string(),
        KeyAction::No => return String::new(),
        other => other.to_string(),
    };
    let token = token.replace("KC_", "");
    if token.chars().count() > CELL_WIDTH - 1 {
        token.chars().take(CELL_WIDTH - 2).chain(['…']).collect()
    } else {
        token
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();
    let focused = app.focused_pane == Pane::Keymap;

    let block = Block::default()
        .title(t.panel_title(&format!("LAYER {}", app.shown_layer()), focused))
        .borders(Borders::ALL)
        .border_style(t.panel_border(focused))
        .border_type(if focused {
            BorderType::Thick
        } else {
            BorderType::Plain
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::with_capacity(ROWS * 2 + 1);
    for row in 0..ROWS {
        let mut spans = Vec::with_capacity(COLS + 1);
        for col in 0..COLS {
            if col == COLS / 2 {
                spans.push(Span::raw("   "));
            }
            let pos = KeyPos::new(row as u8, col as u8);
            if !Keymap::is_populated(pos) {
                spans.push(Span::raw(" ".repeat(CELL_WIDTH)));
                continue;
            }
            let action = app.sim.peek(pos);
            let style = t.key_cell(action, pos == app.cursor && focused, app.sim.is_held(pos));
            spans.push(Span::styled(
                format!("{:^width$}", cell_label(action), width = CELL_WIDTH),
                style,
            ));
        }
        lines.push(Line::from(spans));
        lines.push(Line::raw(""));
    }

    lines.push(Line::from(vec![
        Span::styled(format!("{} ", app.cursor), t.text_muted()),
        Span::styled(app.selected_action().to_string(), t.text_primary()),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxmap_core::{Key, Layer};

    #[test]
    fn test_cell_labels() {
        assert_eq!(cell_label(KeyAction::Key(Key::A)), "A");
        assert_eq!(cell_label(KeyAction::Transparent), "___");
        assert_eq!(cell_label(KeyAction::No), "");
        assert_eq!(cell_label(KeyAction::LayerTap(Layer::Navigation, Key::K)), "LT(NAVI…");
        assert_eq!(cell_label(KeyAction::Momentary(Layer::Symbols)), "MO(SYMB)");
    }
}
