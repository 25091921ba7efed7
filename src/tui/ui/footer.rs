use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Pane};
use crate::tui::theme::{theme, Theme};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();

    let status_style = if app.status.contains("failed") {
        t.status_error()
    } else {
        t.status_message()
    };
    let line1 = Line::styled(format!("Status: {}", app.status), status_style);

    let line2 = match app.focused_pane {
        Pane::Keymap => keymap_hints(t),
        Pane::Output => Line::from(vec![
            Span::styled("Output log ~ ", t.text_muted()),
            Span::styled(format!("{} lines  ", app.output.len()), t.text_muted()),
            Span::styled("j/k", t.key_hint()),
            Span::styled(":scroll  ", t.text_muted()),
            Span::styled("g/G", t.key_hint()),
            Span::styled(":top/bottom  ", t.text_muted()),
            Span::styled("Tab", t.key_hint()),
            Span::styled(":keymap  ", t.text_muted()),
            Span::styled("q", t.key_hint()),
            Span::styled(":quit", t.text_muted()),
        ]),
    };

    frame.render_widget(Paragraph::new(vec![line1, line2]), area);
}

fn keymap_hints(t: &Theme) -> Line<'static> {
    let pairs = [
        ("arrows", ":move  "),
        ("Enter", ":tap  "),
        ("Space", ":hold/release  "),
        ("r", ":release all  "),
        ("0-4", ":toggle layer  "),
        ("c", ":clear  "),
        ("R", ":reload  "),
        ("Tab", ":output  "),
        ("q", ":quit"),
    ];
    Line::from(
        pairs
            .iter()
            .flat_map(|(key, what)| {
                [
                    Span::styled(*key, t.key_hint()),
                    Span::styled(*what, t.text_muted()),
                ]
            })
            .collect::<Vec<_>>(),
    )
}
