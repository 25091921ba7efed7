use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use doxmap_core::Indicators;

use crate::tui::app::App;
use crate::tui::theme::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();
    let leds = app.indicators();

    let mut spans = vec![
        Span::styled("doxmap ", t.text_primary().add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {} ", app.shown_layer()), t.layer_badge()),
        Span::raw(" "),
    ];
    for index in 1..=Indicators::COUNT {
        let glyph = if leds.is_lit(index) { "●" } else { "○" };
        spans.push(Span::styled(glyph, t.led(index, leds.is_lit(index))));
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled(app.identification.as_str(), t.text_muted()));
    spans.push(Span::raw(" "));
    spans.push(Span::styled("q:quit", t.key_hint()));

    let header = Paragraph::new(Line::from(spans)).alignment(Alignment::Left);
    frame.render_widget(header, area);
}
