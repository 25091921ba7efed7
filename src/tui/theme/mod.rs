mod palette;

use doxmap_core::KeyAction;
use ratatui::prelude::*;

pub use palette::Palette;

pub struct Theme {
    pub palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme {
    pub fn new() -> Self {
        Self {
            palette: Palette::new(),
        }
    }

    // Panel border style
    pub fn panel_border(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.palette.border_focused)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.palette.border_default)
        }
    }

    // Layer badge in the header
    pub fn layer_badge(&self) -> Style {
        Style::default()
            .fg(self.palette.selection_fg)
            .bg(self.palette.key_layer)
            .add_modifier(Modifier::BOLD)
    }

    // One LED, 1-based
    pub fn led(&self, index: u8, lit: bool) -> Style {
        let color = self
            .palette
            .led_colors
            .get(usize::from(index.saturating_sub(1)))
            .copied()
            .unwrap_or(self.palette.text_primary);
        if lit {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.palette.led_off)
        }
    }

    // Key cell, by what the key does
    pub fn key_cell(&self, action: KeyAction, selected: bool, held: bool) -> Style {
        if selected {
            return Style::default()
                .fg(self.palette.selection_fg)
                .bg(self.palette.selection_bg)
                .add_modifier(Modifier::BOLD);
        }
        let base = match action {
            KeyAction::No | KeyAction::Transparent => self.text_muted(),
            KeyAction::LayerTap(..) | KeyAction::Momentary(_) => {
                Style::default().fg(self.palette.key_layer)
            }
            KeyAction::Custom(_) | KeyAction::Macro(_) | KeyAction::Rgb(_) => {
                Style::default().fg(self.palette.key_custom)
            }
            KeyAction::Modded(..) | KeyAction::ModTap(..) => self.text_secondary(),
            KeyAction::Key(_) => self.text_primary(),
        };
        if held {
            base.bg(self.palette.key_held_bg).add_modifier(Modifier::BOLD)
        } else {
            base
        }
    }

    // Primary text
    pub fn text_primary(&self) -> Style {
        Style::default().fg(self.palette.text_primary)
    }

    // Secondary/dimmed text
    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.palette.text_secondary)
    }

    // Muted text (hints, labels)
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    // Title style for focused panel
    pub fn title_focused(&self) -> Style {
        Style::default()
            .fg(self.palette.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    // Title style for unfocused panel
    pub fn title_unfocused(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    // Output lines for simulated events
    pub fn output_command(&self) -> Style {
        Style::default()
            .fg(self.palette.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    // Output lines for notes
    pub fn output_note(&self) -> Style {
        Style::default().fg(self.palette.accent_success)
    }

    // Output text style for regular text
    pub fn output_text(&self) -> Style {
        Style::default().fg(self.palette.text_primary)
    }

    // Key hint style (the key part like "Tab")
    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.palette.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    // Status message style
    pub fn status_message(&self) -> Style {
        Style::default().fg(self.palette.accent_warning)
    }

    // Error status
    pub fn status_error(&self) -> Style {
        Style::default().fg(self.palette.accent_danger)
    }

    // Panel title with optional focus indicator
    pub fn panel_title(&self, title: &str, focused: bool) -> Line<'_> {
        if focused {
            Line::styled(format!(" {} ", title), self.title_focused())
        } else {
            Line::styled(format!(" {} ", title), self.title_unfocused())
        }
    }
}

/// Global theme instance
pub static THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::new)
}
