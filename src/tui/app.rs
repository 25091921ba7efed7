use doxmap_core::{
    HostOp, Indicators, KeyAction, KeyPos, Keymap, Layer, RecordingHost, Settings, Simulator,
    Step, COLS, ROWS,
};

const MAX_OUTPUT_LINES: usize = 800;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pane {
    Keymap,
    Output,
}

pub struct App {
    pub settings: Settings,
    pub sim: Simulator<RecordingHost>,
    pub identification: String,
    pub cursor: KeyPos,
    pub focused_pane: Pane,
    pub status: String,
    pub output: Vec<String>,
    pub output_scroll: usize,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        let mut app = Self {
            settings: settings.clone(),
            sim: Simulator::new(settings),
            identification: settings.identification(),
            cursor: KeyPos::new(0, 0),
            focused_pane: Pane::Keymap,
            status: String::from("Ready"),
            output: Vec::new(),
            output_scroll: 0,
        };
        if let Some(path) = settings.source_path() {
            app.push_output(format!("# settings from {}", path.display()));
        }
        app
    }

    pub fn set_status<S: Into<String>>(&mut self, msg: S) {
        self.status = msg.into();
    }

    pub fn push_output<S: AsRef<str>>(&mut self, msg: S) {
        for line in msg.as_ref().lines() {
            self.output.push(line.to_string());
        }
        if self.output.len() > MAX_OUTPUT_LINES {
            let overflow = self.output.len() - MAX_OUTPUT_LINES;
            self.output.drain(0..overflow);
        }
        // Follow the tail
        self.output_scroll = self.output.len().saturating_sub(1);
    }

    pub fn shown_layer(&self) -> Layer {
        self.sim.active_layer()
    }

    pub fn indicators(&self) -> Indicators {
        self.sim.indicators()
    }

    pub fn selected_action(&self) -> KeyAction {
        self.sim.peek(self.cursor)
    }

    /// Move the cursor, stepping over cells the board does not have.
    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let (mut row, mut col) = (self.cursor.row as isize, self.cursor.col as isize);
        loop {
            row += d_row;
            col += d_col;
            if !(0..ROWS as isize).contains(&row) || !(0..COLS as isize).contains(&col) {
                return;
            }
            let pos = KeyPos::new(row as u8, col as u8);
            if Keymap::is_populated(pos) {
                self.cursor = pos;
                return;
            }
        }
    }

    pub fn tap_selected(&mut self) {
        let pos = self.cursor;
        let result = self.sim.tap(pos);
        self.record(format!("tap {}", pos), result);
    }

    /// Press the selected key, or release it if it is already down
    pub fn toggle_hold_selected(&mut self) {
        let pos = self.cursor;
        if self.sim.is_held(pos) {
            let result = self.sim.release(pos);
            self.record(format!("release {}", pos), result);
        } else {
            let result = self.sim.press(pos);
            self.record(format!("press {}", pos), result);
        }
    }

    pub fn release_all(&mut self) {
        let result = self.sim.release_all();
        self.record("release all".to_string(), result);
    }

    pub fn toggle_layer(&mut self, index: usize) {
        let Some(layer) = Layer::from_index(index) else {
            return;
        };
        let changed = self.sim.toggle_layer(layer);
        let state = if self.sim.layer_state().is_active(layer) { "on" } else { "off" };
        self.push_output(format!("$ layer {} {}", layer, state));
        if let Some(set) = changed {
            self.push_output(format!("  leds {}", format_leds(set)));
        }
        self.set_status(format!("{} toggled {}", layer, state));
    }

    /// Re-read the settings file and start a fresh simulator from it
    pub fn reload_settings(&mut self) {
        match self.settings.reload() {
            Ok(()) => {
                self.sim = Simulator::new(&self.settings);
                self.identification = self.settings.identification();
                self.push_output(format!("# reloaded settings ({})", self.identification));
                self.set_status("Settings reloaded");
            }
            Err(err) => {
                log::warn!("reload failed: {}", err);
                self.set_status(format!("reload failed: {}", err));
            }
        }
    }

    pub fn clear_output(&mut self) {
        if let Err(err) = self.sim.release_all() {
            log::warn!("release before clear: {}", err);
        }
        self.output.clear();
        self.output_scroll = 0;
        self.sim.host_mut().clear();
        self.set_status("Output cleared");
    }

    fn record(&mut self, label: String, result: Result<Step, doxmap_core::HostError>) {
        match result {
            Ok(step) => {
                match step.action {
                    Some(action) => self.push_output(format!("$ {} -> {}", label, action)),
                    None => self.push_output(format!("$ {}", label)),
                }
                for op in &step.ops {
                    self.push_output(format!("  {}", format_op(op)));
                }
                if let Some(set) = step.indicators {
                    self.push_output(format!("  leds {}", format_leds(set)));
                }
                // The step already carries its ops; keep the host from growing
                self.sim.host_mut().take_ops();
                let typed = self.sim.host_mut().take_typed();
                if typed.is_empty() {
                    self.set_status(label);
                } else {
                    self.set_status(format!("{} | typed: {}", label, typed));
                }
            }
            Err(err) => {
                log::warn!("{}: {}", label, err);
                self.set_status(format!("{} failed: {}", label, err));
            }
        }
    }
}

pub fn format_leds(set: Indicators) -> String {
    if set.is_empty() {
        return "none".to_string();
    }
    set.lit()
        .map(|i| format!("LED{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_op(op: &HostOp) -> String {
    match op {
        HostOp::KeyDown(key) => format!("down KC_{}", key),
        HostOp::KeyUp(key) => format!("up   KC_{}", key),
        HostOp::SendString(text) => format!("send {:?}", text),
        HostOp::ResetEeprom => "eeconfig_init".to_string(),
        HostOp::RgbMode(mode) => format!("rgblight_mode {}", mode),
    }
}
