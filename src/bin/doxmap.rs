// Doxmap CLI
// Inspect, validate and simulate the anydoby ErgoDox EZ keymap

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use doxmap_core::settings::default_settings_content;
use doxmap_core::{
    expand_ops, indicators_for, HostOp, Indicators, KeyAction, KeyEvent, KeyPos, KeyRecord,
    Keymap, Layer, RecordingHost, Settings, Simulator, Step, COLS, KEYMAP, ROWS,
};

/// anydoby ErgoDox EZ keymap tool
#[derive(Parser, Debug)]
#[command(name = "doxmap")]
#[command(version)]
#[command(about = "Inspect, validate and simulate the anydoby ErgoDox EZ keymap", long_about = None)]
struct Args {
    /// TOML settings file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a layer as a grid of QMK tokens (all layers if omitted)
    Show {
        #[arg(value_parser = parse_layer)]
        layer: Option<Layer>,
    },
    /// Run the structural checks over the table
    Check,
    /// List the positions that bind an action, e.g. "LT(NAVI,KC_K)"
    Find { token: String },
    /// Tap one position with a layer held
    Tap {
        #[arg(value_parser = parse_layer)]
        layer: Layer,
        row: usize,
        col: usize,
        /// Show SEND_STRING text as the key taps it becomes
        #[arg(long)]
        expand: bool,
    },
    /// Play a sequence of events: "+k2A" presses, "-k2A" releases, "k2A" taps
    Press {
        #[arg(required = true, allow_hyphen_values = true)]
        events: Vec<String>,
        #[arg(long)]
        expand: bool,
    },
    /// Show the LEDs lit for a layer-state mask (decimal, 0x or 0b)
    Leds { state: String },
    /// Write a commented settings file to --config or the default path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_layer(s: &str) -> Result<Layer, String> {
    if let Ok(index) = s.parse::<usize>() {
        return Layer::from_index(index).ok_or_else(|| format!("no layer {}", index));
    }
    s.parse::<Layer>().map_err(|_| format!("unknown layer '{}'", s))
}

/// Parse `kRC` (hex digits, as in the layout listing) or `R,C` (decimal).
fn parse_pos(s: &str) -> Result<KeyPos> {
    let (row, col) = match s.strip_prefix('k').or_else(|| s.strip_prefix('K')) {
        Some(rc) if rc.len() == 2 => {
            let mut digits = rc.chars().map(|c| c.to_digit(16));
            match (digits.next().flatten(), digits.next().flatten()) {
                (Some(r), Some(c)) => (r as usize, c as usize),
                _ => bail!("bad position '{}'", s),
            }
        }
        _ => {
            let (r, c) = s
                .split_once(',')
                .with_context(|| format!("bad position '{}', expected kRC or R,C", s))?;
            (r.trim().parse()?, c.trim().parse()?)
        }
    };
    Ok(KeyPos::checked(row, col)?)
}

fn parse_state(s: &str) -> Result<u32> {
    let parsed = if let Some(hex) = s.strip_prefix("0x") {
        u32::from_str_radix(hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b") {
        u32::from_str_radix(bin, 2)
    } else {
        s.parse()
    };
    parsed.with_context(|| format!("bad layer state '{}'", s))
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Settings::load_default().context("loading default settings"),
    }
}

fn format_leds(set: Indicators) -> String {
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

fn print_step(out: &mut impl Write, label: &str, step: &Step, expand: bool) -> io::Result<()> {
    match step.action {
        Some(action) => writeln!(out, "{} -> {}", label, action)?,
        None => writeln!(out, "{} (ignored)", label)?,
    }
    let ops = if expand {
        expand_ops(&step.ops)
    } else {
        step.ops.clone()
    };
    for op in &ops {
        writeln!(out, "    {}", format_op(op))?;
    }
    if let Some(set) = step.indicators {
        writeln!(out, "    leds {}", format_leds(set))?;
    }
    Ok(())
}

fn show_layer(out: &mut impl Write, keymap: &Keymap, layer: Layer) -> io::Result<()> {
    writeln!(out, "[{}]", layer)?;
    let width = Keymap::positions()
        .map(|pos| short_token(keymap.action(layer, pos)).len())
        .max()
        .unwrap_or(0)
        .min(16);
    for row in 0..ROWS {
        let cells: Vec<String> = (0..COLS)
            .map(|col| {
                let pos = KeyPos::new(row as u8, col as u8);
                let text = if Keymap::is_populated(pos) {
                    short_token(keymap.action(layer, pos))
                } else {
                    String::new()
                };
                format!("{:width$}", text, width = width)
            })
            .collect();
        let (left, right) = cells.split_at(COLS / 2);
        writeln!(out, "  {}  |  {}", left.join(" "), right.join(" "))?;
    }
    Ok(())
}

fn short_token(action: KeyAction) -> String {
    match action {
        KeyAction::Transparent => "___".to_string(),
        other => {
            let token = other.to_string();
            token.strip_prefix("KC_").map(str::to_string).unwrap_or(token)
        }
    }
}

fn write_default_settings(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::write(path, default_settings_content())
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn simulator(keymap: &Keymap, config: Option<&PathBuf>) -> Result<Simulator> {
    let settings = load_settings(config)?;
    Ok(Simulator::with_host(keymap.clone(), &settings, RecordingHost::new()))
}

fn run(args: Args, keymap: &Keymap, out: &mut impl Write) -> Result<()> {
    match args.command {
        Command::Show { layer } => {
            let layers: Vec<Layer> = match layer {
                Some(layer) => vec![layer],
                None => Layer::ALL.to_vec(),
            };
            for layer in layers {
                show_layer(out, keymap, layer)?;
                writeln!(out)?;
            }
        }
        Command::Check => {
            let issues = keymap.validate();
            if !issues.is_empty() {
                for issue in &issues {
                    writeln!(out, "{}", issue)?;
                }
                bail!("{} issue(s) in the layout table", issues.len());
            }
            writeln!(
                out,
                "Layout table is valid: {} layers x {} keys",
                Layer::ALL.len(),
                Keymap::positions().count()
            )?;
        }
        Command::Find { token } => {
            let action: KeyAction = token
                .parse()
                .with_context(|| format!("parsing '{}'", token))?;
            let found = keymap.find(action);
            if found.is_empty() {
                writeln!(out, "{} is not bound", action)?;
            }
            for (layer, pos) in found {
                writeln!(out, "{:<7} {}", layer.to_string(), pos)?;
            }
        }
        Command::Tap {
            layer,
            row,
            col,
            expand,
        } => {
            let pos = KeyPos::checked(row, col)?;
            let mut sim = simulator(keymap, args.config.as_ref())?;
            if layer != Layer::Base {
                sim.toggle_layer(layer);
            }
            let step = sim.tap(pos)?;
            print_step(out, &format!("tap {}", pos), &step, expand)?;
            writeln!(out, "leds {}", format_leds(sim.indicators()))?;
        }
        Command::Press { events, expand } => {
            let mut sim = simulator(keymap, args.config.as_ref())?;
            for event in &events {
                let step = if let Some(rest) = event.strip_prefix('+') {
                    sim.process(KeyRecord::new(parse_pos(rest)?, KeyEvent::Press))?
                } else if let Some(rest) = event.strip_prefix('-') {
                    sim.process(KeyRecord::new(parse_pos(rest)?, KeyEvent::Release))?
                } else {
                    sim.tap(parse_pos(event)?)?
                };
                print_step(out, event, &step, expand)?;
            }
            let leftover = sim.release_all()?;
            if !leftover.ops.is_empty() || leftover.indicators.is_some() {
                print_step(out, "release all", &leftover, expand)?;
            }
            writeln!(out, "leds {}", format_leds(sim.indicators()))?;
        }
        Command::Leds { state } => {
            let bits = parse_state(&state)?;
            let layer = Layer::from_state(bits);
            writeln!(out, "{} {}", layer, format_leds(indicators_for(layer)))?;
        }
        Command::Init { force } => {
            let path = match args.config {
                Some(path) => path,
                None => Settings::default_path().context("no config directory on this system")?,
            };
            write_default_settings(&path, force)?;
            writeln!(out, "Wrote {}", path.display())?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let stdout = io::stdout();
    run(args, &KEYMAP, &mut stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["doxmap", "--config", "/tmp/s.toml", "show", "navi"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/s.toml")));
        assert!(!args.verbose);
        assert!(matches!(
            args.command,
            Command::Show {
                layer: Some(Layer::Navigation)
            }
        ));
    }

    #[test]
    fn test_press_sequence_args() {
        let args = Args::parse_from(["doxmap", "-v", "press", "+k2A", "k38", "-k2A"]);
        assert!(args.verbose);
        match args.command {
            Command::Press { events, expand } => {
                assert_eq!(events, vec!["+k2A", "k38", "-k2A"]);
                assert!(!expand);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_pos() {
        assert_eq!(parse_pos("k2A").unwrap(), KeyPos::new(2, 10));
        assert_eq!(parse_pos("K5c").unwrap(), KeyPos::new(5, 12));
        assert_eq!(parse_pos("3, 8").unwrap(), KeyPos::new(3, 8));
        assert!(parse_pos("k6A").is_err());
        assert!(parse_pos("kZZ").is_err());
        assert!(parse_pos("12").is_err());
    }

    #[test]
    fn test_parse_layer_and_state() {
        assert_eq!(parse_layer("4"), Ok(Layer::Qwerty));
        assert_eq!(parse_layer("symb"), Ok(Layer::Symbols));
        assert!(parse_layer("9").is_err());
        assert_eq!(parse_state("0b10001").unwrap(), 17);
        assert_eq!(parse_state("0x8").unwrap(), 8);
        assert!(parse_state("x").is_err());
    }

    #[test]
    fn test_format_leds() {
        assert_eq!(format_leds(Indicators::empty()), "none");
        assert_eq!(format_leds(indicators_for(Layer::Qwerty)), "LED1 LED3");
    }

    fn run_to_string(argv: &[&str], keymap: &Keymap) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = run(Args::parse_from(argv), keymap, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("doxmap-cli-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_check_passes_on_stock_table() {
        let (result, out) = run_to_string(&["doxmap", "check"], &KEYMAP);
        assert!(result.is_ok());
        assert_eq!(out, "Layout table is valid: 5 layers x 76 keys\n");
    }

    #[test]
    fn test_check_fails_on_broken_table() {
        let mut layers = Layer::ALL.map(|layer| *KEYMAP.layer(layer));
        layers[Layer::Base.index()][0][0] = KeyAction::Transparent;
        let broken = Keymap::new(layers);

        let (result, out) = run_to_string(&["doxmap", "check"], &broken);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "1 issue(s) in the layout table");
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("k00"));
    }

    #[test]
    fn test_find_lists_positions() {
        let (result, out) = run_to_string(&["doxmap", "find", "LT(NAVI,KC_K)"], &KEYMAP);
        assert!(result.is_ok());
        assert_eq!(out, "BASE    k2A\n");

        let (result, out) = run_to_string(&["doxmap", "find", "M(1)"], &KEYMAP);
        assert!(result.is_ok());
        assert_eq!(out, "M(1) is not bound\n");

        let (result, _) = run_to_string(&["doxmap", "find", "LT(NOPE,KC_K)"], &KEYMAP);
        assert!(result.is_err());
    }

    #[test]
    fn test_leds_for_masks() {
        let (_, out) = run_to_string(&["doxmap", "leds", "0b10001"], &KEYMAP);
        assert_eq!(out, "QWERTY LED1 LED3\n");
        let (_, out) = run_to_string(&["doxmap", "leds", "0"], &KEYMAP);
        assert_eq!(out, "BASE none\n");
        let (result, _) = run_to_string(&["doxmap", "leds", "lots"], &KEYMAP);
        assert!(result.is_err());
    }

    #[test]
    fn test_init_writes_loadable_settings() {
        let path = scratch_path("settings.toml");
        let config = path.to_str().unwrap();
        let (result, out) = run_to_string(&["doxmap", "-c", config, "init"], &KEYMAP);
        assert!(result.is_ok());
        assert!(out.starts_with("Wrote "));
        assert_eq!(Settings::from_file(&path).unwrap().keymap(), "anydoby");

        let (result, _) = run_to_string(&["doxmap", "-c", config, "init"], &KEYMAP);
        assert!(result.is_err());
        let (result, _) = run_to_string(&["doxmap", "-c", config, "init", "--force"], &KEYMAP);
        assert!(result.is_ok());

        fs::remove_file(&path).unwrap();
    }
}
