use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

use pickr::config::Config;
use pickr::menu::{Engine, MenuDef, MenuItem, MenuOutcome, MenuState};

#[derive(Parser)]
#[command(name = "pickr", version, about = "Interactive terminal menu engine demo")]
struct Cli {
    #[arg(short, long, help = "Keymap preset (default, vim, gamepad)")]
    keymap: Option<String>,

    #[arg(short, long, help = "Render mode (auto, full, clear, diff)")]
    render: Option<String>,

    #[arg(long, help = "Force compact frames")]
    compact: bool,

    #[arg(long, help = "Disable sound cues")]
    no_sound: bool,

    #[arg(long, help = "Debounce grace interval in milliseconds")]
    grace_ms: Option<u64>,

    #[arg(short, long, help = "Run a data-only menu from a JSON definition file")]
    menu_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut config = Config::load().unwrap_or_default();
    if let Some(keymap) = cli.keymap {
        config.keymap = keymap;
    }
    if let Some(render) = cli.render {
        config.render_mode = render;
    }
    if cli.compact {
        config.compact = true;
    }
    if cli.no_sound {
        config.sound = false;
    }
    if let Some(grace_ms) = cli.grace_ms {
        config.grace_millis = grace_ms;
    }

    let mut engine = Engine::from_config(&config);

    // Raw mode is best-effort: without a terminal the engine already fell
    // back to line-buffered input, and the minimal tier needs no setup.
    let raw = enable_raw_mode().is_ok();
    if raw {
        execute!(io::stdout(), EnterAlternateScreen)?;
    }

    let result = match cli.menu_file.as_deref() {
        Some(path) => run_menu_file(&mut engine, path),
        None => run_showcase(&mut engine),
    };

    if raw {
        execute!(io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
    }

    match result {
        Ok(report) => {
            for line in report {
                println!("{line}");
            }
        }
        Err(err) => eprintln!("Error: {err:?}"),
    }

    Ok(())
}

fn run_menu_file(engine: &mut Engine, path: &Path) -> Result<Vec<String>> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut state = MenuDef::from_json(&json)
        .with_context(|| format!("parsing {}", path.display()))?
        .into_state();
    let outcome = engine.run(&mut state);
    Ok(vec![describe(&outcome, &state)])
}

/// Walks nested menus until the player quits: a shop (values, a disabled
/// row, info-able descriptions), a capped multi-select party picker, and a
/// non-cancellable confirm dialog.
fn run_showcase(engine: &mut Engine) -> Result<Vec<String>> {
    let mut report = Vec::new();
    loop {
        let mut state = village_menu();
        match engine.run(&mut state) {
            MenuOutcome::Value(v) if v == "quit" => break,
            MenuOutcome::Value(v) => report.push(v),
            MenuOutcome::Selected(i) => report.push(format!("selected {}", state.items[i].label)),
            MenuOutcome::SelectedMany(indices) => report.push(format!("selected {indices:?}")),
            MenuOutcome::Cancelled => break,
        }
    }
    Ok(report)
}

fn village_menu() -> MenuState {
    MenuState::new("Village")
        .aux_line("Gold: 120")
        .item(MenuItem::action("Shop", "Buy supplies", |engine| {
            let mut shop = shop_menu();
            match engine.run(&mut shop) {
                MenuOutcome::Selected(i) => {
                    let bought = shop.items[i].value().unwrap_or(shop.items[i].label.as_str());
                    Some(format!("bought {bought}"))
                }
                _ => None,
            }
        }))
        .item(MenuItem::action("Party", "Pick two companions", |engine| {
            let mut picker = party_menu();
            match engine.run(&mut picker) {
                MenuOutcome::SelectedMany(indices) => {
                    let names: Vec<&str> = indices
                        .iter()
                        .map(|&i| picker.items[i].label.as_str())
                        .collect();
                    Some(format!("party: {}", names.join(", ")))
                }
                _ => None,
            }
        }))
        .item(MenuItem::action("Rest", "End the day", |engine| {
            let mut confirm = MenuState::new("Rest until morning?")
                .item(MenuItem::data("Yes", "Save and sleep"))
                .item(MenuItem::data("No", "Keep playing"))
                .cancellable(false);
            match engine.run(&mut confirm) {
                MenuOutcome::Selected(0) => Some("rested".to_string()),
                _ => None,
            }
        }))
        .item(MenuItem::action("Quit", "Leave the village", |_| {
            Some("quit".to_string())
        }))
}

fn shop_menu() -> MenuState {
    MenuState::new("Shop")
        .aux_line("Gold: 120")
        .item(MenuItem::data("Potion", "Restores 50 HP").with_value("potion"))
        .item(MenuItem::data("Ether", "Restores 20 MP").with_value("ether"))
        .item(
            MenuItem::data("Excalibur", "Legendary blade, sold out")
                .with_value("excalibur")
                .disabled(),
        )
}

fn party_menu() -> MenuState {
    MenuState::new("Party")
        .aux_line("Pick two companions")
        .item(MenuItem::data("Knight", "Sturdy front line"))
        .item(MenuItem::data("Mage", "Glass cannon"))
        .item(MenuItem::data("Ranger", "Never misses"))
        .item(MenuItem::data("Bard", "Morale, mostly"))
        .multi(2)
}

fn describe(outcome: &MenuOutcome, state: &MenuState) -> String {
    match outcome {
        MenuOutcome::Selected(i) => match state.items[*i].value() {
            Some(value) => format!("selected {value}"),
            None => format!("selected {}", state.items[*i].label),
        },
        MenuOutcome::SelectedMany(indices) => format!("selected {indices:?}"),
        MenuOutcome::Value(v) => v.clone(),
        MenuOutcome::Cancelled => "cancelled".to_string(),
    }
}

/// Frames own the terminal while a session runs, so logs go to a file and
/// only when asked for (PICKR_LOG acts as the env-filter directive).
fn init_logging() {
    let Some(filter) = std::env::var_os("PICKR_LOG") else {
        return;
    };
    let Ok(file) = std::fs::File::create("pickr.log") else {
        return;
    };
    let filter = tracing_subscriber::EnvFilter::new(filter.to_string_lossy().into_owned());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .try_init();
}
