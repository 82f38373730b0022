mod actions;
mod app;
mod input;
mod view;

use anyhow::{Context, Result};
use app::{App, DEFAULT_SEED};
use cardtable_core::TableConfig;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fs;
use std::io::{self, stdout, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const TICK_RATE: Duration = Duration::from_millis(30);

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub seed: Option<u64>,
    pub config_path: Option<PathBuf>,
    /// Sort-mode token for a spread dealt right after launch.
    pub opening_spread: Option<String>,
    /// Rank token for a row spawned right after launch.
    pub opening_row: Option<String>,
}

pub fn run(options: LaunchOptions) -> Result<()> {
    let config = match options.config_path.as_deref() {
        Some(path) => load_config(path)?,
        None => TableConfig::default(),
    };
    let seed = options.seed.unwrap_or(DEFAULT_SEED);
    let mut app = App::new(config, seed);
    if let Some(token) = options.opening_spread.as_deref() {
        app.open_with_spread(token);
    }
    if let Some(token) = options.opening_row.as_deref() {
        app.open_with_row(token);
    }

    ensure_interactive_terminal()?;
    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    stdout
        .execute(EnableMouseCapture)
        .context("enable mouse capture")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = parse_options(args);
    run(options)
}

fn parse_options(args: &[String]) -> LaunchOptions {
    let mut options = LaunchOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    options.seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--config" => {
                if let Some(value) = args.get(idx + 1) {
                    options.config_path = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--spread" => {
                if let Some(value) = args.get(idx + 1) {
                    options.opening_spread = Some(value.clone());
                    idx += 1;
                }
            }
            "--row" => {
                if let Some(value) = args.get(idx + 1) {
                    options.opening_row = Some(value.clone());
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    options
}

fn load_config(path: &Path) -> Result<TableConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read table config from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parse table config from {}", path.display()))
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last_tick = Instant::now();
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                CEvent::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        actions::dispatch(app, input::map_key(key));
                    }
                }
                CEvent::Mouse(mouse) => {
                    if let Some(pointer) = input::map_mouse(mouse) {
                        app.pointer(pointer);
                    }
                }
                CEvent::FocusLost => app.pointer_left(),
                _ => {}
            }
        }
        if last_tick.elapsed() >= TICK_RATE {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "cardtable-cui requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}
