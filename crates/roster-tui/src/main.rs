mod actions;
mod app;
mod ui;

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use roster_client::ApiClient;

use crate::actions::execute_action;
use crate::app::App;

#[derive(Debug, Parser)]
#[command(name = "roster-tui", version, about = "roster TUI")]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = roster_config::load(args.config).with_context(|| "load config")?;
    let base = match args.api_url {
        Some(raw) => roster_config::parse_api_url(&raw)?,
        None => config.client.api_url,
    };
    let client = ApiClient::new(base).with_context(|| "build http client")?;

    let mut app = App::new(client.base_url().as_str());
    let mut terminal = TerminalGuard::new()?;
    run_app(&mut terminal, &client, &mut app)
}

fn run_app(terminal: &mut TerminalGuard, client: &ApiClient, app: &mut App) -> Result<()> {
    let poll_rate = Duration::from_millis(200);

    loop {
        terminal.terminal_mut().draw(|frame| ui::draw(frame, app))?;

        if app.should_quit {
            break;
        }

        // One queued action per frame.
        if let Some(action) = app.next_action() {
            let target = action.failure_target();
            if let Err(err) = execute_action(app, client, action) {
                app.report_failure(target, err.to_string());
            }
            continue;
        }

        if event::poll(poll_rate)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
    }

    Ok(())
}

struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore_terminal();
            original_hook(info);
        }));

        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
