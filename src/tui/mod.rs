//! Terminal UI for the mind-reading game.

mod app;
mod input;
mod ui;

pub use app::{App, Control, Flash};
pub use input::{Action, action_for};
pub use ui::{GridLayout, grid_lines};

use crate::config::AppConfig;
use crate::telemetry::sink_for;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tracing::{error, info, instrument};

/// Redraw interval; keeps the answer flash fading on time.
const TICK: Duration = Duration::from_millis(50);

/// Runs the interactive game until the player quits.
#[instrument(skip(config))]
pub async fn run_tui(config: AppConfig) -> Result<()> {
    let modes = config.game_modes()?;
    let sink = sink_for(config.analytics().endpoint().as_deref());
    let mut app = App::new(modes, *config.default_mode(), config.flash_duration(), sink)?;

    info!("Starting terminal UI");

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!("Terminal UI closed");
    res
}

/// Draw, poll, dispatch until [`Control::Quit`].
fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    <B as Backend>::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()?
            && let Some(action) = action_for(key)
            && app.handle(action) == Control::Quit
        {
            return Ok(());
        }
    }
}
