//! TUI module using ratatui.
//!
//! Elm-style split: `app` holds state and a pure `update`, `view` renders it,
//! `input` maps terminal events to actions. This module owns the terminal and
//! the event loop that runs requests in the background.

pub mod app;
pub mod input;
pub mod theme;
pub mod view;

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::backend::Backend;
use crate::config::Config;
use app::{App, Completion, Effect};
use input::Action;
use theme::Theme;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Launch the TUI and block until the user quits.
pub async fn run(config: &Config, backend: Backend, initial_file: Option<PathBuf>) -> anyhow::Result<()> {
    let theme = Theme::named(&config.ui.theme);
    let mut app = App::new(config.backend.show_error_detail);
    if let Some(path) = initial_file {
        app.preselect(&path);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    // Restore the terminal before the panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
        original_hook(panic_info);
    }));

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    info!(base_url = %config.backend.base_url, "tui started");

    let result = event_loop(&mut terminal, &mut app, &theme, &backend).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)?;
    terminal.show_cursor()?;
    info!("tui stopped");

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    theme: &Theme,
    backend: &Backend,
) -> anyhow::Result<()> {
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel::<Completion>();

    loop {
        terminal.draw(|f| view::render(f, app, theme))?;

        tokio::select! {
            Some(completion) = completion_rx.recv() => {
                app.complete(completion);
                while let Ok(completion) = completion_rx.try_recv() {
                    app.complete(completion);
                }
            }
            polled = async { poll_terminal(TICK_RATE) } => {
                if let Some(event) = polled? {
                    let action = input::map_event(&event, app.tab);
                    if let Some(effect) = app.update(action) {
                        spawn_effect(effect, backend, &completion_tx);
                    }
                }
            }
        }

        app.update(Action::Tick);

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Wait up to `timeout` for one terminal event.
fn poll_terminal(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Run an effect on its own task. Requests are never cancelled; if the UI has
/// already quit, the completion is dropped.
fn spawn_effect(effect: Effect, backend: &Backend, tx: &mpsc::UnboundedSender<Completion>) {
    let backend = backend.clone();
    let tx = tx.clone();
    debug!(?effect, "spawning request");
    tokio::spawn(async move {
        let completion = effect.run(&backend).await;
        let _ = tx.send(completion);
    });
}
