// TUI event loop and terminal management
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use jobscout_core::JobCatalog;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, warn};

use crate::{App, AppEvent, Command};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

pub async fn run_tui(app: App, catalog: Arc<JobCatalog>, tick_rate: Duration) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app, catalog, tick_rate).await;

    // Restore terminal even when the loop bailed out
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Tui,
    mut app: App,
    catalog: Arc<JobCatalog>,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let startup = app.start();
    dispatch(&mut app, startup, &catalog, &tx);

    loop {
        terminal.draw(|f| crate::ui::render(f, &app))?;

        // Fetch results that landed since the last frame
        while let Ok(event) = rx.try_recv() {
            app.apply(event);
        }

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.status_message = None;
                    let commands = app.handle_key(key);
                    dispatch(&mut app, commands, &catalog, &tx);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Run commands; fetches become tasks that report back through `tx`
fn dispatch(
    app: &mut App,
    commands: Vec<Command>,
    catalog: &Arc<JobCatalog>,
    tx: &UnboundedSender<AppEvent>,
) {
    for command in commands {
        match command {
            Command::LoadJobs { filters, scope } => {
                let catalog = Arc::clone(catalog);
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(result) = scope.run(catalog.jobs(&filters)).await {
                        let _ = tx.send(AppEvent::JobsLoaded {
                            generation: scope.generation(),
                            result,
                        });
                    } else {
                        debug!("Jobs fetch cancelled");
                    }
                });
            }
            Command::LoadCategories => {
                let catalog = Arc::clone(catalog);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = catalog.categories().await;
                    let _ = tx.send(AppEvent::CategoriesLoaded(result));
                });
            }
            Command::LoadJob { id, scope } => {
                let catalog = Arc::clone(catalog);
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(result) = scope.run(catalog.job(id)).await {
                        let _ = tx.send(AppEvent::JobLoaded {
                            generation: scope.generation(),
                            result,
                        });
                    } else {
                        debug!("Fetch for job {} cancelled", id);
                    }
                });
            }
            Command::LoadFavorites { ids, scope } => {
                let catalog = Arc::clone(catalog);
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(result) = scope.run(catalog.favorite_jobs(&ids)).await {
                        let _ = tx.send(AppEvent::FavoritesLoaded {
                            generation: scope.generation(),
                            result,
                        });
                    } else {
                        debug!("Favorites fetch cancelled");
                    }
                });
            }
            Command::OpenUrl(url) => {
                if let Err(e) = open::that(&url) {
                    warn!("Failed to open {}: {}", url, e);
                    app.status_message = Some(format!("Failed to open browser: {}", e));
                }
            }
        }
    }
}
