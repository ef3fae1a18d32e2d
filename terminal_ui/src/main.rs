use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use log::{error, info};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

mod app;
mod config;
mod controller;
mod error;
mod http_store;
mod store;
mod ui;
mod view;

use app::{App, Intent};
use config::Args;
use controller::TaskViewController;
use http_store::HttpTaskStore;
use store::TaskStore;

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

async fn run<B: Backend, S: TaskStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> anyhow::Result<()> {
    let events = EventStream::new();
    tokio::pin!(events);

    app.busy = true;
    terminal.draw(|f| ui::draw(f, app))?;
    app.dispatch_watching(Intent::Refresh, &mut events)
        .await
        .context("reading terminal input")?;
    app.busy = false;

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;

        let Some(event) = events.next().await else {
            break;
        };
        let Event::Key(key) = event.context("reading terminal input")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Some(intent) = app.handle_key(key) {
            app.busy = true;
            terminal.draw(|f| ui::draw(f, app))?;
            app.dispatch_watching(intent, &mut events)
                .await
                .context("reading terminal input")?;
            app.busy = false;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let store = HttpTaskStore::new(args.store_url.clone()).context("setting up task store client")?;
    let mut app = App::new(TaskViewController::new(store), args.sort_keys());
    info!("tasklist started against {}", args.store_url);

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = restore_terminal();
        default_hook(panic);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app).await;

    restore_terminal()?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!("tasklist exited with error: {err:#}");
    }
    result
}
