mod app;
mod config;
mod gacha;
mod media;
mod notify;
mod persist;
mod ui;

use anyhow::Result;
use app::{App, FocusTarget};
use clap::Parser;
use config::{Config, OFFLINE_POOL_SIZE};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use gacha::engine::{GachaEngine, View};
use gacha::session::Session;
use media::{MediaFetcher, OfflineFetcher, TenorFetcher};
use notify::MessageLog;
use persist::{RonFileStore, SnapshotStore};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config.log_file)?;

    let messages = Arc::new(MessageLog::new());
    let store = RonFileStore::new(&config.save_file);
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let session = match store.load() {
        Ok(Some(snapshot)) => {
            log::info!("loaded snapshot from {}", config.save_file.display());
            messages.push("Loaded save state.");
            Session::from_snapshot(snapshot, rng)
        }
        Ok(None) => {
            messages.push("Welcome! Press P to pull your first GIF.");
            Session::fresh(rng)
        }
        Err(err) => {
            log::warn!("could not read {}: {err}", config.save_file.display());
            messages.push("Save file unreadable; starting fresh.");
            Session::fresh(rng)
        }
    };

    let fetcher: Arc<dyn MediaFetcher> = if config.offline {
        Arc::new(OfflineFetcher::new(OFFLINE_POOL_SIZE, config.seed))
    } else {
        Arc::new(TenorFetcher::new(config.tenor_key.clone()))
    };
    let engine = Arc::new(GachaEngine::new(
        session,
        fetcher,
        Box::new(store),
        messages.clone(),
    ));

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &engine, &messages).await;
    restore_terminal(&mut terminal)?;

    engine.persist();
    result
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    engine: &Arc<GachaEngine>,
    messages: &Arc<MessageLog>,
) -> Result<()> {
    let mut app = App::new();

    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    task::spawn(async move {
        loop {
            match task::spawn_blocking(crossterm::event::read).await {
                Ok(Ok(event)) => {
                    if input_tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(Err(_)) => break,
                Err(_) => break,
            }
        }
    });

    let tick_rate = Duration::from_millis(100);
    loop {
        let view = engine.view();
        app.clamp_selections(
            view.snapshot.history.len(),
            view.snapshot.collection.len(),
            view.snapshot.shop_items.len(),
        );
        let log_lines = messages.messages();
        terminal.draw(|f| ui::render(f, &app, &view, &log_lines))?;

        tokio::select! {
            Some(event) = input_rx.recv() => {
                if handle_event(event, &mut app, engine, messages, &view) {
                    break;
                }
            }
            _ = tokio::time::sleep(tick_rate) => {}
        }
    }

    Ok(())
}

fn handle_event(
    event: Event,
    app: &mut App,
    engine: &Arc<GachaEngine>,
    messages: &Arc<MessageLog>,
    view: &View,
) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            handle_key_event(key, app, engine, messages, view)
        }
        _ => false,
    }
}

fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    engine: &Arc<GachaEngine>,
    messages: &Arc<MessageLog>,
    view: &View,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if app.editing_tag {
        handle_tag_key(key, app);
        return false;
    }
    if app.confirm_reset {
        app.confirm_reset = false;
        if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            messages.arm_confirmation();
        }
        if engine.reset_all() {
            *app = App::new();
        }
        return false;
    }
    if app.shop_open {
        handle_shop_key(key, app, engine, view);
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Enter => spawn_pull(engine, app),
        KeyCode::Char('/') => app.editing_tag = true,
        KeyCode::Char('s') | KeyCode::Char('S') => app.toggle_shop(),
        KeyCode::Char('o') | KeyCode::Char('O') => app.toggle_odds(),
        KeyCode::Char('d') | KeyCode::Char('D') => app.toggle_details(),
        KeyCode::Char('t') | KeyCode::Char('T') => {
            engine.toggle_dark_mode();
        }
        KeyCode::Char('c') | KeyCode::Char('C') => {
            engine.clear_history();
            messages.push("History cleared. Your collection is untouched.");
        }
        KeyCode::Char('x') | KeyCode::Char('X') => {
            app.confirm_reset = true;
            messages.push("Reset all progress? Press Y to confirm, any other key cancels.");
        }
        KeyCode::Char('f') | KeyCode::Char('F') => toggle_favorite(app, engine, view),
        KeyCode::Tab | KeyCode::BackTab => app.next_focus(),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
            app.move_selection(focused_len(app, view), -1)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            app.move_selection(focused_len(app, view), 1)
        }
        _ => {}
    }
    false
}

fn focused_len(app: &App, view: &View) -> usize {
    match app.focus() {
        FocusTarget::History => view.snapshot.history.len(),
        FocusTarget::Collection => view.snapshot.collection.len(),
    }
}

fn spawn_pull(engine: &Arc<GachaEngine>, app: &App) {
    let engine = Arc::clone(engine);
    let tag = app.tag_filter.clone();
    task::spawn(async move {
        if let Err(err) = engine.pull(&tag).await {
            log::info!("pull ended without records: {err}");
        }
    });
}

fn toggle_favorite(app: &App, engine: &GachaEngine, view: &View) {
    let selected = match app.focus() {
        FocusTarget::History => view.snapshot.history.get(app.selected_history),
        FocusTarget::Collection => view.snapshot.collection.get(app.selected_collection),
    };
    let Some(record) = selected.or(view.current_pull.as_ref()) else {
        return;
    };
    let collected = view
        .snapshot
        .collection
        .iter()
        .any(|item| item.id == record.id);
    if collected {
        engine.unfavorite(record.id);
    } else if !engine.favorite(record.id) {
        log::debug!("{} already collected", record.identity);
    }
}

fn handle_tag_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.editing_tag = false,
        KeyCode::Backspace => {
            app.tag_filter.pop();
        }
        KeyCode::Char(c) => app.tag_filter.push(c),
        _ => {}
    }
}

fn handle_shop_key(key: KeyEvent, app: &mut App, engine: &GachaEngine, view: &View) {
    let len = view.snapshot.shop_items.len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('S') => app.toggle_shop(),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
            if app.selected_shop_item > 0 {
                app.selected_shop_item -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            if app.selected_shop_item + 1 < len {
                app.selected_shop_item += 1;
            }
        }
        KeyCode::Enter => {
            if let Some(id) = view.snapshot.shop_items.get(app.selected_shop_item) {
                match engine.purchase(*id) {
                    Ok(receipt) => log::debug!("bought {}", receipt.item.name),
                    Err(err) => log::debug!("purchase of item {id} declined: {err}"),
                }
            }
        }
        _ => {}
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
