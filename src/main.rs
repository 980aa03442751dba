use anyhow::Result;

mod app;
mod auth;
mod config;
mod gemini;
mod handler;
mod jurisdiction;
mod logging;
mod session;
mod tui;
mod ui;

use app::App;
use config::Config;
use gemini::{GeminiClient, DEFAULT_MODEL};
use session::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init()?;

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!("Could not read config, using defaults: {err:#}");
        Config::default()
    });

    // Env var wins over the config file
    let api_key = std::env::var("GEMINI_API_KEY")
        .ok()
        .or_else(|| config.api_key.clone())
        .unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("No Gemini API key configured; every analysis will fail");
    }

    let model = config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let gemini = GeminiClient::new(&api_key, &model);
    let session = SessionStore::new()?;
    let mut app = App::new(gemini, session);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let run_result = run(&mut terminal, &mut app).await;

    tui::restore()?;

    // The session ends with the process; the marker only survives a crash.
    app.session.clear();

    run_result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = tui::EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }

    Ok(())
}
