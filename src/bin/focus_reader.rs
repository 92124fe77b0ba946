//! Focus reader CLI
//!
//! Opens a page in Chrome, walks its focus order with Tab and prints what would
//! be spoken for each focused element.

use anyhow::Context;
use clap::Parser;
use focus_reader::browser::{ChromePage, LaunchOptions, PageSession};
use focus_reader::extract::{TextExtractor, Vocabulary};
use focus_reader::focus::{FocusOutcome, FocusPipeline};
use focus_reader::keyboard::KeyEvent;
use focus_reader::page::{ContentAgent, LogOverlay};
use focus_reader::relay::{HostChannel, HostRelay, LocalBus};
use focus_reader::settings::{JsonFileBackend, SettingsStore};
use focus_reader::speech::{ConsoleEngine, DEFAULT_LANGUAGE, DispatcherConfig, SpeechDispatcher};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "focus-reader")]
#[command(version)]
#[command(about = "Speak the focused element of a web page as focus moves through it", long_about = None)]
struct Cli {
    /// Page to open
    url: String,

    /// Number of Tab presses to walk through
    #[arg(long, short = 'n', default_value = "10")]
    steps: usize,

    /// Speech language, overriding the page's declared one
    #[arg(long, short = 'l', value_name = "TAG")]
    lang: Option<String>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<PathBuf>,

    /// Disable Chrome's sandbox (needed when running as root)
    #[arg(long)]
    no_sandbox: bool,

    /// JSON file holding the settings record (default: in memory)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// JSON vocabulary replacing the built-in Spanish wording
    #[arg(long, value_name = "FILE")]
    vocabulary: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let store = match &cli.settings {
        Some(path) => SettingsStore::new(Arc::new(JsonFileBackend::new(path))),
        None => SettingsStore::in_memory(),
    };

    let extractor = match &cli.vocabulary {
        Some(path) => TextExtractor::with_vocabulary(
            Vocabulary::load(path)
                .await
                .with_context(|| format!("Failed to load vocabulary {}", path.display()))?,
        ),
        None => TextExtractor::new(),
    };

    let engine = Arc::new(ConsoleEngine::new(cli.lang.as_deref().unwrap_or(DEFAULT_LANGUAGE)));

    let host = Arc::new(HostRelay::new(store.clone(), engine.clone()));
    if host.on_installed().await? {
        log::info!("Seeded default settings");
    }
    let fallback = Arc::new(HostChannel::new(Arc::new(LocalBus::new(host))));

    let overlay = Arc::new(LogOverlay);
    let dispatcher = Arc::new(SpeechDispatcher::new(
        engine,
        fallback,
        overlay.clone(),
        DispatcherConfig::default(),
    ));
    let pipeline = FocusPipeline::new(extractor, dispatcher.clone(), true);

    let mut options = LaunchOptions::new()
        .headless(!cli.headed)
        .sandbox(!cli.no_sandbox);
    if let Some(path) = cli.executable_path {
        options = options.chrome_path(path);
    }

    let session = PageSession::launch(options).context("Failed to launch browser")?;
    session.navigate(&cli.url)?;

    let page = Arc::new(ChromePage::new(session.tab().clone()));
    let mut agent = ContentAgent::new(store, pipeline, page, overlay);
    agent.start(&session.snapshot()?).await;

    if let Some(lang) = &cli.lang {
        dispatcher.set_language(lang.as_str());
    }

    let mut spoken = 0;
    for step in 1..=cli.steps {
        session.press_tab()?;
        agent.on_key(&KeyEvent::new("Tab")).await;

        let document = session.snapshot()?;
        let Some(element) = document.focused() else {
            log::info!("Step {}: nothing focused", step);
            continue;
        };

        match agent.on_focus(element, &document).await {
            FocusOutcome::Spoken(_) => spoken += 1,
            FocusOutcome::Suppressed(text) => log::debug!("Step {}: repeat suppressed ({})", step, text),
            FocusOutcome::Disabled => log::info!("Speech is disabled in settings"),
        }
    }

    log::info!("Walked {} steps, spoke {} descriptions", cli.steps, spoken);
    Ok(())
}
