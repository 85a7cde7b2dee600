mod action;
mod app;
mod app_state;
mod cli;
mod component;
mod components;
mod focus;
mod theme;
mod widgets;
mod workspace;

use clap::Parser;

use royale_core::{catalog, platform, ChatDispatcher, ChatSession, Config, PodcastChannel};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => run_tui(cli.config).await,
        Some(command) => {
            init_stderr_logging();
            let config = load_config(cli.config.as_deref());
            let channel = catalog::load_catalog(&config.catalog.catalog_toml);
            match command {
                Command::Episodes { json } => print_episodes(&channel, json),
                Command::Ask { text } => ask(&config, &channel, &text.join(" ")).await,
            }
        }
    }
}

async fn run_tui(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("royale.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("royale log: {}", log_path.display());
    tracing::info!("cosmic royale starting…");

    let config = load_config(config_path.as_deref());
    let channel = catalog::load_catalog(&config.catalog.catalog_toml);
    let dispatcher = ChatDispatcher::from_config(&config.chat, &channel);

    let app = app::App::new(channel, &config, dispatcher, log_path);
    app.run().await?;

    tracing::info!("cosmic royale stopped");
    Ok(())
}

fn init_stderr_logging() {
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "warn,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter.as_str())
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> Config {
    let loaded = match path {
        Some(p) => Config::load_from(p),
        None => Config::load(),
    };
    loaded.unwrap_or_else(|e| {
        tracing::warn!("config: {}; using defaults", e);
        Config::default()
    })
}

fn print_episodes(channel: &PodcastChannel, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(channel)?);
        return Ok(());
    }
    println!("{}  ·  hosted by {}", channel.title, channel.author);
    for (i, ep) in channel.episodes.iter().enumerate() {
        let explicit = if ep.explicit { " [E]" } else { "" };
        println!(
            "{:>2}. {}{}\n    {} • {}  ({})",
            i + 1,
            ep.title,
            explicit,
            ep.pub_date,
            ep.duration,
            ep.id
        );
    }
    Ok(())
}

async fn ask(config: &Config, channel: &PodcastChannel, text: &str) -> anyhow::Result<()> {
    let dispatcher = ChatDispatcher::from_config(&config.chat, channel);
    let mut session = ChatSession::default();
    if !dispatcher.send(&mut session, text).await {
        anyhow::bail!("nothing to send");
    }
    if let Some(reply) = session.transcript().last() {
        println!("{}", reply.text);
    }
    Ok(())
}
