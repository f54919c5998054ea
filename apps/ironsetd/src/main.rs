use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use ironset_engine::{EngineBuilder, EngineConfig};
use ironset_protocol::TrainingProgram;
use ironset_store::JsonFileStore;
use teloxide::Bot;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod health;
mod telegram;

use crate::telegram::TelegramNotifier;

#[derive(Debug, Parser)]
#[command(name = "ironsetd")]
#[command(about = "Conversational workout tracker daemon")]
struct Cli {
    /// Telegram bot token.
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[arg(long, env = "IRONSET_DATA_FILE", default_value = "user_data.json")]
    data_file: PathBuf,
    /// JSON training program replacing the built-in Day A / Day B program.
    #[arg(long, env = "IRONSET_PROGRAM")]
    program: Option<PathBuf>,
    #[arg(long, default_value_t = 90)]
    rest_timer_secs: u64,
    /// Do not ask for body weight after a finished workout.
    #[arg(long)]
    no_weigh_in: bool,
    /// Serve `/` and `/healthz` on this address.
    #[arg(long, env = "HEALTH_LISTEN")]
    health_listen: Option<SocketAddr>,
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            rest_timer: Duration::from_secs(self.rest_timer_secs),
            weigh_in_after_finish: !self.no_weigh_in,
            ..EngineConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let Some(token) = cli.token.clone().filter(|token| !token.trim().is_empty()) else {
        bail!("BOT_TOKEN is not set; pass --token or export BOT_TOKEN");
    };

    let program = load_program(cli.program.as_deref()).await?;
    let bot = Bot::new(token);

    let store = Arc::new(JsonFileStore::new(&cli.data_file));
    let notifier = Arc::new(TelegramNotifier::new(bot.clone()));
    let engine = EngineBuilder::new(store, notifier)
        .config(cli.engine_config())
        .program(program)
        .build()?;
    info!(
        data_file = %cli.data_file.display(),
        days = engine.program().days.len(),
        rest_timer_secs = cli.rest_timer_secs,
        "engine ready"
    );

    let health_task = cli
        .health_listen
        .map(|listen| tokio::spawn(health::serve(listen)));

    let mut dispatcher = telegram::dispatcher(bot, engine);
    let shutdown = dispatcher.shutdown_token();
    let signal_task = tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown requested");
        match shutdown.shutdown() {
            Ok(stopped) => stopped.await,
            Err(error) => warn!(%error, "dispatcher was not running"),
        }
    });

    info!("ironsetd polling for updates");
    dispatcher.dispatch().await;
    info!("dispatcher stopped");

    signal_task.abort();
    if let Some(task) = health_task {
        task.abort();
        match task.await {
            Ok(Err(error)) => warn!(error = ?error, "health server failed"),
            Ok(Ok(())) => {}
            Err(error) if error.is_cancelled() => {}
            Err(error) => warn!(%error, "health task stopped"),
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

async fn load_program(path: Option<&Path>) -> Result<TrainingProgram> {
    let Some(path) = path else {
        return Ok(TrainingProgram::default());
    };
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read training program {}", path.display()))?;
    let program = TrainingProgram::from_json_str(&raw)
        .with_context(|| format!("invalid training program {}", path.display()))?;
    info!(path = %path.display(), days = program.days.len(), "training program loaded");
    Ok(program)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    {
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(error) => {
                    tracing::error!(%error, "failed to install SIGTERM handler");
                }
            }
        };

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_map_onto_engine_config() {
        let cli = Cli::try_parse_from([
            "ironsetd",
            "--token",
            "123:abc",
            "--rest-timer-secs",
            "45",
            "--no-weigh-in",
        ])
        .unwrap();
        let config = cli.engine_config();
        assert_eq!(config.rest_timer, Duration::from_secs(45));
        assert!(!config.weigh_in_after_finish);
        assert_eq!(cli.token.as_deref(), Some("123:abc"));
    }

    #[tokio::test]
    async fn missing_program_path_uses_builtin_days() {
        let program = load_program(None).await.unwrap();
        assert_eq!(program.labels().collect::<Vec<_>>(), vec!["Day A", "Day B"]);
    }

    #[tokio::test]
    async fn unreadable_program_is_an_error() {
        let path = std::env::temp_dir().join("ironsetd-missing-program.json");
        assert!(load_program(Some(&path)).await.is_err());
    }
}
