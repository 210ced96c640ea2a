mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{DEFAULT_HOME, ServeArgs, ServeConfig};
use mk_core::{MockService, Mocker};
use mk_fs::FileStore;
use mk_serve::shutdown::{self, ShutdownTrigger};
use mk_serve::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mk", version, about = "Mock HTTP response server")]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Keep only the most recent mocks and exit
    Clean {
        #[arg(long, default_value = DEFAULT_HOME)]
        home: PathBuf,
        #[arg(long)]
        limit: i64,
    },
    /// Print the OpenAPI document
    Openapi,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Serve(args) => serve(ServeConfig::resolve(args)?).await,
        Command::Clean { home, limit } => {
            let store = FileStore::open(&home)
                .with_context(|| format!("cannot open {}", home.display()))?;
            let removed = MockService::new(store).clean(limit)?;
            println!("{removed}");
            Ok(())
        }
        Command::Openapi => {
            println!("{}", mk_serve::openapi::generate_spec());
            Ok(())
        }
    }
}

fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

async fn serve(config: ServeConfig) -> Result<()> {
    let store = FileStore::open(&config.home)
        .with_context(|| format!("cannot open {}", config.home.display()))?;
    info!(home = %config.home.display(), "using mock directory");
    let mocker: Arc<dyn Mocker> = Arc::new(MockService::new(store));

    let (trigger, shutdown) = shutdown::channel();
    tokio::spawn(trigger_on_signal(trigger));

    if config.max_records > 0 {
        info!(
            max_records = config.max_records,
            interval = ?config.clean_interval,
            "starting cleaner"
        );
        tokio::spawn(mk_serve::cleaner::run(
            mocker.clone(),
            config.max_records,
            config.clean_interval,
            shutdown.clone(),
        ));
    }

    let state = AppState::new(mocker, config.max_delay, shutdown);
    mk_serve::serve(state, config.addr)
        .await
        .with_context(|| format!("serve error on {}", config.addr))?;
    info!("server stopped");
    Ok(())
}

async fn trigger_on_signal(trigger: ShutdownTrigger) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("shutdown requested");
    trigger.trigger();
}
