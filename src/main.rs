//! Gateway configuration checker.
//!
//! Validates a gateway configuration file before startup and, with
//! `--watch`, keeps revalidating it on every change until interrupted.
//!
//! ```text
//! config file ──▶ loader ──▶ validator ──▶ ConfigStore (Arc<Value>)
//!      ▲                                        ▲
//!      └──── watcher (notify) ── candidates ────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use edgemicro_config::config::watcher::ConfigWatcher;
use edgemicro_config::config::{read_config, ConfigStore, Validator};
use edgemicro_config::observability::logging::init_tracing;

#[derive(Parser)]
#[command(name = "edgemicro-config")]
#[command(about = "Validate gateway configuration before startup", long_about = None)]
struct Cli {
    /// Configuration file (.yaml, .yml, .toml or .json).
    #[arg(short, long)]
    config: PathBuf,

    /// Keep running and revalidate the file whenever it changes.
    #[arg(short, long)]
    watch: bool,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "edgemicro_config=info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let validator = Validator::from_env();
    let config = read_config(&cli.config)?;

    let store = match ConfigStore::new(config.clone(), validator) {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, path = %err.path(), kind = ?err.kind(), "Configuration rejected");
            return Err(err.into());
        }
    };
    tracing::info!(file = ?cli.config, "Configuration is valid");

    if !cli.watch {
        return Ok(());
    }

    let (watcher, mut updates) = ConfigWatcher::new(&cli.config);
    let watcher = watcher.seeded_with(&config);
    // Dropping the notify handle stops the watch.
    let _watch_guard = watcher.run()?;

    loop {
        tokio::select! {
            Some(candidate) = updates.recv() => {
                // Rejections are logged by the store; keep serving the last good config.
                let _ = store.replace(candidate);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping watcher");
                break;
            }
        }
    }

    Ok(())
}
