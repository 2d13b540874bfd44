use std::path::PathBuf;

use clap::{Parser, Subcommand};

use edgemicro_config::config::{read_config, ConfigError, Validator};
use edgemicro_config::kv::{ConfigSnapshot, KeyValueStore, RedisClient, RedisSettings};
use edgemicro_config::observability::logging::init_tracing;

#[derive(Parser)]
#[command(name = "kv-cli")]
#[command(about = "Read and write gateway values in Redis", long_about = None)]
struct Cli {
    /// Gateway config file to take redisHost/redisPort/redisDb/redisPassword from.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Redis host [default: 127.0.0.1]
    #[arg(long)]
    host: Option<String>,

    /// Redis port [default: 6379]
    #[arg(long)]
    port: Option<u16>,

    /// Redis database index [default: 0]
    #[arg(long)]
    db: Option<u32>,

    #[arg(long)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value stored under a key
    Get { key: String },
    /// Store a value under a key
    Set { key: String, value: String },
    /// Validate a config file and save it as a snapshot
    Push {
        key: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Load and validate a stored config snapshot
    Pull { key: String },
}

/// Explicit flags override the config file, which overrides the defaults.
fn redis_settings(cli: &Cli) -> Result<RedisSettings, ConfigError> {
    let mut settings = match &cli.config {
        Some(path) => RedisSettings::from_config(&read_config(path)?),
        None => RedisSettings::default(),
    };
    if let Some(host) = &cli.host {
        settings.host = host.clone();
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }
    if let Some(db) = cli.db {
        settings.db = db;
    }
    if let Some(password) = &cli.password {
        settings.password = Some(password.clone());
    }
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing("edgemicro_config=warn");

    let settings = redis_settings(&cli)?;
    let client = RedisClient::connect(settings).await?;

    match cli.command {
        Commands::Get { key } => match client.read(&key).await? {
            Some(value) => println!("{}", value),
            None => eprintln!("(not found)"),
        },
        Commands::Set { key, value } => {
            client.write(&key, &value).await?;
            println!("OK");
        }
        Commands::Push { key, file } => {
            let config = read_config(&file)?;
            ConfigSnapshot::new(client, key, Validator::from_env()).save(&config).await?;
            println!("OK");
        }
        Commands::Pull { key } => {
            let snapshot = ConfigSnapshot::new(client, key, Validator::from_env());
            match snapshot.load().await? {
                Some(config) => println!("{}", serde_json::to_string_pretty(&config)?),
                None => eprintln!("(not found)"),
            }
        }
    }

    Ok(())
}
