use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "market")]
#[command(about = "Musical Market - musical instrument inventory service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the inventory HTTP service
    Start {
        /// Path to the configuration file
        #[arg(short, long, default_value = "config/market.yaml", env = "MARKET_CONFIG")]
        config: PathBuf,

        /// Override HTTP port
        #[arg(long)]
        http: Option<u16>,

        /// Override the configured storage backend
        #[arg(long, value_enum)]
        storage: Option<StorageBackend>,
    },

    /// Validate configuration without starting the service
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "config/market.yaml", env = "MARKET_CONFIG")]
        config: PathBuf,
    },

    /// Write a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "market.yaml")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local store, emptied on restart
    Memory,

    /// PostgreSQL, configured under `storage.postgres`
    Postgres,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Postgres => "postgres",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_with_overrides() {
        let cli = Cli::try_parse_from([
            "market", "start", "--config", "m.yaml", "--http", "9000", "--storage", "postgres",
        ])
        .unwrap();

        match cli.command {
            Commands::Start {
                config,
                http,
                storage,
            } => {
                assert_eq!(config, PathBuf::from("m.yaml"));
                assert_eq!(http, Some(9000));
                assert_eq!(storage, Some(StorageBackend::Postgres));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_init_default_output() {
        let cli = Cli::try_parse_from(["market", "init"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Init { output } if output == PathBuf::from("market.yaml")
        ));
    }

    #[test]
    fn test_rejects_unknown_storage() {
        assert!(Cli::try_parse_from(["market", "start", "--storage", "redis"]).is_err());
    }
}
