use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MarketConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());
    let config = load_config_from_str(&content)?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Parse configuration from YAML text, after environment substitution.
pub fn load_config_from_str(content: &str) -> Result<MarketConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    serde_yaml::from_str(&substituted).with_context(|| "Failed to parse YAML configuration")
}

#[instrument]
pub fn generate_default_config() -> MarketConfig {
    MarketConfig {
        service: ServiceConfig {
            name: "Musical Market".to_string(),
            description: "Musical instrument inventory service".to_string(),
            version: "1.0.0".to_string(),
        },
        server: HttpServerConfig::default(),
        storage: StorageConfig {
            storage_type: "memory".to_string(),
            postgres: Some(PostgresConfig {
                host: "${DB_HOST:-localhost}".to_string(),
                port: default_postgres_port(),
                database: "musical_market".to_string(),
                user: "${DB_USER}".to_string(),
                password: "${DB_PASSWORD}".to_string(),
                ssl_mode: "prefer".to_string(),
                max_connections: default_max_connections(),
                connection_timeout_seconds: default_connection_timeout(),
            }),
            run_migrations: true,
        },
        inventory: InventoryConfig::default(),
        logging: LoggingConfig::default(),
        metrics: Some(MetricsConfig::default()),
    }
}

#[instrument(skip(config))]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &MarketConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml).with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}
