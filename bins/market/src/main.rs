//! Musical Market CLI and server binary
//!
//! `market start` serves the inventory REST API, `market validate` checks a
//! configuration file and `market init` writes one with all defaults.

use anyhow::{Context, Result};
use cli::{Cli, Commands, StorageBackend};
use config::{
    generate_default_config, load_config, save_config, validate_config, MarketConfig,
    ValidationReport,
};
use inventory::{
    inventory_routes, InMemoryInstrumentStore, InstrumentStore, InventoryLimits, InventoryService,
    PostgresInstrumentStore,
};
use observability::{init_logging, init_logging_with_level, init_metrics, LogFormat};
use server::{
    health_routes, validate_ports_available, HealthState, HttpServer, ServerConfig, ServerExt,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start {
            config,
            http,
            storage,
        } => start_service(config, http, storage).await,
        Commands::Validate { config } => {
            init_logging("market", LogFormat::Pretty)?;
            validate_command(config)
        }
        Commands::Init { output } => {
            init_logging("market", LogFormat::Pretty)?;
            init_command(output)
        }
    }
}

async fn start_service<P: AsRef<Path>>(
    config_path: P,
    http_override: Option<u16>,
    storage_override: Option<StorageBackend>,
) -> Result<()> {
    let mut config = load_config(config_path.as_ref())?;
    if let Some(backend) = storage_override {
        config.storage.storage_type = backend.as_str().to_string();
    }

    let format = LogFormat::parse(&config.logging.format).unwrap_or(LogFormat::Pretty);
    init_logging_with_level("market", format, &config.logging.level)?;

    info!(service = %config.service.name, version = %config.service.version, "Musical Market starting...");

    let report = validate_config(&config);
    log_report(&report);
    if !report.is_valid() {
        anyhow::bail!("Cannot start service due to configuration errors");
    }

    if let Some(metrics) = config.metrics.as_ref().filter(|m| m.enabled) {
        init_metrics(metrics.port).context("Failed to start metrics exporter")?;
    }

    let store = build_store(&config).await?;
    let limits = InventoryLimits::from(&config.inventory);
    debug!(?limits, "Inventory limits");
    let service = Arc::new(InventoryService::new(store, limits));

    let health = HealthState::new(&config.service.name, &config.service.version)
        .with_storage(config.storage.storage_type.to_ascii_lowercase());
    let router = inventory_routes(service).merge(health_routes(Arc::new(health)));

    let mut server_config = ServerConfig::from(&config.server);
    if let Some(port) = http_override {
        debug!(port, "Overriding configured HTTP port");
        server_config = server_config.with_http_port(port);
    }
    validate_ports_available(&server_config).await?;

    info!(
        http_port = server_config.http_port,
        storage = %config.storage.storage_type,
        "Starting inventory service"
    );

    HttpServer::new(server_config, router)
        .run_with_ctrl_c()
        .await?;

    info!("Musical Market stopped");
    Ok(())
}

async fn build_store(config: &MarketConfig) -> Result<Arc<dyn InstrumentStore>> {
    if !config.storage.is_postgres() {
        warn!("Using in-memory storage; instruments are lost on restart");
        return Ok(Arc::new(InMemoryInstrumentStore::new()));
    }

    let pg = config
        .storage
        .postgres
        .as_ref()
        .context("storage.postgres section is required for postgres storage")?;

    let store = PostgresInstrumentStore::from_config(pg)
        .await
        .context("Failed to connect to PostgreSQL")?;

    if config.storage.run_migrations {
        store
            .run_migrations()
            .await
            .context("Failed to apply database migrations")?;
    }

    info!(host = %pg.host, database = %pg.database, "Using PostgreSQL storage");
    Ok(Arc::new(store))
}

fn log_report(report: &ValidationReport) {
    for default in &report.defaults_applied {
        debug!(field = %default.field, value = %default.value, "Default applied");
    }
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message);
    }
    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
    }
}

fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = load_config(&config_path)?;
    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Service: {} {}", config.service.name, config.service.version);
    println!("Storage: {}", config.storage.storage_type);
    println!(
        "HTTP: {}:{}",
        config.server.host, config.server.http_port
    );
    println!(
        "Instrument types: {}",
        config.inventory.instrument_types.join(", ")
    );

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Pick a storage backend (memory or postgres)");
    println!("  2. For postgres, set DB_HOST, DB_USER and DB_PASSWORD");
    println!(
        "  3. Run 'market validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  4. Run 'market start --config {:?}' to start the service",
        output_path
    );

    Ok(())
}
