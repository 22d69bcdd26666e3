use crate::*;
use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

const VERSION_PATTERN: &str = r"^\d+\.\d+\.\d+$";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Service name is required")]
    MissingServiceName,

    #[error("Invalid version format: {0}. Must be in format X.Y.Z (e.g., 1.0.0)")]
    InvalidVersionFormat(String),

    #[error("Server: {message}")]
    InvalidServer { message: String },

    #[error("Storage: {message}")]
    InvalidStorage { message: String },

    #[error("inventory.limits.{field}: {message}")]
    InvalidLimit { field: String, message: String },

    #[error("Unknown instrument type '{0}'. Must be one of: GUITAR, BASS, DRUM, KEYBOARD, WIND, STRING, PERCUSSION")]
    UnknownInstrumentType(String),

    #[error("At least one instrument type must be enabled")]
    NoInstrumentTypes,

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Metrics: {message}")]
    InvalidMetrics { message: String },

    #[error("Environment variable '{var}' is missing or invalid: {message}")]
    InvalidEnvVar { var: String, message: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &MarketConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_service(&config.service, &mut report);
    validate_server(&config.server, &mut report);
    validate_storage(&config.storage, &mut report);
    validate_inventory(&config.inventory, &mut report);
    validate_logging(&config.logging, &mut report);

    match config.metrics {
        Some(ref metrics) => validate_metrics(metrics, &config.server, &mut report),
        None => report.add_default("metrics.enabled", "false"),
    }

    report
}

fn validate_service(service: &ServiceConfig, report: &mut ValidationReport) {
    if service.name.trim().is_empty() {
        report.add_error(ValidationError::MissingServiceName);
    }

    let version_ok = Regex::new(VERSION_PATTERN)
        .map(|re| re.is_match(&service.version))
        .unwrap_or(false);
    if !version_ok {
        report.add_error(ValidationError::InvalidVersionFormat(service.version.clone()));
    }

    if service.description.is_empty() {
        report.add_warning("service.description", "No service description set");
    }
}

fn validate_server(server: &HttpServerConfig, report: &mut ValidationReport) {
    if server.host.trim().is_empty() {
        report.add_error(ValidationError::InvalidServer {
            message: "host must not be empty".to_string(),
        });
    }

    if server.http_port == 0 {
        report.add_error(ValidationError::InvalidServer {
            message: "http_port must be a positive integer".to_string(),
        });
    } else if server.http_port < 1024 {
        report.add_warning(
            "server.http_port",
            "Ports below 1024 usually require elevated privileges",
        );
    }

    if server.request_timeout_seconds == 0 {
        report.add_error(ValidationError::InvalidServer {
            message: "request_timeout_seconds must be a positive integer".to_string(),
        });
    }
}

fn validate_storage(storage: &StorageConfig, report: &mut ValidationReport) {
    match storage.storage_type.to_ascii_lowercase().as_str() {
        "memory" => {
            report.add_warning(
                "storage.type",
                "In-memory storage loses all instruments on restart",
            );
        }
        "postgres" => match storage.postgres {
            Some(ref pg) => validate_postgres_config(pg, report),
            None => report.add_error(ValidationError::InvalidStorage {
                message: "Storage type is 'postgres' but postgres configuration is missing"
                    .to_string(),
            }),
        },
        other => report.add_error(ValidationError::InvalidStorage {
            message: format!("Invalid storage type '{}'. Must be one of: memory, postgres", other),
        }),
    }
}

fn validate_postgres_config(pg: &PostgresConfig, report: &mut ValidationReport) {
    let required = [
        ("DB_HOST", "host", &pg.host),
        ("DB_NAME", "database", &pg.database),
        ("DB_USER", "user", &pg.user),
        ("DB_PASSWORD", "password", &pg.password),
    ];
    for (var, field, value) in required {
        if value.is_empty() || has_unresolved_env_vars(value) {
            report.add_error(ValidationError::InvalidEnvVar {
                var: var.to_string(),
                message: format!("postgres {} is missing or unresolved", field),
            });
        }
    }

    if pg.port == 0 {
        report.add_error(ValidationError::InvalidStorage {
            message: "port must be a positive integer".to_string(),
        });
    }

    if pg.max_connections == 0 {
        report.add_error(ValidationError::InvalidStorage {
            message: "max_connections must be a positive integer".to_string(),
        });
    }

    if pg.connection_timeout_seconds == 0 {
        report.add_error(ValidationError::InvalidStorage {
            message: "connection_timeout_seconds must be a positive integer".to_string(),
        });
    }

    if pg.ssl_mode == "disable" {
        report.add_warning("storage.postgres.ssl_mode", "TLS is disabled for the database connection");
    }
}

fn validate_inventory(inventory: &InventoryConfig, report: &mut ValidationReport) {
    let limits = &inventory.limits;

    let mut positive = |field: &str, value: i64| {
        if value <= 0 {
            report.add_error(ValidationError::InvalidLimit {
                field: field.to_string(),
                message: format!("must be a positive integer, got {}", value),
            });
        }
    };
    positive("name_max_length", limits.name_max_length as i64);
    positive("brand_max_length", limits.brand_max_length as i64);
    positive("max_ceiling", limits.max_ceiling as i64);
    positive("initial_quantity_ceiling", limits.initial_quantity_ceiling as i64);
    positive("max_delta", limits.max_delta as i64);

    if limits.initial_quantity_ceiling > limits.max_ceiling {
        report.add_warning(
            "inventory.limits.initial_quantity_ceiling",
            "Exceeds max_ceiling; instruments are still bounded by their own max",
        );
    }

    if inventory.instrument_types.is_empty() {
        report.add_error(ValidationError::NoInstrumentTypes);
    }

    let mut seen = HashSet::new();
    for t in &inventory.instrument_types {
        let upper = t.to_ascii_uppercase();
        if !INSTRUMENT_TYPES.contains(&upper.as_str()) {
            report.add_error(ValidationError::UnknownInstrumentType(t.clone()));
        } else if !seen.insert(upper) {
            report.add_warning(
                "inventory.instrument_types",
                &format!("Instrument type '{}' listed more than once", t),
            );
        }
    }
}

fn validate_logging(logging: &LoggingConfig, report: &mut ValidationReport) {
    if !LOG_FORMATS.contains(&logging.format.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(logging.format.clone()));
    }

    // Full filter directives such as "inventory=debug,info" pass through
    let level = logging.level.to_lowercase();
    if !level.contains('=') && !LOG_LEVELS.contains(&level.as_str()) {
        report.add_error(ValidationError::InvalidLogLevel(logging.level.clone()));
    }
}

fn validate_metrics(metrics: &MetricsConfig, server: &HttpServerConfig, report: &mut ValidationReport) {
    if !metrics.enabled {
        return;
    }

    if metrics.port == 0 {
        report.add_error(ValidationError::InvalidMetrics {
            message: "port must be a positive integer".to_string(),
        });
    }

    if metrics.port == server.http_port {
        report.add_error(ValidationError::InvalidMetrics {
            message: format!("port {} collides with server.http_port", metrics.port),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> MarketConfig {
        generate_default_config()
    }

    #[test]
    fn test_valid_default_config() {
        let report = validate_config(&base_config());
        assert!(report.is_valid());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.field == "storage.type"));
    }

    #[test]
    fn test_invalid_version() {
        let mut config = base_config();
        config.service.version = "v1".to_string();

        let report = validate_config(&config);
        assert_eq!(
            report.errors,
            vec![ValidationError::InvalidVersionFormat("v1".to_string())]
        );
    }

    #[test]
    fn test_postgres_requires_resolved_credentials() {
        let mut config = base_config();
        config.storage.storage_type = "postgres".to_string();

        let report = validate_config(&config);
        assert!(!report.is_valid());
        assert!(report.errors.iter().any(|e| matches!(
            e,
            ValidationError::InvalidEnvVar { var, .. } if var == "DB_PASSWORD"
        )));
    }

    #[test]
    fn test_postgres_section_missing() {
        let mut config = base_config();
        config.storage.storage_type = "postgres".to_string();
        config.storage.postgres = None;

        let report = validate_config(&config);
        assert!(matches!(
            report.errors.as_slice(),
            [ValidationError::InvalidStorage { .. }]
        ));
    }

    #[test]
    fn test_unknown_storage_type() {
        let mut config = base_config();
        config.storage.storage_type = "redis".to_string();
        assert!(!validate_config(&config).is_valid());
    }

    #[test]
    fn test_instrument_types() {
        let mut config = base_config();
        config.inventory.instrument_types = vec![
            "guitar".to_string(),
            "GUITAR".to_string(),
            "theremin".to_string(),
        ];

        let report = validate_config(&config);
        assert_eq!(
            report.errors,
            vec![ValidationError::UnknownInstrumentType("theremin".to_string())]
        );
        assert!(report
            .warnings
            .iter()
            .any(|w| w.field == "inventory.instrument_types"));

        config.inventory.instrument_types.clear();
        assert!(validate_config(&config)
            .errors
            .contains(&ValidationError::NoInstrumentTypes));
    }

    #[test]
    fn test_non_positive_limits() {
        let mut config = base_config();
        config.inventory.limits.max_delta = 0;

        let report = validate_config(&config);
        assert!(matches!(
            report.errors.as_slice(),
            [ValidationError::InvalidLimit { field, .. }] if field == "max_delta"
        ));
    }

    #[test]
    fn test_logging_and_metrics() {
        let mut config = base_config();
        config.logging.format = "xml".to_string();
        config.logging.level = "inventory=debug,info".to_string();
        config.metrics = Some(MetricsConfig {
            enabled: true,
            port: config.server.http_port,
        });

        let report = validate_config(&config);
        assert_eq!(report.errors.len(), 2);
        assert!(report
            .errors
            .contains(&ValidationError::InvalidLogFormat("xml".to_string())));
    }

    #[test]
    fn test_metrics_default_recorded() {
        let mut config = base_config();
        config.metrics = None;

        let report = validate_config(&config);
        assert!(report
            .defaults_applied
            .iter()
            .any(|d| d.field == "metrics.enabled" && d.value == "false"));
    }
}
