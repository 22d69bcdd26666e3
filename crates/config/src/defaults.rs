pub fn default_enabled() -> bool {
    true
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_http_port() -> u16 {
    8080
}

pub fn default_request_timeout() -> u64 {
    30
}

pub fn default_storage_type() -> String {
    "memory".to_string()
}

pub fn default_postgres_port() -> u16 {
    5432
}

pub fn default_ssl_mode() -> String {
    "require".to_string()
}

pub fn default_max_connections() -> u32 {
    20
}

pub fn default_connection_timeout() -> u64 {
    30
}

pub fn default_name_max_length() -> usize {
    200
}

pub fn default_max_ceiling() -> i32 {
    500
}

pub fn default_initial_quantity_ceiling() -> i32 {
    100
}

pub fn default_max_delta() -> i32 {
    500
}

/// Every known instrument type.
pub const INSTRUMENT_TYPES: [&str; 7] = [
    "GUITAR",
    "BASS",
    "DRUM",
    "KEYBOARD",
    "WIND",
    "STRING",
    "PERCUSSION",
];

pub fn default_instrument_types() -> Vec<String> {
    INSTRUMENT_TYPES.iter().map(|t| t.to_string()).collect()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_metrics_port() -> u16 {
    9090
}
