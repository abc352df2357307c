/// Defaults and fixed monitor policy shared across the importer.

// Configuration defaults (used when no config file or flag overrides them)
pub const DEFAULT_KUMA_URL: &str = "http://127.0.0.1:3001";
pub const DEFAULT_CSV_FILE: &str = "monitors.csv";
pub const DEFAULT_CONFIG_FILE: &str = "kuma-import.toml";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

// Credential environment variables
pub const USERNAME_ENV: &str = "KUMA_USERNAME";
pub const PASSWORD_ENV: &str = "KUMA_PASSWORD";
pub const PUSHGATEWAY_ENV: &str = "KUMA_IMPORT_PUSHGATEWAY_URL";

// Required input columns
pub const NAME_COLUMN: &str = "name";
pub const URL_COLUMN: &str = "url";

// Policy applied to every imported monitor
pub const MONITOR_TYPE_HTTP: &str = "http";
pub const HEARTBEAT_INTERVAL_SECS: u32 = 86_400;
pub const RETRY_INTERVAL_SECS: u32 = 60;
pub const MAX_RETRIES: u32 = 3;

pub const SECURE_SCHEME_PREFIX: &str = "https://";
