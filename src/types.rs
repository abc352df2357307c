use crate::constants::{
    HEARTBEAT_INTERVAL_SECS, MAX_RETRIES, MONITOR_TYPE_HTTP, RETRY_INTERVAL_SECS,
};
use serde::{Deserialize, Serialize};

/// One data row of the input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputRow {
    /// 1-based line number in the source file (header is line 1)
    pub line: u64,
    pub name: String,
    pub url: String,
}

/// A row that could not be decoded at all
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    pub line: Option<u64>,
    pub message: String,
}

/// Monitor as returned by the server's monitor list
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExistingMonitor {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "type")]
    pub monitor_type: Option<String>,
}

/// Creation request sent for every accepted row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMonitor {
    #[serde(rename = "type")]
    pub monitor_type: String,
    pub name: String,
    pub url: String,
    pub interval: u32,
    pub retry_interval: u32,
    #[serde(rename = "maxretries")]
    pub max_retries: u32,
    pub expiry_notification: bool,
    pub ignore_tls: bool,
}

impl NewMonitor {
    /// HTTPS monitor with the importer's fixed policy: daily heartbeat,
    /// certificate expiry alerts on, TLS validation enforced.
    pub fn https(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            monitor_type: MONITOR_TYPE_HTTP.to_string(),
            name: name.into(),
            url: url.into(),
            interval: HEARTBEAT_INTERVAL_SECS,
            retry_interval: RETRY_INTERVAL_SECS,
            max_retries: MAX_RETRIES,
            expiry_notification: true,
            ignore_tls: false,
        }
    }
}

/// Why a row was not submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingName,
    NotHttps,
    AlreadyExists,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::MissingName => "missing_name",
            SkipReason::NotHttps => "not_https",
            SkipReason::AlreadyExists => "already_exists",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::MissingName => "name is empty",
            SkipReason::NotHttps => "URL is not HTTPS",
            SkipReason::AlreadyExists => "URL already exists",
        }
    }
}

/// Final state of a single input row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RowOutcome {
    Added { monitor_id: Option<u64> },
    WouldAdd,
    Skipped { reason: SkipReason },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RowResult {
    pub line: Option<u64>,
    pub name: String,
    pub url: String,
    #[serde(flatten)]
    pub outcome: RowOutcome,
}
