use crate::config::Credentials;
use crate::error::Result;
use crate::types::{ExistingMonitor, NewMonitor};
use async_trait::async_trait;

/// Remote monitoring server as seen by the importer
#[async_trait]
pub trait MonitorServicePort: Send + Sync {
    /// Open the connection and make sure the server answers
    async fn connect(&mut self) -> Result<()>;

    async fn login(&mut self, credentials: &Credentials) -> Result<()>;

    async fn get_monitors(&self) -> Result<Vec<ExistingMonitor>>;

    /// Create a monitor, returning its server-side id when reported
    async fn add_monitor(&self, monitor: &NewMonitor) -> Result<Option<u64>>;

    /// Release the session; safe to call whether or not `connect` succeeded
    async fn disconnect(&mut self) -> Result<()>;
}
