use crate::app::ports::MonitorServicePort;
use crate::config::Credentials;
use crate::error::{ImportError, Result};
use crate::types::{ExistingMonitor, NewMonitor};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const LOGIN_PATH: &str = "login/access-token";
const MONITORS_PATH: &str = "monitors/";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MonitorListResponse {
    monitors: Vec<ExistingMonitor>,
}

#[derive(Debug, Deserialize)]
struct AddMonitorResponse {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default, rename = "monitorID", alias = "monitorId", alias = "monitor_id")]
    monitor_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    msg: Option<String>,
}

/// Uptime Kuma client speaking to the REST bridge in front of the server
pub struct KumaRestClient {
    base_url: Url,
    timeout: Duration,
    client: Option<Client>,
    token: Option<String>,
}

impl KumaRestClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ImportError::Config(format!("Invalid server URL '{base_url}': {e}")))?;
        // Url::join replaces the last segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, timeout, client: None, token: None })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ImportError::Config(format!("Invalid endpoint '{path}': {e}")))
    }

    fn client(&self) -> Result<&Client> {
        self.client.as_ref().ok_or(ImportError::NotConnected)
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| ImportError::Auth("not logged in".to_string()))
    }
}

/// Turn a non-success response into an `Api` error with the server's message
async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ImportError::Api { status: status.as_u16(), message: error_message(status, &body) })
}

fn error_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let from_body = parsed.and_then(|b| match (b.detail, b.msg) {
        (Some(serde_json::Value::String(s)), _) => Some(s),
        (Some(other), _) => Some(other.to_string()),
        (None, Some(msg)) => Some(msg),
        (None, None) => None,
    });
    match from_body {
        Some(msg) => msg,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status.canonical_reason().unwrap_or("request failed").to_string(),
    }
}

#[async_trait]
impl MonitorServicePort for KumaRestClient {
    #[instrument(skip(self), fields(server = %self.base_url))]
    async fn connect(&mut self) -> Result<()> {
        let client = Client::builder().timeout(self.timeout).build()?;
        // Any HTTP answer proves the server is reachable; only transport errors fail
        let resp = client.get(self.base_url.clone()).send().await?;
        debug!("Server answered probe with status {}", resp.status().as_u16());
        self.client = Some(client);
        info!("Connected to {}", self.base_url);
        Ok(())
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn login(&mut self, credentials: &Credentials) -> Result<()> {
        let url = self.endpoint(LOGIN_PATH)?;
        let resp = self
            .client()?
            .post(url)
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;

        let resp = match check_status(resp).await {
            Ok(resp) => resp,
            Err(ImportError::Api { status, message }) if status == 400 || status == 401 || status == 403 => {
                return Err(ImportError::Auth(message));
            }
            Err(e) => return Err(e),
        };

        let token: TokenResponse = resp.json().await?;
        if token.access_token.is_empty() {
            return Err(ImportError::Auth("server returned an empty token".to_string()));
        }
        if let Some(kind) = token.token_type.as_deref() {
            if !kind.eq_ignore_ascii_case("bearer") {
                warn!("Unexpected token type '{}', using it as bearer", kind);
            }
        }
        self.token = Some(token.access_token);
        info!("Authenticated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_monitors(&self) -> Result<Vec<ExistingMonitor>> {
        let url = self.endpoint(MONITORS_PATH)?;
        let resp = self.client()?.get(url).bearer_auth(self.token()?).send().await?;
        let list: MonitorListResponse = check_status(resp).await?.json().await?;
        info!("Fetched {} existing monitors", list.monitors.len());
        Ok(list.monitors)
    }

    #[instrument(skip(self, monitor), fields(name = %monitor.name, url = %monitor.url))]
    async fn add_monitor(&self, monitor: &NewMonitor) -> Result<Option<u64>> {
        let url = self.endpoint(MONITORS_PATH)?;
        let resp = self
            .client()?
            .post(url)
            .bearer_auth(self.token()?)
            .json(monitor)
            .send()
            .await?;
        let created: AddMonitorResponse = check_status(resp).await?.json().await?;
        debug!(monitor_id = ?created.monitor_id, msg = ?created.msg, "Monitor created");
        Ok(created.monitor_id)
    }

    #[instrument(skip(self))]
    async fn disconnect(&mut self) -> Result<()> {
        self.token = None;
        if self.client.take().is_some() {
            info!("Disconnected from {}", self.base_url);
        }
        Ok(())
    }
}
