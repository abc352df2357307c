use crate::app::ports::MonitorServicePort;
use crate::config::Credentials;
use crate::error::Result;
use crate::filter::{skip_reason, KnownUrls};
use crate::input::RowRead;
use crate::metrics;
use crate::report::ImportSummary;
use crate::types::{InputRow, NewMonitor, RowOutcome, RowResult, SkipReason};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Use case for importing a list of rows as HTTPS monitors
pub struct ImportUseCase {
    service: Box<dyn MonitorServicePort>,
    server: String,
    dry_run: bool,
}

impl ImportUseCase {
    pub fn new(service: Box<dyn MonitorServicePort>, server: impl Into<String>) -> Self {
        Self { service, server: server.into(), dry_run: false }
    }

    /// Evaluate every row against the server without creating anything
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the import end to end.
    ///
    /// Connection, login and the initial monitor fetch are fatal; the
    /// session is released before the error is returned. Failures of
    /// individual creations are recorded in the summary.
    #[instrument(skip(self, rows, credentials), fields(server = %self.server, dry_run = self.dry_run))]
    pub async fn run(&mut self, rows: Vec<RowRead>, credentials: &Credentials) -> Result<ImportSummary> {
        let started = Instant::now();
        let mut summary = ImportSummary::new(self.server.clone(), self.dry_run);

        let outcome = self.import(rows, credentials, &mut summary).await;

        if let Err(e) = self.service.disconnect().await {
            warn!("Failed to disconnect cleanly: {}", e);
        }

        if let Err(e) = outcome {
            error!("Import aborted: {}", e);
            return Err(e);
        }

        summary.finish();
        let duration_secs = started.elapsed().as_secs_f64();
        metrics::push_to_gateway(&summary, duration_secs).await;
        info!(
            added = summary.added,
            would_add = summary.would_add,
            skipped = summary.skipped.total(),
            failed = summary.failed,
            "Import finished"
        );
        Ok(summary)
    }

    async fn import(
        &mut self,
        rows: Vec<RowRead>,
        credentials: &Credentials,
        summary: &mut ImportSummary,
    ) -> Result<()> {
        self.service.connect().await?;
        self.service.login(credentials).await?;

        let existing = self.service.get_monitors().await?;
        summary.existing_monitors = existing.len();
        let mut known = KnownUrls::from_monitors(&existing);
        debug!("{} distinct URLs already registered", known.len());

        for row in rows {
            let result = match row {
                Ok(row) => self.import_row(row, &mut known).await,
                Err(row_error) => {
                    println!("Failed to read row: {}", row_error.message);
                    RowResult {
                        line: row_error.line,
                        name: String::new(),
                        url: String::new(),
                        outcome: RowOutcome::Failed { error: row_error.message },
                    }
                }
            };
            summary.record(result);
        }
        Ok(())
    }

    async fn import_row(&self, row: InputRow, known: &mut KnownUrls) -> RowResult {
        let outcome = if let Some(reason) = skip_reason(&row, known) {
            println!("{}", skip_message(&row, reason));
            debug!(line = row.line, reason = reason.as_str(), "Row skipped");
            RowOutcome::Skipped { reason }
        } else if self.dry_run {
            println!("Would add monitor: {}", row.name);
            known.insert(row.url.clone());
            RowOutcome::WouldAdd
        } else {
            let monitor = NewMonitor::https(row.name.clone(), row.url.clone());
            match self.service.add_monitor(&monitor).await {
                Ok(monitor_id) => {
                    println!("Added monitor: {}", row.name);
                    known.insert(row.url.clone());
                    RowOutcome::Added { monitor_id }
                }
                Err(e) => {
                    println!("Failed to add {}: {}", row.name, e);
                    warn!(line = row.line, "Failed to add monitor {}: {}", row.name, e);
                    RowOutcome::Failed { error: e.to_string() }
                }
            }
        };

        RowResult { line: Some(row.line), name: row.name, url: row.url, outcome }
    }
}

/// Line printed for a skipped row; nameless rows are identified by line and URL
fn skip_message(row: &InputRow, reason: SkipReason) -> String {
    match reason {
        SkipReason::MissingName => {
            format!("Skipping row {} ({}): {}", row.line, row.url, reason.describe())
        }
        _ => format!("Skipping {}: {}", row.name, reason.describe()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use crate::types::{ExistingMonitor, RowError};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Calls {
        connects: usize,
        logins: usize,
        fetches: usize,
        disconnects: usize,
        added: Vec<NewMonitor>,
    }

    #[derive(Default, Clone, Copy, PartialEq)]
    enum FailAt {
        #[default]
        Nowhere,
        Connect,
        Login,
        Fetch,
    }

    struct MockService {
        calls: Arc<Mutex<Calls>>,
        existing: Vec<ExistingMonitor>,
        fail_at: FailAt,
        reject_urls: Vec<String>,
    }

    impl MockService {
        fn new(existing: &[&str]) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Calls::default())),
                existing: existing
                    .iter()
                    .enumerate()
                    .map(|(i, url)| ExistingMonitor {
                        id: Some(i as u64 + 1),
                        name: Some(format!("existing {i}")),
                        url: Some(url.to_string()),
                        monitor_type: Some("http".to_string()),
                    })
                    .collect(),
                fail_at: FailAt::Nowhere,
                reject_urls: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl MonitorServicePort for MockService {
        async fn connect(&mut self) -> Result<()> {
            self.calls.lock().unwrap().connects += 1;
            if self.fail_at == FailAt::Connect {
                return Err(ImportError::Api { status: 502, message: "unreachable".to_string() });
            }
            Ok(())
        }

        async fn login(&mut self, _credentials: &Credentials) -> Result<()> {
            self.calls.lock().unwrap().logins += 1;
            if self.fail_at == FailAt::Login {
                return Err(ImportError::Auth("bad password".to_string()));
            }
            Ok(())
        }

        async fn get_monitors(&self) -> Result<Vec<ExistingMonitor>> {
            self.calls.lock().unwrap().fetches += 1;
            if self.fail_at == FailAt::Fetch {
                return Err(ImportError::Api { status: 500, message: "boom".to_string() });
            }
            Ok(self.existing.clone())
        }

        async fn add_monitor(&self, monitor: &NewMonitor) -> Result<Option<u64>> {
            if self.reject_urls.contains(&monitor.url) {
                return Err(ImportError::Api { status: 400, message: "rejected".to_string() });
            }
            let mut calls = self.calls.lock().unwrap();
            calls.added.push(monitor.clone());
            Ok(Some(100 + calls.added.len() as u64))
        }

        async fn disconnect(&mut self) -> Result<()> {
            self.calls.lock().unwrap().disconnects += 1;
            Ok(())
        }
    }

    fn rows(data: &[(&str, &str)]) -> Vec<RowRead> {
        data.iter()
            .enumerate()
            .map(|(i, (name, url))| {
                Ok(InputRow { line: i as u64 + 2, name: name.to_string(), url: url.to_string() })
            })
            .collect()
    }

    fn creds() -> Credentials {
        Credentials::new("admin", "secret")
    }

    #[tokio::test]
    async fn test_filters_dedupes_and_adds() {
        let service = MockService::new(&["https://existing.example.com"]);
        let calls = service.calls.clone();
        let mut use_case = ImportUseCase::new(Box::new(service), "http://kuma");

        let input = rows(&[
            ("Existing", "https://existing.example.com"),
            ("Plain", "http://plain.example.com"),
            ("New", "https://new.example.com"),
            ("New again", "https://new.example.com"),
            ("Upper", "HTTPS://upper.example.com"),
        ]);
        let summary = use_case.run(input, &creds()).await.unwrap();

        assert_eq!(summary.added, 2);
        assert_eq!(summary.skipped.already_exists, 2);
        assert_eq!(summary.skipped.not_https, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.existing_monitors, 1);
        assert!(summary.finished_at.is_some());

        let calls = calls.lock().unwrap();
        assert_eq!(calls.added.len(), 2);
        assert_eq!(calls.added[0], NewMonitor::https("New", "https://new.example.com"));
        assert_eq!(calls.added[1].url, "HTTPS://upper.example.com");
        assert_eq!(calls.disconnects, 1);
        assert_eq!(calls.fetches, 1);
    }

    #[tokio::test]
    async fn test_failed_create_is_counted_and_retried_later() {
        let mut service = MockService::new(&[]);
        service.reject_urls.push("https://flaky.example.com".to_string());
        let calls = service.calls.clone();
        let mut use_case = ImportUseCase::new(Box::new(service), "http://kuma");

        let input = rows(&[
            ("Flaky", "https://flaky.example.com"),
            ("Good", "https://good.example.com"),
            ("Flaky twin", "https://flaky.example.com"),
        ]);
        let summary = use_case.run(input, &creds()).await.unwrap();

        assert_eq!(summary.failed, 2);
        assert_eq!(summary.added, 1);
        assert_eq!(summary.skipped.total(), 0);
        assert!(matches!(summary.rows[0].outcome, RowOutcome::Failed { .. }));
        assert_eq!(summary.rows[1].outcome, RowOutcome::Added { monitor_id: Some(101) });
        assert_eq!(calls.lock().unwrap().disconnects, 1);
    }

    #[tokio::test]
    async fn test_unreadable_rows_count_as_errors() {
        let service = MockService::new(&[]);
        let mut use_case = ImportUseCase::new(Box::new(service), "http://kuma");

        let mut input = rows(&[("A", "https://a.example.com")]);
        input.push(Err(RowError { line: Some(3), message: "invalid UTF-8".to_string() }));
        let summary = use_case.run(input, &creds()).await.unwrap();

        assert_eq!(summary.added, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.rows[1].line, Some(3));
    }

    #[tokio::test]
    async fn test_missing_name_is_skipped_without_call() {
        let service = MockService::new(&[]);
        let calls = service.calls.clone();
        let mut use_case = ImportUseCase::new(Box::new(service), "http://kuma");

        let summary = use_case.run(rows(&[("", "https://a.example.com")]), &creds()).await.unwrap();

        assert_eq!(summary.skipped.missing_name, 1);
        assert_eq!(summary.rows[0].outcome, RowOutcome::Skipped { reason: SkipReason::MissingName });
        assert!(calls.lock().unwrap().added.is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_creates_nothing_but_tracks_duplicates() {
        let service = MockService::new(&[]);
        let calls = service.calls.clone();
        let mut use_case = ImportUseCase::new(Box::new(service), "http://kuma").dry_run(true);

        let input = rows(&[("A", "https://a.example.com"), ("A twin", "https://a.example.com")]);
        let summary = use_case.run(input, &creds()).await.unwrap();

        assert!(summary.dry_run);
        assert_eq!(summary.would_add, 1);
        assert_eq!(summary.added, 0);
        assert_eq!(summary.skipped.already_exists, 1);
        assert!(calls.lock().unwrap().added.is_empty());
    }

    #[tokio::test]
    async fn test_fatal_stages_still_disconnect() {
        for (fail_at, connects, logins, fetches) in [
            (FailAt::Connect, 1, 0, 0),
            (FailAt::Login, 1, 1, 0),
            (FailAt::Fetch, 1, 1, 1),
        ] {
            let mut service = MockService::new(&[]);
            service.fail_at = fail_at;
            let calls = service.calls.clone();
            let mut use_case = ImportUseCase::new(Box::new(service), "http://kuma");

            let result = use_case.run(rows(&[("A", "https://a.example.com")]), &creds()).await;
            assert!(result.is_err());

            let calls = calls.lock().unwrap();
            assert_eq!(calls.connects, connects);
            assert_eq!(calls.logins, logins);
            assert_eq!(calls.fetches, fetches);
            assert_eq!(calls.disconnects, 1);
            assert!(calls.added.is_empty());
        }
    }

    #[test]
    fn test_skip_message_identifies_nameless_rows() {
        let row = InputRow { line: 7, name: String::new(), url: "https://a.example.com".to_string() };
        assert_eq!(
            skip_message(&row, SkipReason::MissingName),
            "Skipping row 7 (https://a.example.com): name is empty"
        );

        let row = InputRow { line: 8, name: "Blog".to_string(), url: "http://blog.example.com".to_string() };
        assert_eq!(skip_message(&row, SkipReason::NotHttps), "Skipping Blog: URL is not HTTPS");
    }
}
