use crate::error::Result;
use crate::types::{RowOutcome, RowResult, SkipReason};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub not_https: usize,
    pub already_exists: usize,
    pub missing_name: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.not_https + self.already_exists + self.missing_name
    }

    fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::NotHttps => self.not_https += 1,
            SkipReason::AlreadyExists => self.already_exists += 1,
            SkipReason::MissingName => self.missing_name += 1,
        }
    }
}

/// Result of a complete import run
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub run_id: Uuid,
    pub server: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub existing_monitors: usize,
    pub added: usize,
    pub would_add: usize,
    pub skipped: SkipCounts,
    pub failed: usize,
    pub rows: Vec<RowResult>,
}

impl ImportSummary {
    pub fn new(server: impl Into<String>, dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            server: server.into(),
            dry_run,
            started_at: Utc::now(),
            finished_at: None,
            existing_monitors: 0,
            added: 0,
            would_add: 0,
            skipped: SkipCounts::default(),
            failed: 0,
            rows: Vec::new(),
        }
    }

    pub fn record(&mut self, result: RowResult) {
        match &result.outcome {
            RowOutcome::Added { .. } => self.added += 1,
            RowOutcome::WouldAdd => self.would_add += 1,
            RowOutcome::Skipped { reason } => self.skipped.record(*reason),
            RowOutcome::Failed { .. } => self.failed += 1,
        }
        self.rows.push(result);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Print the end-of-run summary to stdout
    pub fn print(&self) {
        println!("Import complete.");
        if self.dry_run {
            println!("   Would add: {}", self.would_add);
        } else {
            println!("   Added: {}", self.added);
        }
        println!(
            "   Skipped: {} (not HTTPS: {}, already exists: {}, missing name: {})",
            self.skipped.total(),
            self.skipped.not_https,
            self.skipped.already_exists,
            self.skipped.missing_name
        );
        println!("   Errors: {}", self.failed);
    }

    /// Persist the summary as pretty JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json_content = serde_json::to_string_pretty(self)?;
        fs::write(path, json_content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn result(outcome: RowOutcome) -> RowResult {
        RowResult { line: Some(2), name: "n".to_string(), url: "https://n".to_string(), outcome }
    }

    #[test]
    fn test_counts_follow_outcomes() {
        let mut summary = ImportSummary::new("http://kuma", false);
        summary.record(result(RowOutcome::Added { monitor_id: Some(4) }));
        summary.record(result(RowOutcome::Skipped { reason: SkipReason::NotHttps }));
        summary.record(result(RowOutcome::Skipped { reason: SkipReason::AlreadyExists }));
        summary.record(result(RowOutcome::Skipped { reason: SkipReason::AlreadyExists }));
        summary.record(result(RowOutcome::Failed { error: "boom".to_string() }));

        assert_eq!(summary.added, 1);
        assert_eq!(summary.skipped.total(), 3);
        assert_eq!(summary.skipped.already_exists, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_rows(), 5);
    }

    #[test]
    fn test_write_json_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports/run.json");

        let mut summary = ImportSummary::new("http://kuma", true);
        summary.record(result(RowOutcome::WouldAdd));
        summary.finish();
        summary.write_json(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["dry_run"], true);
        assert_eq!(value["would_add"], 1);
        assert_eq!(value["rows"][0]["outcome"], "would_add");
        assert!(value["finished_at"].is_string());
    }
}
