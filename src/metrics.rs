use crate::constants::PUSHGATEWAY_ENV;
use crate::report::ImportSummary;
use tracing::{info, warn};

/// Prometheus text exposition of a finished run
pub fn render_snapshot(summary: &ImportSummary, duration_secs: f64) -> String {
    format!(
        "# TYPE kuma_import_monitors_added_total counter\n\
         kuma_import_monitors_added_total {}\n\
         # TYPE kuma_import_monitors_skipped_total counter\n\
         kuma_import_monitors_skipped_total{{reason=\"not_https\"}} {}\n\
         kuma_import_monitors_skipped_total{{reason=\"already_exists\"}} {}\n\
         kuma_import_monitors_skipped_total{{reason=\"missing_name\"}} {}\n\
         # TYPE kuma_import_monitors_failed_total counter\n\
         kuma_import_monitors_failed_total {}\n\
         # TYPE kuma_import_run_duration_seconds gauge\n\
         kuma_import_run_duration_seconds {}\n\
         # TYPE kuma_import_last_run_timestamp_seconds gauge\n\
         kuma_import_last_run_timestamp_seconds {}\n",
        summary.added,
        summary.skipped.not_https,
        summary.skipped.already_exists,
        summary.skipped.missing_name,
        summary.failed,
        duration_secs,
        chrono::Utc::now().timestamp()
    )
}

/// Push the run's counters to a Pushgateway if one is configured.
/// Failures are logged, never returned.
pub async fn push_to_gateway(summary: &ImportSummary, duration_secs: f64) {
    match std::env::var(PUSHGATEWAY_ENV) {
        Ok(base) if !base.trim().is_empty() => {
            push_snapshot(&base, summary, duration_secs).await;
        }
        _ => {}
    }
}

/// Returns whether the gateway accepted the snapshot
pub async fn push_snapshot(base: &str, summary: &ImportSummary, duration_secs: f64) -> bool {
    let push_url = format!("{}/metrics/job/kuma_import", base.trim().trim_end_matches('/'));
    let body = render_snapshot(summary, duration_secs);

    let push_res = reqwest::Client::new()
        .post(&push_url)
        .header("Content-Type", "text/plain; version=0.0.4")
        .body(body)
        .send()
        .await;

    match push_res {
        Ok(r) if r.status().is_success() => {
            info!("Pushed run metrics to Pushgateway");
            true
        }
        Ok(r) => {
            warn!("Pushgateway push responded with status {}", r.status().as_u16());
            false
        }
        Err(e) => {
            warn!("Failed to push metrics to Pushgateway: {}", e);
            false
        }
    }
}
