//! One acquisition run: every query in order, shop names, then the merge.
//!
//! [`spawn_acquisition`] runs [`run_acquisition`] on a background task and
//! streams [`Progress`] events back over a channel so the caller's own loop
//! (terminal, UI) stays responsive and can set the [`StopSignal`] at any time.

use bestseller_core::{ProductRecord, QueryDescriptor, StopSignal};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::aggregate::merge_ranked;
use crate::client::MarketplaceClient;
use crate::error::ScraperError;
use crate::shop_names::ShopNameCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    /// The stop signal was set; `records` holds whatever was gathered first.
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    QueryStarted {
        index: usize,
        total: usize,
        label: String,
    },
    QueryFinished {
        index: usize,
        total: usize,
        label: String,
        records: usize,
    },
}

impl Progress {
    /// Share of queries finished, 0.0–1.0, for a progress bar.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction_complete(&self) -> f64 {
        let (done, total) = match self {
            Progress::QueryStarted { index, total, .. } => (*index, *total),
            Progress::QueryFinished { index, total, .. } => (index + 1, *total),
        };
        if total == 0 {
            1.0
        } else {
            done as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AcquisitionReport {
    /// Deduplicated and ranked, best sellers first.
    pub records: Vec<ProductRecord>,
    pub status: RunStatus,
    /// Queries that ran to completion before the run ended.
    pub queries_run: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Runs every query in order and merges the results.
///
/// All descriptors are validated before the first request. Queries never
/// overlap; `on_progress` is called before and after each one, on the
/// running task. A set `stop` ends the run at the next poll point with
/// [`RunStatus::Stopped`] and the records gathered so far.
///
/// # Errors
///
/// - [`ScraperError::InvalidQuery`] if any descriptor is invalid; no request
///   is made.
/// - [`ScraperError::Network`] if a page fetch exhausts its retries. The
///   whole run fails and earlier results are discarded.
pub async fn run_acquisition<F>(
    client: &MarketplaceClient,
    queries: &[QueryDescriptor],
    stop: &StopSignal,
    mut on_progress: F,
) -> Result<AcquisitionReport, ScraperError>
where
    F: FnMut(&Progress),
{
    for query in queries {
        query.validate()?;
    }

    let started_at = Utc::now();
    let total = queries.len();
    let mut shop_names = ShopNameCache::new();
    let mut per_query: Vec<Vec<ProductRecord>> = Vec::with_capacity(total);

    for (index, query) in queries.iter().enumerate() {
        if stop.is_stopped() {
            tracing::info!(index, total, "stop requested — skipping remaining queries");
            break;
        }

        on_progress(&Progress::QueryStarted {
            index,
            total,
            label: query.label.clone(),
        });

        let mut records = client.fetch_query(query, stop).await?;

        if query.resolve_shop_names && !records.is_empty() && !stop.is_stopped() {
            let lookups = shop_names
                .resolve(client, records.iter().map(|r| r.shop_id), stop)
                .await;
            shop_names.backfill(&mut records);
            tracing::debug!(label = %query.label, lookups, "resolved shop names");
        }

        tracing::info!(label = %query.label, index, total, records = records.len(), "query finished");
        on_progress(&Progress::QueryFinished {
            index,
            total,
            label: query.label.clone(),
            records: records.len(),
        });
        per_query.push(records);
    }

    let queries_run = per_query.len();
    let status = if stop.is_stopped() {
        RunStatus::Stopped
    } else {
        RunStatus::Completed
    };
    let records = merge_ranked(per_query);

    Ok(AcquisitionReport {
        records,
        status,
        queries_run,
        started_at,
        finished_at: Utc::now(),
    })
}

/// Runs [`run_acquisition`] on a background task.
///
/// Progress events arrive on the returned receiver; the receiver closes when
/// the run ends. The run's outcome is the task's output.
#[must_use]
pub fn spawn_acquisition(
    client: MarketplaceClient,
    queries: Vec<QueryDescriptor>,
    stop: StopSignal,
) -> (
    JoinHandle<Result<AcquisitionReport, ScraperError>>,
    mpsc::UnboundedReceiver<Progress>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        run_acquisition(&client, &queries, &stop, |event| {
            // A dropped receiver only means nobody is watching progress.
            let _ = tx.send(event.clone());
        })
        .await
    });
    (handle, rx)
}
