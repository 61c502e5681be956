//! One full synchronization pass.
//!
//! Every run starts from an empty [`MergeStore`], walks every month from the
//! configured start year to `today`, and only writes artifacts once all months
//! have been processed. Per-period failures are logged and skipped.

use crate::config::ResolvedConfig;
use crate::downloader::{enumerate_periods, fetch_archive, locate_archive, Transport};
use crate::errors::AppResult;
use crate::extractor::extract_entries;
use crate::parser::parse_entry;
use crate::store::MergeStore;
use crate::ui;
use crate::utils::{archive_size_mb, format_elapsed};
use crate::writer::{write_outputs, OutputSummary};
use chrono::NaiveDate;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Counters collected while merging the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub periods_attempted: usize,
    pub archives_found: usize,
    pub archives_failed: usize,
    /// Existence probes that failed at the transport level
    pub probe_errors: usize,
    /// Entries with a usable id, counting every sighting
    pub raw_entries: usize,
    /// Entries dropped because no id could be resolved
    pub rejected_entries: usize,
}

/// Outcome of [`run_sync`].
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub stats: SyncStats,
    pub unique_tenders: usize,
    pub outputs: OutputSummary,
    pub elapsed: Duration,
}

/// Discovers, downloads and merges every monthly archive into a fresh store.
///
/// Never fails on upstream problems: a period without an archive, a transport
/// error, or an unreadable archive contributes no records and the walk continues.
/// Transport failures are counted in [`SyncStats`] so callers can tell an
/// unreachable feed from an empty one.
///
/// # Errors
///
/// Returns an error only for invalid configuration (an unparsable base URL).
pub async fn collect_tenders<T: Transport + ?Sized>(
    transport: &T,
    config: &ResolvedConfig,
    today: NaiveDate,
) -> AppResult<(MergeStore, SyncStats)> {
    let base_url = config.base_url()?;
    let periods = enumerate_periods(config.start_year, today);

    let mut store = MergeStore::new();
    let mut stats = SyncStats {
        periods_attempted: periods.len(),
        ..SyncStats::default()
    };

    info!(
        start_year = config.start_year,
        periods = periods.len(),
        "Synchronizing tenders"
    );
    let pb = ui::create_progress_bar(periods.len() as u64)?;

    for period in periods {
        pb.set_message(format!("{period}"));
        pb.inc(1);

        let lookup = locate_archive(transport, &base_url, period).await;
        stats.probe_errors += lookup.probe_errors;
        let Some(url) = lookup.url else {
            if lookup.probe_errors > 0 {
                warn!(
                    period = %period,
                    probe_errors = lookup.probe_errors,
                    "No archive located; some probes failed"
                );
            } else {
                debug!(period = %period, "No archive published for period");
            }
            continue;
        };
        stats.archives_found += 1;
        info!(period = %period, url = %url, "Downloading archive");

        let bytes = match fetch_archive(transport, &url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                stats.archives_failed += 1;
                warn!(period = %period, url = %url, error = %e, "Failed to download archive");
                continue;
            }
        };

        let entries = match extract_entries(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                stats.archives_failed += 1;
                warn!(period = %period, url = %url, error = %e, "Failed to process archive");
                continue;
            }
        };

        let mut accepted = 0;
        for entry in &entries {
            let tender = parse_entry(entry);
            if tender.id.is_empty() {
                stats.rejected_entries += 1;
                continue;
            }
            if let Some(previous) = store.get(&tender.id) {
                debug!(
                    id = %tender.id,
                    previous_status = %previous.status,
                    status = %tender.status,
                    "Tender superseded by later sighting"
                );
            }
            store.upsert(tender);
            accepted += 1;
        }
        stats.raw_entries += accepted;

        info!(
            period = %period,
            size_mb = archive_size_mb(bytes.len()),
            entries = entries.len(),
            accepted = accepted,
            unique_total = store.len(),
            "Archive merged"
        );
    }

    pb.finish_with_message(format!("Merged {} tender(s)", store.len()));
    info!(
        archives_found = stats.archives_found,
        archives_failed = stats.archives_failed,
        probe_errors = stats.probe_errors,
        raw_entries = stats.raw_entries,
        rejected = stats.rejected_entries,
        unique = store.len(),
        "Feed merged"
    );

    Ok((store, stats))
}

/// Runs a full pass: merges the feed, then writes the history and active artifacts.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or an artifact cannot be written.
pub async fn run_sync<T: Transport + ?Sized>(
    transport: &T,
    config: &ResolvedConfig,
    today: NaiveDate,
) -> AppResult<SyncReport> {
    let started = Instant::now();

    let (store, stats) = collect_tenders(transport, config, today).await?;
    if store.is_empty() {
        warn!(
            probe_errors = stats.probe_errors,
            archives_failed = stats.archives_failed,
            "No tenders collected; writing empty artifacts"
        );
    }
    let outputs = write_outputs(config, &store, today)?;

    let elapsed = started.elapsed();
    info!(
        unique = store.len(),
        active = ?outputs.active,
        elapsed = %format_elapsed(elapsed),
        "Synchronization completed"
    );

    Ok(SyncReport {
        stats,
        unique_tenders: store.len(),
        outputs,
        elapsed,
    })
}
