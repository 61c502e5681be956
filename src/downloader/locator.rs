use super::period::PeriodToken;
use super::transport::Transport;
use crate::constants::{PERIOD_PLACEHOLDER, ZIP_PATTERNS};
use crate::errors::AppResult;
use tracing::{debug, warn};
use url::Url;

/// Builds the candidate archive URLs for a period, in pattern priority order.
///
/// Patterns that fail to join onto `base_url` are skipped.
pub fn candidate_urls(base_url: &Url, period: PeriodToken) -> Vec<Url> {
    let token = period.to_string();
    ZIP_PATTERNS
        .iter()
        .filter_map(|pattern| base_url.join(&pattern.replace(PERIOD_PLACEHOLDER, &token)).ok())
        .collect()
}

/// Outcome of probing one period's filename patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveLookup {
    /// First pattern whose probe reported success
    pub url: Option<String>,
    /// Probes that failed at the transport level (timeout, connection error)
    pub probe_errors: usize,
}

/// Resolves the archive URL for `period` by probing each filename pattern in order.
///
/// The first pattern whose probe reports success wins. A non-success answer is
/// the normal "not under this name" case; a transport error is logged as a
/// warning and counted in [`ArchiveLookup::probe_errors`]. Both move on to the
/// next pattern.
pub async fn locate_archive<T: Transport + ?Sized>(
    transport: &T,
    base_url: &Url,
    period: PeriodToken,
) -> ArchiveLookup {
    let mut lookup = ArchiveLookup::default();
    for url in candidate_urls(base_url, period) {
        match transport.exists(url.as_str()).await {
            Ok(true) => {
                lookup.url = Some(url.to_string());
                break;
            }
            Ok(false) => debug!(period = %period, url = %url, "Archive pattern not present"),
            Err(e) => {
                lookup.probe_errors += 1;
                warn!(period = %period, url = %url, error = %e, "Archive probe failed");
            }
        }
    }
    lookup
}

/// Downloads the archive bytes for a resolved URL. A single attempt; callers
/// treat any error as a failure of this period only.
pub async fn fetch_archive<T: Transport + ?Sized>(transport: &T, url: &str) -> AppResult<Vec<u8>> {
    transport.fetch(url).await
}
