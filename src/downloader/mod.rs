//! Archive discovery and download.
//!
//! The syndication publishes one ZIP per month, but its filename convention
//! changed over time. [`enumerate_periods`] lists the months to try,
//! [`locate_archive`] probes the known filename patterns for one month, and
//! [`fetch_archive`] downloads the archive that answered. All network access goes
//! through the [`Transport`] trait.

mod locator;
mod period;
mod transport;

// Re-export public API
pub use locator::{candidate_urls, fetch_archive, locate_archive, ArchiveLookup};
pub use period::{enumerate_periods, PeriodToken};
pub use transport::{HttpTransport, Transport};
