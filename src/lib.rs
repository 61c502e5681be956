//! placsp-sync library
//!
//! This crate provides the synchronization engine behind the `placsp-sync` binary.
//! Keep the crate root minimal; implementation and tests live in their modules.
//!
//! ## Overview
//!
//! The Spanish public procurement platform publishes its contractor-profile feed as
//! monthly ZIP archives of Atom documents. A sync pass turns them into one
//! deduplicated tender dataset:
//!
//! - [`downloader`] - Enumerates periods, probes archive filename patterns and downloads archives
//! - [`extractor`] - Reads the feed document (and its embedded next page) from an archive
//! - [`parser`] - Parses Atom documents and extracts labeled tender fields from entry summaries
//! - [`store`] - Identifier-keyed merge of tenders across periods
//! - [`classifier`] - Decides whether a tender is still open
//! - [`writer`] - Writes the full history and the active subset
//! - [`sync`] - Runs the whole pass
//! - [`config`] / [`cli`] - Configuration sources and command-line entry point
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use placsp_sync::{config::ResolvedConfig, downloader::HttpTransport, errors::AppResult, sync};
//!
//! # async fn example() -> AppResult<()> {
//! let config = ResolvedConfig::from_env()?;
//! let transport = HttpTransport::new(&config)?;
//! let today = chrono::Local::now().date_naive();
//! let report = sync::run_sync(&transport, &config, today).await?;
//! println!("{} unique tenders", report.unique_tenders);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod cli;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod errors;
pub mod extractor;
pub mod models;
pub mod parser;
pub mod store;
pub mod sync;
pub mod ui;
pub mod utils;
pub mod writer;
