use crate::constants::*;
use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Resolved configuration with all values filled in (no Options).
///
/// Deserialized from TOML with every key optional; missing keys take the
/// defaults below. Unknown keys are rejected to catch typos.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    /// First year whose monthly archives are requested
    pub start_year: i32,
    /// Whether the active-tender subset is written
    pub active_only: bool,

    // Outputs
    /// Directory receiving both artifacts
    pub output_dir: PathBuf,
    /// File name of the one-record-per-line history
    pub full_history_file: String,
    /// File name of the active subset JSON array
    pub active_file: String,

    // Network
    /// Syndication endpoint the archive filenames are joined onto
    pub base_url: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Timeout for the header-only existence probes
    pub probe_timeout_secs: u64,
    /// Timeout for archive downloads
    pub fetch_timeout_secs: u64,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            active_only: true,
            output_dir: PathBuf::from(OUTPUT_DIR),
            full_history_file: FULL_HISTORY_FILE.to_string(),
            active_file: ACTIVE_FILE.to_string(),
            base_url: BASE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            probe_timeout_secs: PROBE_TIMEOUT_SECS,
            fetch_timeout_secs: FETCH_TIMEOUT_SECS,
        }
    }
}

impl ResolvedConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the TOML is malformed, unknown keys are present,
    /// or a value fails [`ResolvedConfig::validate`].
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ResolvedConfig = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `LICITAI_START_YEAR` and `LICITAI_ACTIVE_ONLY`.
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// `LICITAI_ACTIVE_ONLY` enables the active subset only when it equals
    /// `true` (case-insensitive); any other value disables it.
    pub fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(year) = lookup(ENV_START_YEAR) {
            self.start_year = year.trim().parse().map_err(|e| {
                AppError::InvalidInput(format!("{ENV_START_YEAR} must be a year, got '{year}': {e}"))
            })?;
        }
        if let Some(flag) = lookup(ENV_ACTIVE_ONLY) {
            self.active_only = flag.trim().eq_ignore_ascii_case("true");
        }
        Ok(())
    }

    /// Rejects zero timeouts, empty file names and an unparsable base URL.
    pub fn validate(&self) -> AppResult<()> {
        if self.probe_timeout_secs == 0 || self.fetch_timeout_secs == 0 {
            return Err(AppError::InvalidInput(
                "Timeouts must be greater than 0".into(),
            ));
        }
        if self.full_history_file.trim().is_empty() || self.active_file.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Output file names must not be empty".into(),
            ));
        }
        self.base_url()?;
        Ok(())
    }

    /// Parsed base URL, with a trailing slash so filenames join beneath it.
    pub fn base_url(&self) -> AppResult<Url> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Url::parse(&base)?)
    }

    pub fn full_history_path(&self) -> PathBuf {
        self.output_dir.join(&self.full_history_file)
    }

    pub fn active_path(&self) -> PathBuf {
        self.output_dir.join(&self.active_file)
    }
}
