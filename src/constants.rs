// Syndication 643: complete contractor-profile tenders
pub const BASE_URL: &str = "https://contrataciondelestado.es/sindicacion/sindicacion_643/";

// Archive filename patterns, highest priority first. `{ym}` is the YYYYMM period.
pub const ZIP_PATTERNS: &[&str] = &[
    "licitacionesPerfilesContratanteCompleto3_{ym}.zip",
    "licitacionesPerfilesContratanteCompleta3_{ym}.zip",
    "licitacionesPerfilesContratanteCompleto_{ym}.zip",
    "licitacionesPerfilesContratanteCompleta_{ym}.zip",
];
pub const PERIOD_PLACEHOLDER: &str = "{ym}";

// HTTP
pub const USER_AGENT: &str = "LicitApp-sync/1.0";
pub const PROBE_TIMEOUT_SECS: u64 = 30;
pub const FETCH_TIMEOUT_SECS: u64 = 120;

// Records
pub const SOURCE_NAME: &str = "PLACSP";
pub const DEFAULT_START_YEAR: i32 = 2012;

// Feed document extensions inside an archive
pub const FEED_EXTENSIONS: &[&str] = &["atom", "xml"];

// Output artifacts
pub const OUTPUT_DIR: &str = "data";
pub const FULL_HISTORY_FILE: &str = "tenders.ndjson";
pub const ACTIVE_FILE: &str = "tenders-active.json";

// Environment overrides
pub const ENV_START_YEAR: &str = "LICITAI_START_YEAR";
pub const ENV_ACTIVE_ONLY: &str = "LICITAI_ACTIVE_ONLY";
