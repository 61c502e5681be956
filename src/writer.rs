use crate::classifier::is_active;
use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult};
use crate::models::Tender;
use crate::store::MergeStore;
use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Record counts of the artifacts written by [`write_outputs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSummary {
    pub full_history: usize,
    /// `None` when the active subset is disabled
    pub active: Option<usize>,
}

fn part_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".part");
    PathBuf::from(tmp)
}

/// Writes `path` through a `.part` sibling that is renamed into place once the
/// body is complete, so readers never observe a truncated artifact.
fn write_atomically<F>(path: &Path, write_body: F) -> AppResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> AppResult<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::IoError(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let tmp_path = part_path(path);
    let result = (|| -> AppResult<()> {
        let file = File::create(&tmp_path).map_err(|e| {
            AppError::IoError(format!(
                "Failed to create temp file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;
        let mut writer = BufWriter::new(file);
        write_body(&mut writer)?;
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp_path, path).map_err(|e| {
            AppError::IoError(format!(
                "Failed to rename temp file {} to {}: {}",
                tmp_path.display(),
                path.display(),
                e
            ))
        })
    })();

    if result.is_err() && tmp_path.exists() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            warn!(file_path = %tmp_path.display(), error = %e, "Failed to remove temp file");
        }
    }
    result
}

/// Writes one JSON record per line (no enclosing array). Returns the record count.
pub fn write_full_history<'a, I>(path: &Path, tenders: I) -> AppResult<usize>
where
    I: IntoIterator<Item = &'a Tender>,
{
    let mut count = 0;
    write_atomically(path, |writer| {
        for tender in tenders {
            serde_json::to_writer(&mut *writer, tender)?;
            writer.write_all(b"\n")?;
            count += 1;
        }
        Ok(())
    })?;
    Ok(count)
}

/// Writes `tenders` as a single JSON array. Returns the record count.
pub fn write_active(path: &Path, tenders: &[&Tender]) -> AppResult<usize> {
    write_atomically(path, |writer| {
        serde_json::to_writer(&mut *writer, tenders)?;
        Ok(())
    })?;
    Ok(tenders.len())
}

/// Writes the full history and, when enabled, the active subset.
///
/// Both writes are attempted even if the first fails; the first error is returned.
pub fn write_outputs(
    config: &ResolvedConfig,
    store: &MergeStore,
    today: NaiveDate,
) -> AppResult<OutputSummary> {
    let history_path = config.full_history_path();
    let history = write_full_history(&history_path, store.values());
    match &history {
        Ok(count) => info!(path = %history_path.display(), records = *count, "Saved full history"),
        Err(e) => warn!(path = %history_path.display(), error = %e, "Failed to save full history"),
    }

    let active = if config.active_only {
        let active_path = config.active_path();
        let active_tenders: Vec<&Tender> = store.values().filter(|t| is_active(t, today)).collect();
        let result = write_active(&active_path, &active_tenders);
        match &result {
            Ok(count) => info!(path = %active_path.display(), records = *count, "Saved active tenders"),
            Err(e) => warn!(path = %active_path.display(), error = %e, "Failed to save active tenders"),
        }
        Some(result)
    } else {
        None
    };

    Ok(OutputSummary {
        full_history: history?,
        active: active.transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tender(id: &str, status: &str, deadline: &str) -> Tender {
        Tender {
            id: id.to_string(),
            title: format!("Licitación {id}"),
            contracting_body: "Ayuntamiento de Ávila".to_string(),
            status: status.to_string(),
            amount: Some(1000.0),
            cpv: String::new(),
            contract_type: String::new(),
            region: String::new(),
            province: String::new(),
            publication_date: String::new(),
            deadline_text: deadline.to_string(),
            link: String::new(),
            source: "PLACSP".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn config_in(dir: &Path, active_only: bool) -> ResolvedConfig {
        ResolvedConfig {
            output_dir: dir.join("data"),
            active_only,
            ..ResolvedConfig::default()
        }
    }

    fn sample_store() -> MergeStore {
        let mut store = MergeStore::new();
        store.upsert(tender("a", "Publicada", "01/01/2099"));
        store.upsert(tender("b", "Anulada", ""));
        store.upsert(tender("c", "Publicada", "01/01/2000"));
        store
    }

    #[test]
    fn test_full_history_is_one_record_per_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tenders.ndjson");
        let tenders = [tender("a", "", ""), tender("b", "", "")];

        let count = write_full_history(&path, tenders.iter()).unwrap();

        assert_eq!(count, 2);
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Tender = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.id, "a");
        // Non-ASCII stays verbatim
        assert!(lines[0].contains("Ávila"));
        assert!(!path.with_extension("ndjson.part").exists());
    }

    #[test]
    fn test_active_file_is_json_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/tenders-active.json");
        let t = tender("a", "Publicada", "");

        write_active(&path, &[&t]).unwrap();

        let parsed: Vec<Tender> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, vec![t]);
    }

    #[test]
    fn test_write_outputs_filters_active() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path(), true);

        let summary = write_outputs(&config, &sample_store(), today()).unwrap();

        assert_eq!(summary.full_history, 3);
        assert_eq!(summary.active, Some(1));
        let active: Vec<Tender> =
            serde_json::from_str(&fs::read_to_string(config.active_path()).unwrap()).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "a");
    }

    #[test]
    fn test_write_outputs_without_active_subset() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path(), false);

        let summary = write_outputs(&config, &sample_store(), today()).unwrap();

        assert_eq!(summary.active, None);
        assert!(config.full_history_path().exists());
        assert!(!config.active_path().exists());
    }

    #[test]
    fn test_active_written_even_if_history_fails() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(dir.path(), true);
        // A directory where the history file should go makes the rename fail
        config.full_history_file = "blocked".to_string();
        fs::create_dir_all(config.full_history_path().join("inner")).unwrap();

        let result = write_outputs(&config, &sample_store(), today());

        assert!(result.is_err());
        assert!(config.active_path().exists());
    }

    #[test]
    fn test_outputs_are_byte_identical_across_runs() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path(), true);

        write_outputs(&config, &sample_store(), today()).unwrap();
        let history_1 = fs::read(config.full_history_path()).unwrap();
        let active_1 = fs::read(config.active_path()).unwrap();

        write_outputs(&config, &sample_store(), today()).unwrap();
        assert_eq!(fs::read(config.full_history_path()).unwrap(), history_1);
        assert_eq!(fs::read(config.active_path()).unwrap(), active_1);
    }
}
