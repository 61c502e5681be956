//! Common test utilities for integration tests

use async_trait::async_trait;
use placsp_sync::downloader::{candidate_urls, PeriodToken, Transport};
use placsp_sync::errors::{AppError, AppResult};
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use std::sync::Mutex;
use url::Url;

#[allow(dead_code)]
pub const BASE_URL: &str = "https://feed.test/sindicacion/sindicacion_643/";

/// Builds an in-memory ZIP archive with the given (name, content) members, in order.
#[allow(dead_code)]
pub fn build_zip(files: &[(&str, &str)]) -> Vec<u8> {
    use zip::write::FileOptions;
    use zip::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (name, content) in files {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// One Atom `<entry>`; empty arguments omit the element.
#[allow(dead_code)]
pub fn atom_entry(title: &str, link: &str, summary: &str) -> String {
    let mut xml = String::from("  <entry>\n");
    if !title.is_empty() {
        xml.push_str(&format!("    <title>{title}</title>\n"));
    }
    if !link.is_empty() {
        xml.push_str(&format!("    <link href=\"{link}\"/>\n"));
    }
    if !summary.is_empty() {
        xml.push_str(&format!("    <summary type=\"text\">{summary}</summary>\n"));
    }
    xml.push_str("  </entry>\n");
    xml
}

/// An Atom feed document with the given entries and optional `rel="next"` href.
#[allow(dead_code)]
pub fn atom_feed(entries: &[String], next_href: Option<&str>) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<feed xmlns=\"http://www.w3.org/2005/Atom\">\n",
    );
    xml.push_str("  <title>Licitaciones</title>\n");
    if let Some(href) = next_href {
        xml.push_str(&format!("  <link rel=\"next\" href=\"{href}\"/>\n"));
    }
    for entry in entries {
        xml.push_str(entry);
    }
    xml.push_str("</feed>\n");
    xml
}

/// A summary body carrying the identifier, status and deadline labels.
#[allow(dead_code)]
pub fn summary(id: &str, status: &str, deadline: &str) -> String {
    format!(
        "Identificador: {id}\nÓrgano de Contratación: Ayuntamiento de Huesca\nEstado: {status}\nImporte: 1.000,00 EUR\nFecha Límite de Presentación: {deadline}"
    )
}

/// URL of the archive filename pattern at `pattern_index` for a period.
#[allow(dead_code)]
pub fn archive_url(year: i32, month: u32, pattern_index: usize) -> String {
    let base = Url::parse(BASE_URL).unwrap();
    candidate_urls(&base, PeriodToken::new(year, month))[pattern_index].to_string()
}

/// In-memory syndication endpoint.
///
/// Probes succeed for published and failing archives; fetching a failing
/// archive returns a network error. An offline feed errors on every probe.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeFeed {
    archives: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    offline: bool,
    probes: Mutex<Vec<String>>,
    fetches: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(mut self, url: String, bytes: Vec<u8>) -> Self {
        self.archives.insert(url, bytes);
        self
    }

    pub fn failing(mut self, url: String) -> Self {
        self.failing.insert(url);
        self
    }

    /// Every probe fails at the transport level.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeFeed {
    async fn exists(&self, url: &str) -> AppResult<bool> {
        self.probes.lock().unwrap().push(url.to_string());
        if self.offline {
            return Err(AppError::NetworkError("connection refused".to_string()));
        }
        Ok(self.archives.contains_key(url) || self.failing.contains(url))
    }

    async fn fetch(&self, url: &str) -> AppResult<Vec<u8>> {
        self.fetches.lock().unwrap().push(url.to_string());
        if self.failing.contains(url) {
            return Err(AppError::NetworkError(format!("timed out fetching {url}")));
        }
        self.archives
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
    }
}
