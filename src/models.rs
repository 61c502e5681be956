use serde::{Deserialize, Serialize};

/// One `<entry>` read from an Atom feed document, before field extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
}

impl FeedEntry {
    /// Free-text body carrying the labeled fields: `summary`, or `content` when
    /// the entry has no summary.
    pub fn body(&self) -> &str {
        self.summary
            .as_deref()
            .or(self.content.as_deref())
            .unwrap_or("")
    }
}

/// A parsed feed document: its root-level entries plus the `rel="next"` href.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedPage {
    pub entries: Vec<FeedEntry>,
    pub next_href: Option<String>,
}

/// Normalized record for one procurement opportunity.
///
/// Serialized keys keep the names consumed by the alerting job and the browse UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tender {
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "organo")]
    pub contracting_body: String,
    #[serde(rename = "estado")]
    pub status: String,
    #[serde(rename = "importe")]
    pub amount: Option<f64>,
    pub cpv: String,
    #[serde(rename = "tipo")]
    pub contract_type: String,
    #[serde(rename = "ccaa")]
    pub region: String,
    #[serde(rename = "provincia")]
    pub province: String,
    #[serde(rename = "fechaPublicacion")]
    pub publication_date: String,
    #[serde(rename = "fechaLimite")]
    pub deadline_text: String,
    #[serde(rename = "enlace")]
    pub link: String,
    #[serde(rename = "fuente")]
    pub source: String,
}
