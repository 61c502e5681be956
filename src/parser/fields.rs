use crate::constants::SOURCE_NAME;
use crate::models::{FeedEntry, Tender};
use regex::Regex;
use std::sync::OnceLock;

/// Tender fields carried as `Label: value` text in an entry summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelField {
    Identifier,
    ContractingBody,
    Status,
    Amount,
    Cpv,
    ContractType,
    Region,
    Province,
    PublicationDate,
    Deadline,
}

/// One row of the label table: the field and the case-insensitive pattern whose
/// first capture group is the value.
pub struct LabelRule {
    pub field: LabelField,
    pub pattern: &'static str,
}

/// Label → pattern table for the summary text published by the platform.
///
/// Free-text values run up to the end of the line or the next tag.
pub const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        field: LabelField::Identifier,
        pattern: r"Identificador:\s*([^\n<]+)",
    },
    LabelRule {
        field: LabelField::ContractingBody,
        pattern: r"Órgano de Contratación:\s*([^\n<]+)",
    },
    LabelRule {
        field: LabelField::Status,
        pattern: r"Estado:\s*([^\n<]+)",
    },
    LabelRule {
        field: LabelField::Amount,
        pattern: r"Importe(?:\s+de\s+Licitación)?:\s*([0-9.,]+)",
    },
    LabelRule {
        field: LabelField::Cpv,
        pattern: r"CPV:\s*([0-9\- ]+)",
    },
    LabelRule {
        field: LabelField::ContractType,
        pattern: r"Tipo de Contrato:\s*([^\n<]+)",
    },
    LabelRule {
        field: LabelField::Region,
        pattern: r"CCAA:\s*([^\n<]+)",
    },
    LabelRule {
        field: LabelField::Province,
        pattern: r"Provincia:\s*([^\n<]+)",
    },
    LabelRule {
        field: LabelField::PublicationDate,
        pattern: r"Fecha de Publicación:\s*([0-9/\-]+)",
    },
    LabelRule {
        field: LabelField::Deadline,
        pattern: r"Fecha Límite de Presentación:\s*([0-9/\-: ]+)",
    },
];

/// Label regexes compiled once, in table order.
static COMPILED_RULES: OnceLock<Vec<(LabelField, Regex)>> = OnceLock::new();

fn compiled_rules() -> &'static [(LabelField, Regex)] {
    COMPILED_RULES.get_or_init(|| {
        LABEL_RULES
            .iter()
            .map(|rule| {
                let regex = Regex::new(&format!("(?i){}", rule.pattern))
                    .expect("LABEL_RULES patterns are valid regexes");
                (rule.field, regex)
            })
            .collect()
    })
}

/// Returns the trimmed value following `field`'s label in `summary`, or an empty
/// string when the label is absent.
pub fn extract_label(summary: &str, field: LabelField) -> String {
    compiled_rules()
        .iter()
        .find(|(f, _)| *f == field)
        .and_then(|(_, regex)| regex.captures(summary))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Parses a Spanish-formatted amount (`1.234,56`): periods are thousands
/// separators and the comma is the decimal mark.
///
/// Returns `None` for empty or unparsable text and for negative or non-finite values.
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let normalized = text.replace('.', "").replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

/// Converts a feed entry into a tender record.
///
/// Never fails: missing labels become empty strings and an unparsable amount
/// becomes `None`. The id falls back from the `Identificador` label to the entry
/// link and then to the title; it is empty only when all three are.
pub fn parse_entry(entry: &FeedEntry) -> Tender {
    let title = entry.title.clone().unwrap_or_default();
    let link = entry.link.clone().unwrap_or_default();
    let body = entry.body();
    let label = |field| extract_label(body, field);

    let id = [label(LabelField::Identifier), link.clone(), title.clone()]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default();

    Tender {
        id,
        title,
        contracting_body: label(LabelField::ContractingBody),
        status: label(LabelField::Status),
        amount: parse_amount(&label(LabelField::Amount)),
        cpv: label(LabelField::Cpv),
        contract_type: label(LabelField::ContractType),
        region: label(LabelField::Region),
        province: label(LabelField::Province),
        publication_date: label(LabelField::PublicationDate),
        deadline_text: label(LabelField::Deadline),
        link,
        source: SOURCE_NAME.to_string(),
    }
}
