use crate::models::Tender;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Lower-cased status fragments marking a tender as no longer open.
const INACTIVE_STATUS_TOKENS: &[&str] = &["anulada", "suspend"];

static DIGIT_GROUPS: OnceLock<Regex> = OnceLock::new();

/// Reads the first three integer groups of `text` as day, month and year.
///
/// Returns `None` when fewer than three groups exist or they do not form a
/// calendar date.
pub fn parse_deadline(text: &str) -> Option<NaiveDate> {
    let digits = DIGIT_GROUPS
        .get_or_init(|| Regex::new(r"[0-9]+").expect("digit group pattern is a valid regex"));

    let mut groups = digits.find_iter(text).map(|m| m.as_str());
    let day: u32 = groups.next()?.parse().ok()?;
    let month: u32 = groups.next()?.parse().ok()?;
    let year: i32 = groups.next()?.parse().ok()?;
    if !(1..=9999).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Decides whether a tender is still open as of `today`.
///
/// Inactive when the status says it was annulled or suspended, or when the
/// deadline parses to a date before `today`. Anything else, including a missing
/// or unreadable deadline, counts as active.
pub fn is_active(tender: &Tender, today: NaiveDate) -> bool {
    let status = tender.status.to_lowercase();
    if INACTIVE_STATUS_TOKENS.iter().any(|t| status.contains(t)) {
        return false;
    }

    match parse_deadline(&tender.deadline_text) {
        Some(deadline) => deadline >= today,
        None => true,
    }
}
