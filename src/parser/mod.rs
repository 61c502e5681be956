mod fields;
mod xml_parser;

// Re-export public API
pub use fields::{extract_label, parse_amount, parse_entry, LabelField, LabelRule, LABEL_RULES};
pub use xml_parser::parse_feed_bytes;
