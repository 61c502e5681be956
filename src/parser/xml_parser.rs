use crate::errors::{AppError, AppResult};
use crate::models::{FeedEntry, FeedPage};
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::io::Cursor;

// Element depth of the feed root's children and of an entry's children
const ROOT_CHILD_DEPTH: usize = 2;
const ENTRY_CHILD_DEPTH: usize = 3;

/// Represents the current text field being captured within an entry
enum EntryField {
    Title,
    Summary,
    Content,
}

/// Builder for constructing FeedEntry structs during XML parsing.
/// Text may arrive in several events (entity references split text nodes),
/// so fields are appended to rather than replaced.
struct EntryBuilder {
    title: Option<String>,
    link: Option<String>,
    summary: Option<String>,
    content: Option<String>,
    current_field: Option<EntryField>,
}

impl EntryBuilder {
    fn new() -> Self {
        Self {
            title: None,
            link: None,
            summary: None,
            content: None,
            current_field: None,
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn append_text(&mut self, text: &str) {
        let slot = match self.current_field {
            Some(EntryField::Title) => &mut self.title,
            Some(EntryField::Summary) => &mut self.summary,
            Some(EntryField::Content) => &mut self.content,
            None => return,
        };
        slot.get_or_insert_with(String::new).push_str(text);
    }

    /// Keeps the first link of the entry; later links (enclosures, alternates) are ignored.
    fn set_link(&mut self, href: String) {
        if self.link.is_none() {
            self.link = Some(href);
        }
    }

    fn set_current_field(&mut self, field: EntryField) {
        self.current_field = Some(field);
    }

    fn clear_current_field(&mut self) {
        self.current_field = None;
    }

    fn is_capturing(&self) -> bool {
        self.current_field.is_some()
    }

    fn build(&mut self) -> FeedEntry {
        fn trimmed(value: Option<String>) -> Option<String> {
            value.map(|v| v.trim().to_string())
        }

        FeedEntry {
            title: trimmed(self.title.take()),
            link: self.link.take(),
            summary: trimmed(self.summary.take()),
            content: trimmed(self.content.take()),
        }
    }
}

/// Returns the unescaped value of the attribute with the given local name.
fn attribute(element: &BytesStart, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.local_name().as_ref() == name)
        .map(|a| {
            let raw = String::from_utf8_lossy(&a.value);
            unescape(&raw)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| raw.into_owned())
        })
}

fn is_next_link(element: &BytesStart) -> bool {
    attribute(element, b"rel").is_some_and(|rel| rel == "next")
}

/// Parses an Atom feed document provided as bytes.
///
/// Only `<entry>` elements that are direct children of the root are read, and
/// only the root's first `<link rel="next">` is reported as the next page.
/// Elements are matched by local name, so default-namespaced and prefixed Atom
/// are both accepted.
///
/// # Errors
///
/// Returns `ParseError` if the document is not well-formed XML.
pub fn parse_feed_bytes(content: &[u8]) -> AppResult<FeedPage> {
    let cursor = Cursor::new(content);
    let mut reader = Reader::from_reader(cursor);

    let mut buf = Vec::with_capacity(8192);
    let mut page = FeedPage::default();

    let mut depth = 0usize;
    let mut inside_entry = false;
    let mut builder = EntryBuilder::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                depth += 1;
                match (depth, e.local_name().as_ref()) {
                    (ROOT_CHILD_DEPTH, b"entry") => {
                        inside_entry = true;
                        builder.reset();
                    }
                    (ROOT_CHILD_DEPTH, b"link") if page.next_href.is_none() && is_next_link(&e) => {
                        page.next_href = attribute(&e, b"href");
                    }
                    (ENTRY_CHILD_DEPTH, name) if inside_entry => match name {
                        b"title" => builder.set_current_field(EntryField::Title),
                        b"summary" => builder.set_current_field(EntryField::Summary),
                        b"content" => builder.set_current_field(EntryField::Content),
                        b"link" => {
                            if let Some(href) = attribute(&e, b"href") {
                                builder.set_link(href);
                            }
                        }
                        _ => {}
                    },
                    _ => {}
                }
            }
            Event::Empty(e) => match (depth + 1, e.local_name().as_ref()) {
                (ROOT_CHILD_DEPTH, b"link") if page.next_href.is_none() && is_next_link(&e) => {
                    page.next_href = attribute(&e, b"href");
                }
                (ENTRY_CHILD_DEPTH, b"link") if inside_entry => {
                    if let Some(href) = attribute(&e, b"href") {
                        builder.set_link(href);
                    }
                }
                _ => {}
            },
            Event::End(e) => {
                match (depth, e.local_name().as_ref()) {
                    (ROOT_CHILD_DEPTH, b"entry") if inside_entry => {
                        inside_entry = false;
                        page.entries.push(builder.build());
                        builder.reset();
                    }
                    (ENTRY_CHILD_DEPTH, b"title" | b"summary" | b"content") if inside_entry => {
                        builder.clear_current_field();
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(e) if inside_entry && builder.is_capturing() => {
                let txt = e
                    .decode()
                    .map_err(|e| AppError::ParseError(format!("Failed to decode XML text: {e}")))?;
                builder.append_text(&txt);
            }
            Event::CData(e) if inside_entry && builder.is_capturing() => {
                builder.append_text(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::GeneralRef(e) if inside_entry && builder.is_capturing() => {
                let char_ref = e.resolve_char_ref().map_err(|e| {
                    AppError::ParseError(format!("Invalid character reference: {e}"))
                })?;
                if let Some(ch) = char_ref {
                    builder.append_text(ch.encode_utf8(&mut [0u8; 4]));
                } else {
                    let name = e.decode().map_err(|e| {
                        AppError::ParseError(format!("Failed to decode entity reference: {e}"))
                    })?;
                    match resolve_predefined_entity(&name) {
                        Some(resolved) => builder.append_text(resolved),
                        None => builder.append_text(&format!("&{name};")),
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(page)
}
