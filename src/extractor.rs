use crate::constants::FEED_EXTENSIONS;
use crate::errors::{AppError, AppResult};
use crate::models::FeedEntry;
use crate::parser::parse_feed_bytes;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::debug;
use url::Url;
use zip::ZipArchive;

type Archive<'a> = ZipArchive<Cursor<&'a [u8]>>;

const MAX_SIZE_HINT: u64 = 64 << 20;

/// Returns `true` if the member name has a feed document extension (`.atom` or `.xml`).
fn is_feed_document(name: &str) -> bool {
    if name.ends_with('/') {
        return false;
    }
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| FEED_EXTENSIONS.iter().any(|f| ext.eq_ignore_ascii_case(f)))
}

/// Picks the primary feed document: the first member, in archive order, whose
/// name has a feed extension.
pub fn find_feed_document<'a, I>(names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().find(|name| is_feed_document(name))
}

/// Member names in central directory order.
fn member_names(archive: &mut Archive<'_>) -> Vec<String> {
    (0..archive.len())
        .filter_map(|i| archive.by_index_raw(i).ok().map(|f| f.name().to_string()))
        .collect()
}

/// Buffer preallocation for a member whose header declares `declared` bytes.
/// Header sizes are untrusted, so the hint is capped.
fn capacity_hint(declared: u64) -> usize {
    declared.min(MAX_SIZE_HINT) as usize
}

fn read_member(archive: &mut Archive<'_>, name: &str) -> AppResult<Vec<u8>> {
    let mut file = archive.by_name(name)?;
    let mut content = Vec::with_capacity(capacity_hint(file.size()));
    file.read_to_end(&mut content).map_err(|e| {
        AppError::ArchiveError(format!("Failed to read {name} from archive: {e}"))
    })?;
    Ok(content)
}

/// Maps a `rel="next"` href onto an archive member.
///
/// The href is tried verbatim first. Feeds often publish the next page as an
/// absolute URL, so its final path segment is then matched against member file names.
fn resolve_next_member(names: &[String], href: &str) -> Option<String> {
    if names.iter().any(|n| n == href) {
        return Some(href.to_string());
    }

    let file_name = match Url::parse(href) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut s| s.next_back())
            .map(str::to_string),
        Err(_) => href.rsplit('/').next().map(str::to_string),
    }
    .filter(|f| !f.is_empty())?;

    names
        .iter()
        .find(|n| n.rsplit('/').next() == Some(file_name.as_str()))
        .cloned()
}

/// Extracts the Atom entries of a monthly archive held in memory.
///
/// Reads the primary feed document and, when it declares a `rel="next"` page,
/// the linked document from the same archive. Only one page of pagination is
/// followed. An archive without a feed document yields no entries; a missing or
/// unreadable next page is skipped and leaves the primary entries intact.
///
/// # Errors
///
/// Returns `ArchiveError` if the bytes are not a readable ZIP archive and
/// `ParseError` if the primary feed document is not well-formed XML.
pub fn extract_entries(archive_bytes: &[u8]) -> AppResult<Vec<FeedEntry>> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))?;
    let names = member_names(&mut archive);

    let Some(primary) = find_feed_document(names.iter().map(String::as_str)) else {
        debug!(members = names.len(), "Archive has no feed document");
        return Ok(Vec::new());
    };
    let primary = primary.to_string();

    let page = parse_feed_bytes(&read_member(&mut archive, &primary)?)?;
    let mut entries = page.entries;

    let Some(href) = page.next_href else {
        return Ok(entries);
    };

    match resolve_next_member(&names, &href) {
        Some(next) if next != primary => {
            match read_member(&mut archive, &next).and_then(|bytes| parse_feed_bytes(&bytes)) {
                Ok(next_page) => {
                    debug!(
                        document = %next,
                        entries = next_page.entries.len(),
                        "Read next feed page"
                    );
                    entries.extend(next_page.entries);
                }
                Err(e) => debug!(document = %next, error = %e, "Skipping unreadable next page"),
            }
        }
        Some(_) => debug!(href = %href, "Next page points back at the primary document"),
        None => debug!(href = %href, "Next page not present in archive"),
    }

    Ok(entries)
}
