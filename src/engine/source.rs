use tracing::{info, warn};

use crate::api::{ApiError, Backend};
use crate::models::{Book, ContentMode, PageContent};

/// What to do when the page endpoint fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Download the whole text and paginate it locally.
    FullText,
    /// Report the failure; the caller already holds the text.
    None,
}

#[derive(Debug)]
pub enum ContentLoad {
    Page(PageContent),
    FullText(String),
    Failed(ApiError),
}

/// Load `page` of `book`: the page endpoint first, then the full text if
/// `fallback` allows it.
pub fn resolve(
    backend: &dyn Backend,
    book: &Book,
    page: u32,
    words_per_page: u32,
    fallback: Fallback,
) -> ContentLoad {
    let server_error = match book.key() {
        Some(key) => match backend.fetch_page(&key, page, words_per_page) {
            Ok(content) => return ContentLoad::Page(content),
            Err(err) => err,
        },
        None => ApiError::NoTextSource(book.title.clone()),
    };

    match fallback {
        Fallback::None => {
            warn!(page, error = %server_error, "page request failed");
            ContentLoad::Failed(server_error)
        }
        Fallback::FullText => {
            warn!(
                page,
                error = %server_error,
                "page endpoint unavailable, falling back to full text"
            );
            match backend.fetch_full_text(book) {
                Ok(text) => {
                    info!(bytes = text.len(), "loaded full text for local pagination");
                    ContentLoad::FullText(text)
                }
                Err(err) => {
                    warn!(error = %err, "full text unavailable");
                    ContentLoad::Failed(err)
                }
            }
        }
    }
}

/// Mode after a load arrives. The first success decides; once local, always
/// local for the rest of the load.
pub fn next_mode(current: Option<ContentMode>, load: &ContentLoad) -> Option<ContentMode> {
    match (current, load) {
        (Some(ContentMode::LocalPaginated), _) => Some(ContentMode::LocalPaginated),
        (_, ContentLoad::FullText(_)) => Some(ContentMode::LocalPaginated),
        (None, ContentLoad::Page(_)) => Some(ContentMode::ServerPaginated),
        (current, _) => current,
    }
}
