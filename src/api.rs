use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    ApiEnvelope, Book, BookKey, BookStatus, BookshelfEntry, PageContent, PageData, ProgressUpdate,
};

pub const DEFAULT_TEXT_STORAGE_URL: &str = "https://storage.googleapis.com/book_text_data/books";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("please log in to continue")]
    Unauthenticated,

    #[error("book '{0}' has no full-text URL or Gutenberg id")]
    NoTextSource(String),
}

/// Operations the reader needs from the book service.
pub trait Backend: Send + Sync {
    fn fetch_book(&self, key: &BookKey) -> Result<Book, ApiError>;

    fn fetch_page(
        &self,
        key: &BookKey,
        page: u32,
        words_per_page: u32,
    ) -> Result<PageContent, ApiError>;

    fn fetch_full_text(&self, book: &Book) -> Result<String, ApiError>;

    fn save_progress(&self, token: &str, update: &ProgressUpdate) -> Result<(), ApiError>;

    fn book_status(&self, token: &str, key: &BookKey) -> Result<BookStatus, ApiError>;

    fn add_to_bookshelf(&self, token: &str, entry: &BookshelfEntry) -> Result<(), ApiError>;
}

pub struct HttpBackend {
    client: reqwest::blocking::Client,
    api_base: String,
    text_storage_url: String,
}

impl HttpBackend {
    pub fn new(api_base: &str, text_storage_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tome/", env!("CARGO_PKG_VERSION")));
        if api_base.starts_with("http://127.0.0.1") || api_base.starts_with("http://localhost") {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            api_base: api_base.trim_end_matches('/').to_string(),
            text_storage_url: text_storage_url.trim_end_matches('/').to_string(),
        })
    }

    /// Where the raw text of `book` lives: its own `fullTextUrl`, or the
    /// storage bucket path derived from the Gutenberg id.
    pub fn full_text_url(&self, book: &Book) -> Result<String, ApiError> {
        if let Some(url) = book.full_text_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.to_string());
        }
        match book.gutenberg_id.as_deref() {
            Some(gutenberg_id) => Ok(format!(
                "{}/{}/full-text.txt",
                self.text_storage_url, gutenberg_id
            )),
            None => Err(ApiError::NoTextSource(book.title.clone())),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn get_envelope<T: DeserializeOwned>(
        &self,
        url: &str,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let envelope: ApiEnvelope<T> = response.json().map_err(|err| ApiError::Malformed {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        if !envelope.success {
            return Err(ApiError::Malformed {
                url: url.to_string(),
                reason: envelope
                    .message
                    .unwrap_or_else(|| "success flag not set".to_string()),
            });
        }
        envelope.data.ok_or_else(|| ApiError::Malformed {
            url: url.to_string(),
            reason: "missing data".to_string(),
        })
    }

    fn send_ok(&self, url: &str, request: reqwest::blocking::RequestBuilder) -> Result<(), ApiError> {
        let response = request.send()?;
        let status = response.status();
        match status.as_u16() {
            401 | 403 => Err(ApiError::Unauthenticated),
            _ if status.is_success() => Ok(()),
            code => Err(ApiError::Status {
                url: url.to_string(),
                status: code,
            }),
        }
    }
}

impl Backend for HttpBackend {
    fn fetch_book(&self, key: &BookKey) -> Result<Book, ApiError> {
        let full_url = self.url(&format!("/books/{key}/full"));
        debug!(url = %full_url, "fetching book metadata");
        match self.get_envelope::<Book>(&full_url, self.client.get(&full_url)) {
            Ok(book) => Ok(book),
            Err(err) => {
                debug!(error = %err, "full metadata endpoint failed, trying plain book endpoint");
                let url = self.url(&format!("/books/{key}"));
                self.get_envelope(&url, self.client.get(&url))
            }
        }
    }

    fn fetch_page(
        &self,
        key: &BookKey,
        page: u32,
        words_per_page: u32,
    ) -> Result<PageContent, ApiError> {
        let url = self.url(&format!("/books/{key}/content"));
        debug!(url = %url, page, words_per_page, "fetching page");
        let request = self.client.get(&url).query(&[
            ("page", page.to_string()),
            ("wordsPerPage", words_per_page.to_string()),
        ]);
        let data: PageData = self.get_envelope(&url, request)?;
        Ok(data.into())
    }

    fn fetch_full_text(&self, book: &Book) -> Result<String, ApiError> {
        let url = self.full_text_url(book)?;
        debug!(url = %url, "fetching full text");
        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(response.text()?)
    }

    fn save_progress(&self, token: &str, update: &ProgressUpdate) -> Result<(), ApiError> {
        if token.is_empty() {
            return Err(ApiError::Unauthenticated);
        }
        let url = self.url("/users/reading-progress");
        debug!(url = %url, page = update.current_page, "saving reading progress");
        self.send_ok(&url, self.client.post(&url).bearer_auth(token).json(update))
    }

    fn book_status(&self, token: &str, key: &BookKey) -> Result<BookStatus, ApiError> {
        if token.is_empty() {
            return Err(ApiError::Unauthenticated);
        }
        let url = self.url(&format!("/users/bookshelf/{key}/status"));
        self.get_envelope(&url, self.client.get(&url).bearer_auth(token))
    }

    fn add_to_bookshelf(&self, token: &str, entry: &BookshelfEntry) -> Result<(), ApiError> {
        if token.is_empty() {
            return Err(ApiError::Unauthenticated);
        }
        let url = self.url("/users/bookshelf");
        debug!(url = %url, shelf = %entry.shelf, "adding to bookshelf");
        self.send_ok(&url, self.client.post(&url).bearer_auth(token).json(entry))
    }
}
