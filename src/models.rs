use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Address used for every book-scoped request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookKey {
    Id(String),
    Gutenberg(String),
}

impl BookKey {
    pub fn as_str(&self) -> &str {
        match self {
            BookKey::Id(id) => id,
            BookKey::Gutenberg(id) => id,
        }
    }
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub gutenberg_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub full_text_url: Option<String>,
}

impl Book {
    /// Key used for content requests: the internal id when the backend gave
    /// one, the Gutenberg id otherwise.
    pub fn key(&self) -> Option<BookKey> {
        if !self.id.is_empty() {
            Some(BookKey::Id(self.id.clone()))
        } else {
            self.gutenberg_id.clone().map(BookKey::Gutenberg)
        }
    }
}

// The catalogue stores Gutenberg ids as numbers for some books and strings for others.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(u64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Str(s)) if !s.trim().is_empty() => Some(s),
        Some(Raw::Num(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Standard `{ success, data, message }` wrapper around backend payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub current_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageData {
    pub content: String,
    pub metadata: PageMetadata,
}

/// One server-paginated page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub content: String,
    pub current_page: u32,
    pub total_pages: u32,
}

impl From<PageData> for PageContent {
    fn from(data: PageData) -> Self {
        Self {
            content: data.content,
            current_page: data.metadata.current_page,
            total_pages: data.metadata.total_pages,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    ServerPaginated,
    LocalPaginated,
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentMode::ServerPaginated => f.write_str("server"),
            ContentMode::LocalPaginated => f.write_str("local"),
        }
    }
}

/// Body of the reading-progress submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub book_id: String,
    pub gutenberg_id: Option<String>,
    pub current_page: u32,
    pub progress: u32,
    pub reading_time: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookshelfEntry {
    pub book_id: String,
    pub gutenberg_id: Option<String>,
    pub shelf: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookStatus {
    pub in_bookshelf: bool,
    pub shelf: Option<String>,
    pub current_page: Option<u32>,
    pub progress: Option<u32>,
}
