use crate::models::{ContentMode, PageContent};
use crate::pagination::{self, DEFAULT_WORDS_PER_PAGE};

/// Local books with more pages than this still go to the server for each page.
pub const SERVER_DELEGATION_THRESHOLD: u32 = 50;

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Nothing to do: no pages yet, or already on the requested page.
    Unchanged,
    /// The page was sliced from the local pages and is now displayed.
    Displayed(u32),
    /// The page must be fetched; state changes when the response arrives.
    Fetch(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    current_page: u32,
    total_pages: u32,
    words_per_page: u32,
    pages: Vec<String>,
    mode: Option<ContentMode>,
    content: String,
    scroll_offset: u16,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS_PER_PAGE)
    }
}

impl PaginationState {
    pub fn new(words_per_page: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            words_per_page: words_per_page.max(1),
            pages: Vec::new(),
            mode: None,
            content: String::new(),
            scroll_offset: 0,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn words_per_page(&self) -> u32 {
        self.words_per_page
    }

    pub fn mode(&self) -> Option<ContentMode> {
        self.mode
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn has_local_pages(&self) -> bool {
        !self.pages.is_empty()
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll_offset = (self.scroll_offset as i32 + delta).clamp(0, u16::MAX as i32) as u16;
    }

    pub(crate) fn set_mode(&mut self, mode: ContentMode) {
        self.mode = Some(mode);
    }

    /// Clamp any requested page into `[1, max(total_pages, 1)]`.
    pub fn clamp(&self, requested: i64) -> u32 {
        requested.clamp(1, self.total_pages.max(1) as i64) as u32
    }

    /// Whether page requests have to go through the server.
    pub fn delegates_to_server(&self) -> bool {
        match self.mode {
            Some(ContentMode::ServerPaginated) => true,
            Some(ContentMode::LocalPaginated) => self.total_pages > SERVER_DELEGATION_THRESHOLD,
            None => false,
        }
    }

    pub fn go_to_page(&mut self, requested: i64) -> Navigation {
        if self.total_pages == 0 {
            return Navigation::Unchanged;
        }
        let page = self.clamp(requested);
        if page == self.current_page {
            return Navigation::Unchanged;
        }
        if self.delegates_to_server() {
            return Navigation::Fetch(page);
        }
        self.show_local(page)
    }

    pub fn go_by(&mut self, delta: i64) -> Navigation {
        self.go_to_page(self.current_page as i64 + delta)
    }

    /// Display a page from the local pages, clamped to the pages held.
    pub fn show_local(&mut self, requested: u32) -> Navigation {
        let held = self.pages.len() as u32;
        let page = requested.clamp(1, held.max(1));
        let Some(content) = self.pages.get((page - 1) as usize) else {
            return Navigation::Unchanged;
        };
        self.content = content.clone();
        self.total_pages = held;
        self.current_page = page;
        self.scroll_offset = 0;
        Navigation::Displayed(page)
    }

    /// Apply a page delivered by the server. While local pages are held they
    /// define the page range and the server's page count is ignored.
    pub fn apply_server_page(&mut self, page: PageContent) {
        let local = self.mode == Some(ContentMode::LocalPaginated) && self.has_local_pages();
        self.total_pages = if local {
            self.pages.len() as u32
        } else {
            page.total_pages
        };
        self.current_page = self.clamp(page.current_page as i64);
        self.content = page.content;
        self.scroll_offset = 0;
    }

    /// Paginate a full text and display `requested_page` of it.
    pub fn load_text(&mut self, text: &str, requested_page: u32) -> Navigation {
        self.pages = pagination::paginate(text, self.words_per_page);
        self.total_pages = self.pages.len() as u32;
        if self.pages.is_empty() {
            self.current_page = 1;
            self.content.clear();
            return Navigation::Unchanged;
        }
        self.show_local(requested_page)
    }

    /// Change the pagination granularity.
    ///
    /// Local pages are rebuilt in full and the current page is clamped into the
    /// new range. Server-paginated books refetch the current page.
    pub fn set_words_per_page(&mut self, words_per_page: u32) -> Navigation {
        let words_per_page = words_per_page.max(1);
        if words_per_page == self.words_per_page {
            return Navigation::Unchanged;
        }
        self.words_per_page = words_per_page;

        if self.has_local_pages() {
            let text = self.pages.join(" ");
            let page = self.current_page;
            self.load_text(&text, page);
            if self.delegates_to_server() {
                return Navigation::Fetch(self.current_page);
            }
            return Navigation::Displayed(self.current_page);
        }
        match self.mode {
            Some(ContentMode::ServerPaginated) => Navigation::Fetch(self.current_page),
            _ => Navigation::Unchanged,
        }
    }
}
