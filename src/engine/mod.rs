//! Reader pagination and progress engine.
//!
//! [`BookReader`] owns all per-book reader state. User actions and backend
//! responses go in; state changes happen synchronously and any network work
//! comes back out as [`Command`]s for a [`worker::Worker`] to run. Timers are
//! polled through [`BookReader::tick`].

pub mod dock;
pub mod navigation;
pub mod session;
pub mod slider;
pub mod source;
pub mod worker;

use std::time::{Duration, Instant};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::models::{Book, BookKey, BookStatus, BookshelfEntry, ContentMode, ProgressUpdate};
use crate::pagination::DEFAULT_WORDS_PER_PAGE;
use crate::timer;

use dock::Dock;
use navigation::{Navigation, PaginationState};
use session::{ReadingSession, progress_percent};
use slider::SliderSync;
use source::{ContentLoad, Fallback};

pub const DEFAULT_SHELF: &str = "currently-reading";
pub const MESSAGE_LIFETIME: Duration = Duration::from_secs(3);

/// Network work requested by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchBook(BookKey),
    FetchContent {
        book: Book,
        page: u32,
        words_per_page: u32,
        fallback: Fallback,
    },
    SaveProgress {
        token: String,
        update: ProgressUpdate,
    },
    FetchStatus {
        token: String,
        key: BookKey,
    },
    AddToBookshelf {
        token: String,
        entry: BookshelfEntry,
    },
}

/// Result of a [`Command`], fed back through [`BookReader::apply`].
#[derive(Debug)]
pub enum Response {
    Book(Result<Book, ApiError>),
    Content {
        requested_page: u32,
        load: ContentLoad,
    },
    ProgressSaved(Result<ProgressUpdate, ApiError>),
    Status(Result<BookStatus, ApiError>),
    Shelved(Result<String, ApiError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Idle,
    LoadingBook,
    BookNotFound(String),
    LoadingContent,
    Ready,
    ContentUnavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub kind: MessageType,
    shown_at: Instant,
}

impl Message {
    pub fn expires_at(&self) -> Instant {
        self.shown_at + MESSAGE_LIFETIME
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReaderOptions {
    pub words_per_page: u32,
    pub initial_page: u32,
    pub auth_token: Option<String>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            words_per_page: DEFAULT_WORDS_PER_PAGE,
            initial_page: 1,
            auth_token: None,
        }
    }
}

pub struct BookReader {
    key: BookKey,
    book: Option<Book>,
    status: LoadStatus,
    pagination: PaginationState,
    session: ReadingSession,
    slider: SliderSync,
    dock: Dock,
    shelf_status: Option<BookStatus>,
    message: Option<Message>,
    options: ReaderOptions,
}

impl BookReader {
    pub fn new(key: BookKey, options: ReaderOptions) -> Self {
        Self {
            key,
            book: None,
            status: LoadStatus::Idle,
            pagination: PaginationState::new(options.words_per_page),
            session: ReadingSession::new(),
            slider: SliderSync::new(),
            dock: Dock::new(),
            shelf_status: None,
            message: None,
            options,
        }
    }

    pub fn key(&self) -> &BookKey {
        &self.key
    }

    pub fn book(&self) -> Option<&Book> {
        self.book.as_ref()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn session(&self) -> &ReadingSession {
        &self.session
    }

    pub fn slider(&self) -> &SliderSync {
        &self.slider
    }

    pub fn dock(&self) -> &Dock {
        &self.dock
    }

    pub fn shelf_status(&self) -> Option<&BookStatus> {
        self.shelf_status.as_ref()
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.options
            .auth_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }

    /// Text to show in the reading viewport. When content could not be loaded
    /// the book summary stands in for it.
    pub fn display_text(&self) -> Option<&str> {
        match self.status {
            LoadStatus::Ready => Some(self.pagination.content()),
            LoadStatus::ContentUnavailable(_) => {
                self.book.as_ref().and_then(|book| book.summary.as_deref())
            }
            _ => None,
        }
    }

    pub fn open(&mut self) -> Vec<Command> {
        self.status = LoadStatus::LoadingBook;
        vec![Command::FetchBook(self.key.clone())]
    }

    /// Switch to another book, discarding everything tied to the current one.
    pub fn open_book(&mut self, key: BookKey) -> Vec<Command> {
        self.teardown();
        let options = self.options.clone();
        *self = Self::new(key, options);
        self.open()
    }

    pub fn apply(&mut self, response: Response, now: Instant) -> Vec<Command> {
        match response {
            Response::Book(Ok(book)) => return self.on_book(book),
            Response::Book(Err(err)) => {
                warn!(key = %self.key, error = %err, "book lookup failed");
                self.status = LoadStatus::BookNotFound(err.to_string());
            }
            Response::Content {
                requested_page,
                load,
            } => self.on_content(requested_page, load),
            Response::ProgressSaved(Ok(update)) => {
                info!(
                    page = update.current_page,
                    progress = update.progress,
                    minutes = update.reading_time,
                    "reading progress saved"
                );
                self.set_message(
                    format!(
                        "Progress saved at {}: page {} ({}%)",
                        Local::now().format("%H:%M"),
                        update.current_page,
                        update.progress
                    ),
                    MessageType::Info,
                    now,
                );
            }
            Response::ProgressSaved(Err(ApiError::Unauthenticated)) => {
                self.set_message(
                    "Please log in to save your reading progress".to_string(),
                    MessageType::Warning,
                    now,
                );
            }
            Response::ProgressSaved(Err(err)) => {
                warn!(error = %err, "saving progress failed");
                self.set_message(
                    format!("Could not save progress: {err}"),
                    MessageType::Error,
                    now,
                );
            }
            Response::Status(Ok(status)) => self.shelf_status = Some(status),
            Response::Status(Err(err)) => debug!(error = %err, "bookshelf status unavailable"),
            Response::Shelved(Ok(shelf)) => {
                let status = self.shelf_status.get_or_insert_with(BookStatus::default);
                status.in_bookshelf = true;
                status.shelf = Some(shelf.clone());
                self.set_message(format!("Added to {shelf}"), MessageType::Info, now);
            }
            Response::Shelved(Err(ApiError::Unauthenticated)) => {
                self.set_message(
                    "Please log in to add books to your bookshelf".to_string(),
                    MessageType::Warning,
                    now,
                );
            }
            Response::Shelved(Err(err)) => {
                warn!(error = %err, "adding to bookshelf failed");
                self.set_message(
                    format!("Could not add to bookshelf: {err}"),
                    MessageType::Error,
                    now,
                );
            }
        }
        Vec::new()
    }

    fn on_book(&mut self, book: Book) -> Vec<Command> {
        info!(title = %book.title, author = %book.author, "book loaded");
        self.status = LoadStatus::LoadingContent;
        let mut commands = vec![Command::FetchContent {
            book: book.clone(),
            page: self.options.initial_page.max(1),
            words_per_page: self.pagination.words_per_page(),
            fallback: Fallback::FullText,
        }];
        if let (Some(token), Some(key)) = (self.token(), book.key()) {
            commands.push(Command::FetchStatus { token, key });
        }
        self.book = Some(book);
        commands
    }

    fn on_content(&mut self, requested_page: u32, load: ContentLoad) {
        let before = self.pagination.mode();
        if let Some(mode) = source::next_mode(before, &load) {
            if before != Some(mode) {
                info!(%mode, "content source resolved");
            }
            self.pagination.set_mode(mode);
        }

        match load {
            ContentLoad::Page(page) => {
                self.pagination.apply_server_page(page);
                self.status = LoadStatus::Ready;
            }
            ContentLoad::FullText(text) => {
                self.pagination.load_text(&text, requested_page);
                self.status = if self.pagination.total_pages() == 0 {
                    LoadStatus::ContentUnavailable("the book text is empty".to_string())
                } else {
                    LoadStatus::Ready
                };
            }
            ContentLoad::Failed(err) => {
                if self.pagination.mode() == Some(ContentMode::LocalPaginated)
                    && self.pagination.has_local_pages()
                {
                    debug!(page = requested_page, "server page failed, slicing local copy");
                    self.pagination.show_local(requested_page);
                    self.status = LoadStatus::Ready;
                } else {
                    self.status = LoadStatus::ContentUnavailable(err.to_string());
                }
            }
        }
    }

    /// Navigate to `requested`, clamped into range. Ignored while the slider
    /// is being dragged; only its debounce or release moves the page then.
    pub fn go_to_page(&mut self, requested: i64, now: Instant) -> Vec<Command> {
        if self.slider.is_dragging() {
            debug!(requested, "navigation ignored while scrubbing");
            return Vec::new();
        }
        self.navigate(requested, now)
    }

    fn navigate(&mut self, requested: i64, now: Instant) -> Vec<Command> {
        self.dock.show_temporarily(now);
        let navigation = self.pagination.go_to_page(requested);
        self.commands_for(navigation)
    }

    fn go_by(&mut self, delta: i64, now: Instant) -> Vec<Command> {
        let target = self.pagination.current_page() as i64 + delta;
        self.go_to_page(target, now)
    }

    pub fn first_page(&mut self, now: Instant) -> Vec<Command> {
        self.go_to_page(1, now)
    }

    pub fn last_page(&mut self, now: Instant) -> Vec<Command> {
        self.go_to_page(self.pagination.total_pages() as i64, now)
    }

    pub fn next_page(&mut self, now: Instant) -> Vec<Command> {
        self.go_by(1, now)
    }

    pub fn previous_page(&mut self, now: Instant) -> Vec<Command> {
        self.go_by(-1, now)
    }

    pub fn forward_ten(&mut self, now: Instant) -> Vec<Command> {
        self.go_by(10, now)
    }

    pub fn back_ten(&mut self, now: Instant) -> Vec<Command> {
        self.go_by(-10, now)
    }

    fn commands_for(&self, navigation: Navigation) -> Vec<Command> {
        match navigation {
            Navigation::Fetch(page) => self.fetch_content(page).into_iter().collect(),
            Navigation::Displayed(_) | Navigation::Unchanged => Vec::new(),
        }
    }

    fn fetch_content(&self, page: u32) -> Option<Command> {
        let book = self.book.clone()?;
        let fallback = if self.pagination.has_local_pages() {
            Fallback::None
        } else {
            Fallback::FullText
        };
        Some(Command::FetchContent {
            book,
            page,
            words_per_page: self.pagination.words_per_page(),
            fallback,
        })
    }

    pub fn slider_value(&self) -> u32 {
        self.slider.display_value(self.pagination.current_page())
    }

    pub fn begin_scrub(&mut self, value: u32, now: Instant) {
        self.dock.show_temporarily(now);
        let value = self.pagination.clamp(value as i64);
        self.slider.begin_drag(now, value);
    }

    pub fn scrub_to(&mut self, value: u32, now: Instant) {
        let value = self.pagination.clamp(value as i64);
        self.slider.drag_to(now, value);
    }

    /// Keyboard scrubbing: start a drag at the current page or move the
    /// pending value by `delta`.
    pub fn scrub_by(&mut self, delta: i64, now: Instant) {
        let value = self.pagination.clamp(self.slider_value() as i64 + delta);
        if self.slider.is_dragging() {
            self.slider.drag_to(now, value);
        } else {
            self.begin_scrub(value, now);
        }
    }

    /// Release the slider at `value`, or where it was dragged to.
    pub fn release_scrub(&mut self, value: Option<u32>, now: Instant) -> Vec<Command> {
        let value = value.unwrap_or_else(|| self.slider_value());
        match self.slider.release(value) {
            Some(page) => self.navigate(page as i64, now),
            None => Vec::new(),
        }
    }

    pub fn toggle_reading(&mut self, now: Instant) -> bool {
        let active = self.session.toggle(now);
        info!(active, minutes = self.session.accumulated_minutes(), "reading toggled");
        active
    }

    pub fn progress_update(&self) -> Option<ProgressUpdate> {
        let book = self.book.as_ref()?;
        let book_id = book.key()?.as_str().to_string();
        Some(ProgressUpdate {
            book_id,
            gutenberg_id: book.gutenberg_id.clone(),
            current_page: self.pagination.current_page(),
            progress: progress_percent(
                self.pagination.current_page(),
                self.pagination.total_pages(),
            ),
            reading_time: self.session.accumulated_minutes(),
        })
    }

    /// Submit page, percentage and accrued minutes. Minutes keep accruing
    /// afterwards; nothing is reset.
    pub fn save_progress(&mut self, now: Instant) -> Vec<Command> {
        let Some(token) = self.token() else {
            self.set_message(
                "Please log in to save your reading progress".to_string(),
                MessageType::Warning,
                now,
            );
            return Vec::new();
        };
        match self.progress_update() {
            Some(update) => vec![Command::SaveProgress { token, update }],
            None => Vec::new(),
        }
    }

    pub fn add_to_bookshelf(&mut self, shelf: &str, now: Instant) -> Vec<Command> {
        let Some(token) = self.token() else {
            self.set_message(
                "Please log in to add books to your bookshelf".to_string(),
                MessageType::Warning,
                now,
            );
            return Vec::new();
        };
        let Some(book) = self.book.as_ref() else {
            return Vec::new();
        };
        let Some(key) = book.key() else {
            return Vec::new();
        };
        vec![Command::AddToBookshelf {
            token,
            entry: BookshelfEntry {
                book_id: key.as_str().to_string(),
                gutenberg_id: book.gutenberg_id.clone(),
                shelf: shelf.to_string(),
            },
        }]
    }

    pub fn set_words_per_page(&mut self, words_per_page: u32, now: Instant) -> Vec<Command> {
        self.dock.show_temporarily(now);
        let navigation = self.pagination.set_words_per_page(words_per_page);
        debug!(words_per_page = self.pagination.words_per_page(), ?navigation, "words per page changed");
        self.commands_for(navigation)
    }

    pub fn toggle_fullscreen(&mut self, now: Instant) {
        self.dock.toggle_fullscreen(now);
    }

    pub fn enter_fullscreen(&mut self, now: Instant) {
        self.dock.enter_fullscreen(now);
    }

    pub fn exit_fullscreen(&mut self) {
        self.dock.exit_fullscreen();
    }

    /// Pointer tap inside the reading viewport.
    pub fn tap_viewport(&mut self, now: Instant) {
        if self.dock.is_fullscreen() {
            self.dock.show_temporarily(now);
        }
    }

    pub fn scroll_by(&mut self, delta: i32) {
        self.pagination.scroll_by(delta);
    }

    pub fn set_message(&mut self, text: String, kind: MessageType, now: Instant) {
        self.message = Some(Message {
            text,
            kind,
            shown_at: now,
        });
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Fire every due timer.
    pub fn tick(&mut self, now: Instant) -> Vec<Command> {
        let mut commands = Vec::new();
        if let Some(page) = self.slider.poll(now) {
            commands.extend(self.navigate(page as i64, now));
        }
        self.session.poll(now);
        self.dock.poll(now);
        if self
            .message
            .as_ref()
            .is_some_and(|message| message.expires_at() <= now)
        {
            self.message = None;
        }
        commands
    }

    /// How long the event loop may sleep before the next timer is due.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        timer::earliest([
            self.slider.next_wakeup(now),
            self.session.next_wakeup(now),
            self.dock.next_wakeup(now),
            self.message
                .as_ref()
                .map(|message| message.expires_at().saturating_duration_since(now)),
        ])
    }

    pub fn teardown(&mut self) {
        self.slider.teardown();
        self.session.teardown();
        self.dock.teardown();
    }

    fn token(&self) -> Option<String> {
        self.options
            .auth_token
            .clone()
            .filter(|token| !token.is_empty())
    }
}
