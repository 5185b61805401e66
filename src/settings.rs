use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_TEXT_STORAGE_URL;
use crate::pagination::DEFAULT_WORDS_PER_PAGE;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Step used by the words-per-page shortcuts.
pub const WORDS_PER_PAGE_STEP: u32 = 50;
pub const MIN_WORDS_PER_PAGE: u32 = 50;
pub const MAX_WORDS_PER_PAGE: u32 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub text_storage_url: String,
    pub auth_token: Option<String>,
    pub words_per_page: u32,
    pub request_timeout_secs: u64,
    pub line_spacing: u8,
    pub show_progress_indicator: bool,
    pub start_fullscreen: bool,
}

impl Settings {
    /// Words per page kept inside the supported range.
    pub fn clamped_words_per_page(&self) -> u32 {
        self.words_per_page
            .clamp(MIN_WORDS_PER_PAGE, MAX_WORDS_PER_PAGE)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            text_storage_url: DEFAULT_TEXT_STORAGE_URL.to_string(),
            auth_token: None,
            words_per_page: DEFAULT_WORDS_PER_PAGE,
            request_timeout_secs: 15,
            line_spacing: 0,
            show_progress_indicator: true,
            start_fullscreen: false,
        }
    }
}

/// Single-character key bindings, user-configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keymap {
    pub next_page: String,
    pub prev_page: String,
    pub forward_ten: String,
    pub back_ten: String,
    pub first_page: String,
    pub last_page: String,
    pub scroll_down: String,
    pub scroll_up: String,
    pub scrub_forward: String,
    pub scrub_back: String,
    pub toggle_reading: String,
    pub save_progress: String,
    pub add_to_bookshelf: String,
    pub fullscreen: String,
    pub more_words: String,
    pub fewer_words: String,
    pub book_info: String,
    pub help: String,
    pub quit: String,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            next_page: "l".to_string(),
            prev_page: "h".to_string(),
            forward_ten: "L".to_string(),
            back_ten: "H".to_string(),
            first_page: "g".to_string(),
            last_page: "G".to_string(),
            scroll_down: "j".to_string(),
            scroll_up: "k".to_string(),
            scrub_forward: "]".to_string(),
            scrub_back: "[".to_string(),
            toggle_reading: "r".to_string(),
            save_progress: "s".to_string(),
            add_to_bookshelf: "b".to_string(),
            fullscreen: "f".to_string(),
            more_words: "+".to_string(),
            fewer_words: "-".to_string(),
            book_info: "i".to_string(),
            help: "?".to_string(),
            quit: "q".to_string(),
        }
    }
}

/// Reader actions reachable from a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextPage,
    PrevPage,
    ForwardTen,
    BackTen,
    FirstPage,
    LastPage,
    ScrollDown,
    ScrollUp,
    ScrubForward,
    ScrubBack,
    ToggleReading,
    SaveProgress,
    AddToBookshelf,
    Fullscreen,
    MoreWords,
    FewerWords,
    BookInfo,
    Help,
    Quit,
}

impl Keymap {
    pub fn action_for(&self, c: char) -> Option<Action> {
        let bindings = [
            (&self.next_page, Action::NextPage),
            (&self.prev_page, Action::PrevPage),
            (&self.forward_ten, Action::ForwardTen),
            (&self.back_ten, Action::BackTen),
            (&self.first_page, Action::FirstPage),
            (&self.last_page, Action::LastPage),
            (&self.scroll_down, Action::ScrollDown),
            (&self.scroll_up, Action::ScrollUp),
            (&self.scrub_forward, Action::ScrubForward),
            (&self.scrub_back, Action::ScrubBack),
            (&self.toggle_reading, Action::ToggleReading),
            (&self.save_progress, Action::SaveProgress),
            (&self.add_to_bookshelf, Action::AddToBookshelf),
            (&self.fullscreen, Action::Fullscreen),
            (&self.more_words, Action::MoreWords),
            (&self.fewer_words, Action::FewerWords),
            (&self.book_info, Action::BookInfo),
            (&self.help, Action::Help),
            (&self.quit, Action::Quit),
        ];
        bindings
            .into_iter()
            .find(|(key, _)| key.chars().next() == Some(c))
            .map(|(_, action)| action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.words_per_page, 300);
        assert_eq!(settings.request_timeout_secs, 15);
        assert_eq!(settings.auth_token, None);
        assert!(settings.show_progress_indicator);
        assert!(!settings.start_fullscreen);
        assert!(settings.text_storage_url.ends_with("/book_text_data/books"));
    }

    #[test]
    fn test_settings_partial_json_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"words_per_page": 150, "auth_token": "t"}"#).unwrap();
        assert_eq!(settings.words_per_page, 150);
        assert_eq!(settings.auth_token.as_deref(), Some("t"));
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_words_per_page_is_clamped() {
        let settings = Settings {
            words_per_page: 5,
            ..Default::default()
        };
        assert_eq!(settings.clamped_words_per_page(), MIN_WORDS_PER_PAGE);
    }

    #[test]
    fn test_keymap_lookup() {
        let keymap = Keymap::default();
        assert_eq!(keymap.action_for('l'), Some(Action::NextPage));
        assert_eq!(keymap.action_for('G'), Some(Action::LastPage));
        assert_eq!(keymap.action_for(']'), Some(Action::ScrubForward));
        assert_eq!(keymap.action_for('z'), None);
    }

    #[test]
    fn test_keymap_override() {
        let keymap: Keymap = serde_json::from_str(r#"{"next_page": "n"}"#).unwrap();
        assert_eq!(keymap.action_for('n'), Some(Action::NextPage));
        assert_eq!(keymap.action_for('l'), None);
        assert_eq!(keymap.action_for('h'), Some(Action::PrevPage));
    }
}
