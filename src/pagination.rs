//! Word-count pagination for books whose text is held locally.

pub const DEFAULT_WORDS_PER_PAGE: u32 = 300;

/// Split `text` into pages of `words_per_page` words each.
///
/// Words are whitespace-separated tokens; each page rejoins its words with a
/// single space, so runs of whitespace and line breaks are normalised. The last
/// page may hold fewer words. Empty text yields no pages. A `words_per_page`
/// of zero is treated as one.
pub fn paginate(text: &str, words_per_page: u32) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(words_per_page.max(1) as usize)
        .map(|chunk| chunk.join(" "))
        .collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// `ceil(word_count / words_per_page)`
pub fn total_pages(word_count: usize, words_per_page: u32) -> u32 {
    let per_page = words_per_page.max(1) as usize;
    word_count.div_ceil(per_page).min(u32::MAX as usize) as u32
}
