mod common;

use std::time::Duration;

use common::{Reply, book_json, page_json, serve};
use tome::api::{ApiError, Backend, HttpBackend};
use tome::engine::source::{ContentLoad, Fallback, resolve};
use tome::models::{Book, BookKey, BookshelfEntry, ProgressUpdate};

fn backend(base: &str) -> HttpBackend {
    HttpBackend::new(
        &format!("{base}/api"),
        &format!("{base}/storage"),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn path(line: &str) -> &str {
    line.split_whitespace().nth(1).unwrap_or_default()
}

#[test]
fn fetch_page_sends_page_and_words_per_page() {
    let (base, log) = serve(|request| {
        if path(&request.line).starts_with("/api/books/b1/content") {
            Reply::json("200 OK", page_json("page three text", 3, 12))
        } else {
            Reply::not_found()
        }
    });

    let page = backend(&base)
        .fetch_page(&BookKey::Id("b1".to_string()), 3, 120)
        .unwrap();
    assert_eq!(page.content, "page three text");
    assert_eq!(page.current_page, 3);
    assert_eq!(page.total_pages, 12);

    let requests = log.lock().unwrap();
    let target = path(&requests[0].line);
    assert!(target.contains("page=3"), "{target}");
    assert!(target.contains("wordsPerPage=120"), "{target}");
}

#[test]
fn fetch_book_falls_back_to_plain_endpoint() {
    let (base, log) = serve(|request| match path(&request.line) {
        "/api/books/1342" => Reply::json("200 OK", book_json("b1", 1342, None)),
        _ => Reply::not_found(),
    });

    let book = backend(&base)
        .fetch_book(&BookKey::Gutenberg("1342".to_string()))
        .unwrap();
    assert_eq!(book.id, "b1");
    assert_eq!(book.gutenberg_id.as_deref(), Some("1342"));
    assert_eq!(book.title, "Mock Book");

    let paths: Vec<String> = log
        .lock()
        .unwrap()
        .iter()
        .map(|r| path(&r.line).to_string())
        .collect();
    assert_eq!(paths, ["/api/books/1342/full", "/api/books/1342"]);
}

#[test]
fn unsuccessful_envelope_is_malformed() {
    let (base, _log) = serve(|_| {
        Reply::json("200 OK", r#"{"success":false,"message":"no such page"}"#)
    });

    let err = backend(&base)
        .fetch_page(&BookKey::Id("b1".to_string()), 1, 300)
        .unwrap_err();
    match err {
        ApiError::Malformed { reason, .. } => assert_eq!(reason, "no such page"),
        other => panic!("expected malformed response, got {other:?}"),
    }
}

#[test]
fn content_falls_back_to_storage_text() {
    let (base, log) = serve(|request| match path(&request.line) {
        "/storage/1342/full-text.txt" => Reply::text("It is a truth universally acknowledged"),
        _ => Reply::json("500 Internal Server Error", r#"{"success":false}"#),
    });
    let book = Book {
        id: "b1".to_string(),
        gutenberg_id: Some("1342".to_string()),
        title: "Pride and Prejudice".to_string(),
        ..Default::default()
    };

    let load = resolve(&backend(&base), &book, 1, 300, Fallback::FullText);
    match load {
        ContentLoad::FullText(text) => assert!(text.starts_with("It is a truth")),
        other => panic!("expected full text, got {other:?}"),
    }
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
fn book_full_text_url_takes_precedence() {
    let (base, _log) = serve(|request| match path(&request.line) {
        "/mirror/pp.txt" => Reply::text("mirrored text"),
        _ => Reply::not_found(),
    });
    let book = Book {
        id: "b1".to_string(),
        gutenberg_id: Some("1342".to_string()),
        full_text_url: Some(format!("{base}/mirror/pp.txt")),
        ..Default::default()
    };

    assert_eq!(backend(&base).fetch_full_text(&book).unwrap(), "mirrored text");
}

#[test]
fn save_progress_posts_with_bearer_token() {
    let (base, log) = serve(|request| match path(&request.line) {
        "/api/users/reading-progress" => Reply::json("200 OK", r#"{"success":true}"#),
        _ => Reply::not_found(),
    });
    let update = ProgressUpdate {
        book_id: "b1".to_string(),
        gutenberg_id: Some("1342".to_string()),
        current_page: 25,
        progress: 25,
        reading_time: 7,
    };

    backend(&base).save_progress("secret", &update).unwrap();

    let requests = log.lock().unwrap();
    let request = &requests[0];
    assert!(request.line.starts_with("POST "));
    assert_eq!(request.header("authorization"), Some("Bearer secret"));
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["bookId"], "b1");
    assert_eq!(body["gutenbergId"], "1342");
    assert_eq!(body["currentPage"], 25);
    assert_eq!(body["progress"], 25);
    assert_eq!(body["readingTime"], 7);
}

#[test]
fn rejected_token_is_unauthenticated() {
    let (base, _log) = serve(|_| Reply::json("401 Unauthorized", r#"{"success":false}"#));
    let entry = BookshelfEntry {
        book_id: "b1".to_string(),
        gutenberg_id: None,
        shelf: "currently-reading".to_string(),
    };

    let err = backend(&base).add_to_bookshelf("expired", &entry).unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated));
}

#[test]
fn empty_token_never_reaches_the_server() {
    let (base, log) = serve(|_| Reply::json("200 OK", r#"{"success":true}"#));
    let update = ProgressUpdate {
        book_id: "b1".to_string(),
        gutenberg_id: None,
        current_page: 1,
        progress: 1,
        reading_time: 0,
    };

    let err = backend(&base).save_progress("", &update).unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn book_status_is_parsed() {
    let (base, log) = serve(|request| match path(&request.line) {
        "/api/users/bookshelf/b1/status" => Reply::json(
            "200 OK",
            r#"{"success":true,"data":{"inBookshelf":true,"shelf":"favorites","currentPage":12}}"#,
        ),
        _ => Reply::not_found(),
    });

    let status = backend(&base)
        .book_status("tok", &BookKey::Id("b1".to_string()))
        .unwrap();
    assert!(status.in_bookshelf);
    assert_eq!(status.shelf.as_deref(), Some("favorites"));
    assert_eq!(status.current_page, Some(12));
    assert_eq!(status.progress, None);
    assert_eq!(log.lock().unwrap()[0].header("authorization"), Some("Bearer tok"));
}
