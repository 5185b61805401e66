#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use tome::api::{ApiError, Backend};
use tome::engine::worker::execute;
use tome::engine::{BookReader, Command};
use tome::models::{Book, BookKey, BookStatus, BookshelfEntry, PageContent, ProgressUpdate};

/// In-memory backend with a call log.
pub struct FakeBackend {
    pub book: Option<Book>,
    /// Server-side pages; `None` makes the page endpoint fail.
    pub server_pages: Option<Vec<String>>,
    pub full_text: Option<String>,
    /// Pages the page endpoint fails for even when `server_pages` is set.
    pub failing_pages: Vec<u32>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new(book: Book) -> Self {
        Self {
            book: Some(book),
            server_pages: None,
            full_text: None,
            failing_pages: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_server_pages(mut self, pages: Vec<String>) -> Self {
        self.server_pages = Some(pages);
        self
    }

    pub fn with_full_text(mut self, text: &str) -> Self {
        self.full_text = Some(text.to_string());
        self
    }

    pub fn with_failing_pages(mut self, pages: &[u32]) -> Self {
        self.failing_pages = pages.to_vec();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Backend for FakeBackend {
    fn fetch_book(&self, key: &BookKey) -> Result<Book, ApiError> {
        self.log(format!("book:{key}"));
        self.book.clone().ok_or(ApiError::Status {
            url: format!("/books/{key}"),
            status: 404,
        })
    }

    fn fetch_page(&self, _key: &BookKey, page: u32, _wpp: u32) -> Result<PageContent, ApiError> {
        self.log(format!("page:{page}"));
        let unavailable = ApiError::Status {
            url: "/content".to_string(),
            status: 503,
        };
        if self.failing_pages.contains(&page) {
            return Err(unavailable);
        }
        let pages = self.server_pages.as_ref().ok_or(unavailable)?;
        let index = (page.max(1) as usize).min(pages.len()) - 1;
        Ok(PageContent {
            content: pages[index].clone(),
            current_page: index as u32 + 1,
            total_pages: pages.len() as u32,
        })
    }

    fn fetch_full_text(&self, _book: &Book) -> Result<String, ApiError> {
        self.log("full".to_string());
        self.full_text.clone().ok_or(ApiError::Status {
            url: "/full-text.txt".to_string(),
            status: 404,
        })
    }

    fn save_progress(&self, token: &str, update: &ProgressUpdate) -> Result<(), ApiError> {
        self.log(format!("save:{token}:{}:{}", update.current_page, update.progress));
        Ok(())
    }

    fn book_status(&self, _token: &str, _key: &BookKey) -> Result<BookStatus, ApiError> {
        self.log("status".to_string());
        Ok(BookStatus::default())
    }

    fn add_to_bookshelf(&self, _token: &str, entry: &BookshelfEntry) -> Result<(), ApiError> {
        self.log(format!("shelf:{}", entry.shelf));
        Ok(())
    }
}

pub fn book() -> Book {
    Book {
        id: "b42".to_string(),
        gutenberg_id: Some("42".to_string()),
        title: "A Test Book".to_string(),
        author: "Anon".to_string(),
        summary: Some("A short summary.".to_string()),
        full_text_url: None,
    }
}

/// `n` numbered words: "w1 w2 ... wn".
pub fn words(n: usize) -> String {
    (1..=n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
}

/// Run commands synchronously, feeding every response back, until idle.
pub fn drive(backend: &dyn Backend, reader: &mut BookReader, commands: Vec<Command>) {
    let mut queue: VecDeque<Command> = commands.into();
    while let Some(command) = queue.pop_front() {
        let response = execute(backend, command);
        queue.extend(reader.apply(response, Instant::now()));
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub line: String,
    pub headers: Vec<String>,
    pub body: String,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|h| {
            let (key, value) = h.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }
}

pub fn read_request(stream: TcpStream) -> (TcpStream, Request) {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();

    let mut headers = Vec::new();
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).unwrap();
        let header = header.trim_end().to_string();
        if header.is_empty() {
            break;
        }
        headers.push(header);
    }

    let mut request = Request {
        line: line.trim_end().to_string(),
        headers,
        body: String::new(),
    };
    let length: usize = request
        .header("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).unwrap();
    request.body = String::from_utf8_lossy(&body).into_owned();

    (reader.into_inner(), request)
}

pub fn write_response(stream: &mut TcpStream, status: &str, content_type: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).unwrap();
    stream.flush().unwrap();
}

pub struct Reply {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    pub fn json(status: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.into(),
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: "200 OK",
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::json("404 Not Found", r#"{"success":false,"message":"not found"}"#)
    }
}

/// Mock HTTP server answering every request with `route`. Returns the base
/// URL and the log of requests received.
pub fn serve<F>(route: F) -> (String, Arc<Mutex<Vec<Request>>>)
where
    F: Fn(&Request) -> Reply + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let log = Arc::new(Mutex::new(Vec::new()));
    let server_log = Arc::clone(&log);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            let (mut stream, request) = read_request(stream);
            let reply = route(&request);
            server_log.lock().unwrap().push(request);
            write_response(&mut stream, reply.status, reply.content_type, &reply.body);
        }
    });

    (base, log)
}

pub fn page_json(content: &str, current: u32, total: u32) -> String {
    serde_json::json!({
        "success": true,
        "data": {
            "content": content,
            "metadata": { "currentPage": current, "totalPages": total }
        }
    })
    .to_string()
}

pub fn book_json(id: &str, gutenberg_id: u64, full_text_url: Option<&str>) -> String {
    serde_json::json!({
        "success": true,
        "data": {
            "id": id,
            "gutenbergId": gutenberg_id,
            "title": "Mock Book",
            "author": "Mock Author",
            "summary": "Mock summary.",
            "fullTextUrl": full_text_url
        }
    })
    .to_string()
}
