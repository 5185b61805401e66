use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crate::api::Backend;
use crate::engine::source;
use crate::engine::{Command, Response};

/// Runs engine commands on background threads.
///
/// Every command gets its own thread. Responses come back in completion
/// order, not issue order, and nothing in flight is ever cancelled.
pub struct Worker {
    backend: Arc<dyn Backend>,
    tx: Sender<Response>,
    rx: Receiver<Response>,
}

impl Worker {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { backend, tx, rx }
    }

    pub fn dispatch(&self, command: Command) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let response = execute(backend.as_ref(), command);
            // The receiver is gone once the reader has shut down.
            let _ = tx.send(response);
        });
    }

    pub fn dispatch_all(&self, commands: Vec<Command>) {
        for command in commands {
            self.dispatch(command);
        }
    }

    pub fn try_recv(&self) -> Option<Response> {
        self.rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Response> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Perform one command synchronously.
pub fn execute(backend: &dyn Backend, command: Command) -> Response {
    match command {
        Command::FetchBook(key) => Response::Book(backend.fetch_book(&key)),
        Command::FetchContent {
            book,
            page,
            words_per_page,
            fallback,
        } => Response::Content {
            requested_page: page,
            load: source::resolve(backend, &book, page, words_per_page, fallback),
        },
        Command::SaveProgress { token, update } => {
            Response::ProgressSaved(backend.save_progress(&token, &update).map(|()| update))
        }
        Command::FetchStatus { token, key } => Response::Status(backend.book_status(&token, &key)),
        Command::AddToBookshelf { token, entry } => Response::Shelved(
            backend
                .add_to_bookshelf(&token, &entry)
                .map(|()| entry.shelf),
        ),
    }
}
