//! Non-interactive mode: print every page of a book to a writer.

use std::collections::VecDeque;
use std::io::Write;
use std::time::Instant;

use eyre::Result;

use crate::api::Backend;
use crate::engine::worker::execute;
use crate::engine::{BookReader, Command, LoadStatus, ReaderOptions};
use crate::models::BookKey;

pub const DUMP_WIDTH: usize = 80;

/// Walk the book from `options.initial_page` to the end through the normal
/// navigation path and write each page, wrapped to [`DUMP_WIDTH`] columns.
pub fn dump<W: Write>(
    backend: &dyn Backend,
    key: BookKey,
    options: ReaderOptions,
    out: &mut W,
) -> Result<()> {
    let mut reader = BookReader::new(key, options);
    let commands = reader.open();
    run(backend, &mut reader, commands);

    match reader.status().clone() {
        LoadStatus::BookNotFound(reason) => {
            return Err(eyre::eyre!("book not found: {reason}"));
        }
        LoadStatus::ContentUnavailable(reason) => {
            writeln!(out, "Content unavailable: {reason}")?;
            if let Some(summary) = reader.display_text() {
                writeln!(out)?;
                write_wrapped(out, summary)?;
            }
            return Ok(());
        }
        _ => {}
    }

    if let Some(book) = reader.book() {
        writeln!(out, "{}", book.title)?;
        if !book.author.is_empty() {
            writeln!(out, "{}", book.author)?;
        }
        writeln!(out)?;
    }

    loop {
        let pagination = reader.pagination();
        let page = pagination.current_page();
        writeln!(out, "--- Page {} of {} ---", page, pagination.total_pages())?;
        write_wrapped(out, reader.display_text().unwrap_or_default())?;
        writeln!(out)?;

        if page >= reader.pagination().total_pages() {
            break;
        }
        let commands = reader.next_page(Instant::now());
        run(backend, &mut reader, commands);
        if reader.pagination().current_page() == page
            || !matches!(reader.status(), LoadStatus::Ready)
        {
            break;
        }
    }

    reader.teardown();
    Ok(())
}

// Execute commands in issue order until none are left. Bookshelf lookups
// are skipped; they never affect the printed text.
fn run(backend: &dyn Backend, reader: &mut BookReader, commands: Vec<Command>) {
    let mut queue: VecDeque<Command> = commands.into();
    while let Some(command) = queue.pop_front() {
        if matches!(command, Command::FetchStatus { .. }) {
            continue;
        }
        let response = execute(backend, command);
        queue.extend(reader.apply(response, Instant::now()));
    }
}

fn write_wrapped<W: Write>(out: &mut W, text: &str) -> Result<()> {
    for line in textwrap::wrap(text, DUMP_WIDTH) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
