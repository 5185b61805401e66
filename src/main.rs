use std::io;
use std::sync::Arc;
use std::time::Duration;

use tome::{
    api::HttpBackend,
    cli::Cli,
    config::{Config, get_app_data_prefix},
    dump::dump,
    engine::{BookReader, ReaderOptions, worker::Worker},
    logging::{self, LogLevel, Sink},
    ui::reader::Reader,
};

use clap::Parser;
use eyre::Result;
use tracing::warn;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path.clone())?,
        None => match Config::new() {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Warning: Could not load configuration: {}", err);
                eprintln!("Starting with default settings");
                Config::with_defaults()
            }
        },
    };
    config.apply_env_overrides();
    if let Some(url) = &cli.api_url {
        config.settings.api_base_url = url.clone();
    }
    if let Some(words_per_page) = cli.words_per_page {
        config.settings.words_per_page = words_per_page;
    }
    if cli.fullscreen {
        config.settings.start_fullscreen = true;
    }

    let level = LogLevel::from_flags(cli.verbose, cli.debug);
    if cli.dump {
        logging::init(level, Sink::Stderr)?;
    } else if let Ok(prefix) = get_app_data_prefix() {
        // The terminal belongs to the UI; without a log file we stay quiet.
        let _ = logging::init(level, Sink::File(&prefix.join("tome.log")));
    }

    let backend = HttpBackend::new(
        &config.settings.api_base_url,
        &config.settings.text_storage_url,
        Duration::from_secs(config.settings.request_timeout_secs),
    )?;
    let words_per_page = config.settings.clamped_words_per_page();
    if words_per_page != config.settings.words_per_page {
        warn!(
            requested = config.settings.words_per_page,
            used = words_per_page,
            "words per page out of range, clamped"
        );
    }
    let options = ReaderOptions {
        words_per_page,
        initial_page: cli.page.max(1),
        auth_token: config.settings.auth_token.clone(),
    };

    if cli.dump {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        return dump(&backend, cli.book_key(), options, &mut out);
    }

    let engine = BookReader::new(cli.book_key(), options);
    let worker = Worker::new(Arc::new(backend));
    let mut reader = Reader::new(engine, worker, config)?;
    reader.run()
}
