use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use eyre::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// `-v` gives info, `-vv` or `--debug` gives debug.
    pub fn from_flags(verbose: u8, debug: bool) -> Self {
        match (debug, verbose) {
            (true, _) | (_, 2..) => LogLevel::Debug,
            (_, 1) => LogLevel::Info,
            _ => LogLevel::Warn,
        }
    }

    fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
        }
    }
}

/// Where log lines go.
pub enum Sink<'a> {
    Stderr,
    /// Appends to a file; used while the terminal UI owns the screen.
    File(&'a Path),
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init(level: LogLevel, sink: Sink<'_>) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.filter().into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match sink {
        Sink::Stderr => builder.with_writer(std::io::stderr).try_init(),
        Sink::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    installed.map_err(|err| eyre::eyre!("could not install logger: {err}"))
}
