use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::models::BookKey;

#[derive(Parser, Debug)]
#[clap(
    name = "tome",
    version,
    about = "Read public-domain books from a Tome library server in the terminal.",
    long_about = None
)]
pub struct Cli {
    /// Book id (or Gutenberg id with --gutenberg)
    #[clap(name = "BOOK")]
    pub book: String,

    /// Treat BOOK as a Project Gutenberg id
    #[clap(short = 'g', long)]
    pub gutenberg: bool,

    /// Page to open at
    #[clap(short, long, default_value_t = 1)]
    pub page: u32,

    /// Words per page when paginating
    #[clap(short = 'w', long, value_name = "N")]
    pub words_per_page: Option<u32>,

    /// Base URL of the library API
    #[clap(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Print every page to stdout and exit
    #[clap(short, long)]
    pub dump: bool,

    /// Start in fullscreen mode
    #[clap(short, long)]
    pub fullscreen: bool,

    /// Use a specific configuration file
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug output
    #[clap(long)]
    pub debug: bool,
}

impl Cli {
    pub fn book_key(&self) -> BookKey {
        if self.gutenberg {
            BookKey::Gutenberg(self.book.clone())
        } else {
            BookKey::Id(self.book.clone())
        }
    }
}
