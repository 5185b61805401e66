pub mod api;
pub mod cli;
pub mod config;
pub mod dump;
pub mod engine;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod settings;
pub mod timer;
pub mod ui;
