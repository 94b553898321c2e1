// Library surface for the binary and for headless integration tests.
pub mod app_dirs;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod language;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod store;
pub mod time_series;
pub mod typing_policy;
pub mod ui;
pub mod word_generator;
