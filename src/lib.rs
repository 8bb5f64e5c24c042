//! widgets-rs
//!
//! REST API over WidgetA/WidgetB records, backed by PostgreSQL or an
//! in-memory store, plus a typed client and the command line that drives both.

use shadow_rs::shadow;
shadow!(build);

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod server;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
