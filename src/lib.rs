pub mod analysis;
pub mod config;
pub mod connectors;
pub mod core;
pub mod error;
pub mod tui;
pub mod types;
pub mod utils;
