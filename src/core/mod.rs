pub mod dedup;
pub mod engine;
pub mod logging;
