pub mod jitter;
pub mod stats;
