pub mod messages;
pub mod swappa;
pub mod traits;
pub mod webhook;
