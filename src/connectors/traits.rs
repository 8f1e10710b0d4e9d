// src/connectors/traits.rs
use crate::error::ConnectorError;
use crate::types::Listing;
use async_trait::async_trait;

/// Produces the listings currently on the watched page.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Listing>, ConnectorError>;
}

/// Best-effort outward delivery of one text message.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    /// Returns `true` when the message was accepted downstream.
    async fn notify(&self, text: &str) -> bool;
}
