// src/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size label used when a row carries no GB/TB cell.
pub const UNKNOWN_SIZE: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    New,
    Mint,
    Good,
    Fair,
    Unknown,
}

impl Condition {
    /// Recognises a condition label inside free cell text ("Mint", " Good ", "Like New").
    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        [Self::New, Self::Mint, Self::Good, Self::Fair]
            .into_iter()
            .find(|c| text.contains(c.as_str()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Mint => "Mint",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One marketplace offer as parsed from the listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub price: f64,
    pub size: String,
    pub condition: Condition,
    pub link: String,
}

impl Listing {
    pub fn new(
        price: f64,
        size: impl Into<String>,
        condition: Condition,
        link: impl Into<String>,
    ) -> Self {
        Self {
            price,
            size: size.into(),
            condition,
            link: link.into(),
        }
    }
}

/// Lowest price seen for one (size, condition) pair in a poll.
#[derive(Debug, Clone, PartialEq)]
pub struct CheapestOffer {
    pub size: String,
    pub condition: Condition,
    pub price: f64,
    pub link: String,
}

/// What the presentation layer gets after every poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorizedView {
    pub under_budget: Vec<Listing>,
    pub significant: Vec<Listing>,
    pub cheapest: Vec<CheapestOffer>,
}

impl CategorizedView {
    pub fn is_empty(&self) -> bool {
        self.under_budget.is_empty() && self.significant.is_empty() && self.cheapest.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    New,
    Update { previous_price: f64 },
}

/// One line of an outgoing notification batch.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationLine {
    pub classification: Classification,
    pub price: f64,
    pub size: String,
    pub condition: Condition,
    pub link: String,
}

impl fmt::Display for NotificationLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.classification {
            Classification::New => write!(f, "NEW ${:.2}", self.price)?,
            Classification::Update { previous_price } => write!(
                f,
                "PRICE CHANGE ${:.2} -> ${:.2}",
                previous_price, self.price
            )?,
        }
        write!(f, " | {} | {} | {}", self.size, self.condition, self.link)
    }
}

// --- TUI ---

#[derive(Debug, Clone)]
pub enum UiEvent {
    PollCompleted {
        at: DateTime<Utc>,
        view: CategorizedView,
        notified: usize,
    },
    NextPollIn(std::time::Duration),
    Log(String),
}
