// src/core/dedup.rs
use crate::types::{Classification, Condition, Listing, NotificationLine};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Which sizes are worth a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SizeFilter {
    #[default]
    Any,
    Exact(String),
}

impl SizeFilter {
    pub fn matches(&self, size: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(wanted) => wanted == size,
        }
    }
}

impl From<String> for SizeFilter {
    fn from(raw: String) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("any") {
            Self::Any
        } else {
            Self::Exact(raw.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub price: f64,
    pub size: String,
    pub condition: Condition,
    pub last_notified_at: DateTime<Utc>,
}

/// Mutable state of one search target. Never share it between targets:
/// links are only unique within a single listing page.
#[derive(Debug, Clone)]
pub struct EngineState {
    cache: HashMap<String, CacheEntry>,
    last_clear: DateTime<Utc>,
    last_notification: DateTime<Utc>,
}

impl EngineState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            cache: HashMap::new(),
            last_clear: now,
            last_notification: now,
        }
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cached(&self, link: &str) -> Option<&CacheEntry> {
        self.cache.get(link)
    }

    pub fn last_clear(&self) -> DateTime<Utc> {
        self.last_clear
    }

    pub fn last_notification(&self) -> DateTime<Utc> {
        self.last_notification
    }
}

#[derive(Debug, Clone)]
pub struct NotifyPolicy {
    pub budget: f64,
    pub size_filter: SizeFilter,
    pub min_notify_interval: Duration,
    pub cache_ttl: Duration,
}

impl NotifyPolicy {
    /// Decides which listings get announced this poll and commits them to the cache.
    ///
    /// An empty result means nothing goes out: either nothing is new or changed,
    /// or the pacing gate is still closed. In the latter case the cache is left
    /// alone so the same listings qualify again on the next poll.
    pub fn evaluate(
        &self,
        state: &mut EngineState,
        listings: &[Listing],
        now: DateTime<Utc>,
    ) -> Vec<NotificationLine> {
        if now - state.last_clear >= self.cache_ttl {
            tracing::info!(
                entries = state.cache.len(),
                "Notification cache expired, clearing"
            );
            state.cache.clear();
            state.last_clear = now;
        }

        let candidates = self.candidates(state, listings);
        if candidates.is_empty() {
            return Vec::new();
        }

        if now - state.last_notification < self.min_notify_interval {
            tracing::debug!(
                pending = candidates.len(),
                "Pacing gate closed, holding notifications"
            );
            return Vec::new();
        }

        for line in &candidates {
            state.cache.insert(
                line.link.clone(),
                CacheEntry {
                    price: line.price,
                    size: line.size.clone(),
                    condition: line.condition,
                    last_notified_at: now,
                },
            );
        }
        state.last_notification = now;
        candidates
    }

    fn candidates(&self, state: &EngineState, listings: &[Listing]) -> Vec<NotificationLine> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for listing in listings {
            if listing.price > self.budget || !self.size_filter.matches(&listing.size) {
                continue;
            }
            let classification = match state.cache.get(&listing.link) {
                None => Classification::New,
                Some(entry) if entry.price != listing.price => Classification::Update {
                    previous_price: entry.price,
                },
                Some(_) => continue,
            };
            // first candidate row of a link wins; unchanged rows never claim it
            if !seen.insert(listing.link.as_str()) {
                continue;
            }
            out.push(NotificationLine {
                classification,
                price: listing.price,
                size: listing.size.clone(),
                condition: listing.condition,
                link: listing.link.clone(),
            });
        }
        out
    }
}
