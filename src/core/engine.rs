// src/core/engine.rs
use crate::analysis::categorize;
use crate::connectors::traits::{ListingSource, Notifier};
use crate::core::dedup::{EngineState, NotifyPolicy};
use crate::types::{CategorizedView, NotificationLine, UiEvent};
use crate::utils::jitter::random_delay;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub product_name: String,
    pub max_price: f64,
    pub std_dev_multiplier: f64,
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,
}

/// Result of one poll, returned for callers that drive the engine by hand.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub view: CategorizedView,
    pub notifications: Vec<NotificationLine>,
    pub delivered: Option<bool>,
}

pub struct MonitorEngine {
    settings: EngineSettings,
    policy: NotifyPolicy,
    state: EngineState,
    source: Box<dyn ListingSource>,
    notifier: Box<dyn Notifier>,
    ui_sender: Option<mpsc::Sender<UiEvent>>,
}

impl MonitorEngine {
    pub fn new(
        settings: EngineSettings,
        policy: NotifyPolicy,
        source: Box<dyn ListingSource>,
        notifier: Box<dyn Notifier>,
        ui_sender: Option<mpsc::Sender<UiEvent>>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            settings,
            policy,
            state: EngineState::new(started_at),
            source,
            notifier,
            ui_sender,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    fn send_ui_event(&self, event: UiEvent) {
        let Some(sender) = &self.ui_sender else {
            return;
        };
        match sender.try_send(event) {
            Ok(_) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {}
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!("UI Channel closed! Interface is likely dead.");
            }
        }
    }

    /// Polls forever with a jittered pause between polls.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        info!(
            "Engine starting for {} (budget ${}, k = {})",
            self.settings.product_name, self.settings.max_price, self.settings.std_dev_multiplier
        );

        loop {
            let span = info_span!("poll", id = %Uuid::new_v4());
            self.poll_once(Utc::now()).instrument(span).await;

            let delay = random_delay(self.settings.min_delay_secs, self.settings.max_delay_secs);
            info!("Waiting for {} seconds before the next check...", delay.as_secs());
            self.send_ui_event(UiEvent::NextPollIn(delay));
            tokio::time::sleep(delay).await;
        }
    }

    /// One full cycle: fetch, analyze, decide, deliver, present.
    pub async fn poll_once(&mut self, now: DateTime<Utc>) -> PollOutcome {
        let listings = match self.source.fetch().await {
            Ok(listings) => listings,
            Err(e) => {
                warn!("Fetch failed, treating poll as empty: {}", e);
                self.send_ui_event(UiEvent::Log(format!("Fetch failed: {}", e)));
                Vec::new()
            }
        };

        let view = categorize(
            &listings,
            self.settings.max_price,
            self.settings.std_dev_multiplier,
        );
        let notifications = self.policy.evaluate(&mut self.state, &listings, now);

        info!(
            fetched = listings.len(),
            under_budget = view.under_budget.len(),
            significant = view.significant.len(),
            notifications = notifications.len(),
            "Poll analyzed"
        );

        let delivered = if notifications.is_empty() {
            None
        } else {
            let text = render_notification(&self.settings.product_name, &notifications);
            let ok = self.notifier.notify(&text).await;
            if ok {
                info!("📣 Sent {} notification(s) via {}", notifications.len(), self.notifier.name());
            } else {
                warn!(
                    "Notifier {} reported a failure; cache keeps the {} listing(s) as notified",
                    self.notifier.name(),
                    notifications.len()
                );
            }
            self.send_ui_event(UiEvent::Log(format!(
                "Notified {} listing(s) ({})",
                notifications.len(),
                if ok { "delivered" } else { "delivery failed" }
            )));
            Some(ok)
        };

        self.send_ui_event(UiEvent::PollCompleted {
            at: now,
            view: view.clone(),
            notified: notifications.len(),
        });

        PollOutcome {
            view,
            notifications,
            delivered,
        }
    }
}

/// Formats a batch as one message: a header line, then one line per listing.
pub fn render_notification(product_name: &str, lines: &[NotificationLine]) -> String {
    let mut text = format!("{}: {} listing(s)", product_name, lines.len());
    for line in lines {
        text.push('\n');
        text.push_str(&line.to_string());
    }
    text
}
