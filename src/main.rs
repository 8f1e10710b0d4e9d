// src/main.rs
use dotenvy::dotenv;
use swappa_watch::config::AppConfig;
use swappa_watch::connectors::swappa::SwappaClient;
use swappa_watch::connectors::traits::Notifier;
use swappa_watch::connectors::webhook::{LogNotifier, WebhookNotifier};
use swappa_watch::core::engine::{EngineSettings, MonitorEngine};
use swappa_watch::core::logging;
use swappa_watch::tui;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // 1. Load Configuration
    let config = AppConfig::new()?;
    let _log_guard = logging::init(&config.logging, config.ui.enabled)?;

    println!("========================================");
    println!("        SWAPPA WATCH - v{}", env!("CARGO_PKG_VERSION"));
    println!("========================================");
    println!("Target: {}", config.product_name);
    println!("Budget: ${}", config.analysis.max_price);
    println!(
        "Notify: {}",
        if config.notify.webhook_url.is_some() {
            "webhook"
        } else {
            "log only"
        }
    );
    println!("========================================");

    // 2. Initialize Components
    let source = SwappaClient::new(
        &config.search_url,
        config.poll.user_agents.clone(),
        config.poll.fetch_retries,
        config.request_timeout(),
    )?;

    let notifier: Box<dyn Notifier> = match &config.notify.webhook_url {
        Some(url) => Box::new(WebhookNotifier::new(
            url.clone(),
            config.notify.max_message_len,
            config.request_timeout(),
        )?),
        None => Box::new(LogNotifier),
    };

    // 3. UI channel
    let (ui_tx, ui_rx) = if config.ui.enabled {
        let (tx, rx) = mpsc::channel(100);
        (Some(tx), Some(rx))
    } else {
        (None, None)
    };

    let settings = EngineSettings {
        product_name: config.product_name.clone(),
        max_price: config.analysis.max_price,
        std_dev_multiplier: config.analysis.std_dev_multiplier,
        min_delay_secs: config.poll.min_delay_secs,
        max_delay_secs: config.poll.max_delay_secs,
    };
    let mut engine = MonitorEngine::new(
        settings,
        config.notify_policy(),
        Box::new(source),
        notifier,
        ui_tx,
        chrono::Utc::now(),
    );

    // 4. Run until the engine fails, the UI quits, or Ctrl+C
    let title = config.product_name.clone();
    let ui_task = async move {
        match ui_rx {
            Some(rx) => match tokio::task::spawn_blocking(move || tui::run(rx, title)).await {
                Ok(res) => res,
                Err(e) => Err(e.into()),
            },
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        res = engine.run() => {
            if let Err(e) = res {
                error!("Fatal Engine Error: {}", e);
                eprintln!("Fatal Engine Error: {}", e);
            }
        }
        res = ui_task => {
            if let Err(e) = res {
                eprintln!("UI Error: {}", e);
            }
            info!("UI closed, shutting down");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C received, shutting down");
        }
    }

    Ok(())
}
