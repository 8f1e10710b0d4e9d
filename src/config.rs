// src/config.rs

use crate::core::dedup::{NotifyPolicy, SizeFilter};
use config::{Config, ConfigBuilder, ConfigError, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    pub max_price: f64,
    pub std_dev_multiplier: f64,
    #[serde(default)]
    pub desired_size: SizeFilter,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotifyConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "default_min_interval_secs")]
    pub min_interval_secs: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    #[serde(default = "default_min_delay_secs")]
    pub min_delay_secs: u64,
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
    #[serde(default = "default_fetch_retries")]
    pub fetch_retries: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_directory")]
    pub directory: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub search_url: String,
    #[serde(default = "default_product_name")]
    pub product_name: String,
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// `Settings.{toml,json,yaml}` in the working directory, overridden by
    /// `APP_*` variables (`APP_NOTIFY__WEBHOOK_URL=...`).
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(Config::builder().add_source(File::with_name("Settings")))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load(Config::builder().add_source(File::from(path.as_ref())))
    }

    fn load(
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config = builder
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: &str| Err(ConfigError::Message(msg.to_string()));

        if self.search_url.trim().is_empty() {
            return fail("search_url must not be empty");
        }
        if url::Url::parse(&self.search_url).is_err() {
            return fail("search_url is not a valid URL");
        }
        if !(self.analysis.max_price.is_finite() && self.analysis.max_price > 0.0) {
            return fail("analysis.max_price must be a positive number");
        }
        if !(self.analysis.std_dev_multiplier.is_finite()
            && self.analysis.std_dev_multiplier >= 0.0)
        {
            return fail("analysis.std_dev_multiplier must be >= 0");
        }
        if self.poll.min_delay_secs > self.poll.max_delay_secs {
            return fail("poll.min_delay_secs must not exceed poll.max_delay_secs");
        }
        if self.poll.user_agents.is_empty() {
            return fail("poll.user_agents must list at least one User-Agent");
        }
        if self.notify.max_message_len == 0 {
            return fail("notify.max_message_len must be > 0");
        }
        Ok(())
    }

    pub fn notify_policy(&self) -> NotifyPolicy {
        NotifyPolicy {
            budget: self.analysis.max_price,
            size_filter: self.analysis.desired_size.clone(),
            min_notify_interval: secs(self.notify.min_interval_secs),
            cache_ttl: secs(self.notify.cache_ttl_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.poll.request_timeout_secs)
    }
}

fn secs(n: u64) -> chrono::Duration {
    // chrono panics above i64::MAX milliseconds
    let n = i64::try_from(n).unwrap_or(i64::MAX).min(i64::MAX / 1000);
    chrono::Duration::seconds(n)
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            min_interval_secs: default_min_interval_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            max_message_len: default_max_message_len(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: default_min_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
            fetch_retries: default_fetch_retries(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agents: default_user_agents(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
        }
    }
}

fn default_product_name() -> String {
    "Listings".to_string()
}
fn default_min_interval_secs() -> u64 {
    300
}
fn default_cache_ttl_secs() -> u64 {
    86_400
}
fn default_max_message_len() -> usize {
    2000
}
fn default_min_delay_secs() -> u64 {
    55
}
fn default_max_delay_secs() -> u64 {
    65
}
fn default_fetch_retries() -> u32 {
    2
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_directory() -> String {
    "logs".to_string()
}
fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/89.0.4389.82 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.77 Safari/537.36",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_settings(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn minimal_file_gets_defaults() {
        let file = write_settings(
            r#"
            search_url = "https://swappa.com/listings/google-pixel-9-pro-xl"

            [analysis]
            max_price = 725
            std_dev_multiplier = 1.5
            "#,
        );
        let cfg = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.analysis.max_price, 725.0);
        assert_eq!(cfg.analysis.desired_size, SizeFilter::Any);
        assert_eq!(cfg.notify.min_interval_secs, 300);
        assert_eq!(cfg.poll.min_delay_secs, 55);
        assert_eq!(cfg.poll.max_delay_secs, 65);
        assert_eq!(cfg.poll.user_agents.len(), 4);
        assert!(cfg.ui.enabled);
        assert_eq!(cfg.product_name, "Listings");

        let policy = cfg.notify_policy();
        assert_eq!(policy.cache_ttl, chrono::Duration::hours(24));
        assert_eq!(policy.min_notify_interval, chrono::Duration::minutes(5));
    }

    #[test]
    fn size_filter_and_webhook_are_read() {
        let file = write_settings(
            r#"
            search_url = "https://swappa.com/listings/google-pixel-9-pro-xl"
            product_name = "Pixel 9 Pro XL"

            [analysis]
            max_price = 700.0
            std_dev_multiplier = 1.0
            desired_size = "256GB"

            [notify]
            webhook_url = "https://discord.com/api/webhooks/1/abc"
            min_interval_secs = 60
            "#,
        );
        let cfg = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(
            cfg.analysis.desired_size,
            SizeFilter::Exact("256GB".to_string())
        );
        assert_eq!(
            cfg.notify.webhook_url.as_deref(),
            Some("https://discord.com/api/webhooks/1/abc")
        );
        assert_eq!(cfg.notify.min_interval_secs, 60);
        assert_eq!(cfg.notify.cache_ttl_secs, 86_400);
    }

    #[test]
    fn rejects_inverted_delay_bounds() {
        let file = write_settings(
            r#"
            search_url = "https://swappa.com/listings/x"

            [analysis]
            max_price = 500
            std_dev_multiplier = 1.0

            [poll]
            min_delay_secs = 90
            max_delay_secs = 60
            "#,
        );
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("min_delay_secs"));
    }

    #[test]
    fn rejects_negative_multiplier_and_bad_budget() {
        let file = write_settings(
            r#"
            search_url = "https://swappa.com/listings/x"

            [analysis]
            max_price = 500
            std_dev_multiplier = -1.0
            "#,
        );
        assert!(AppConfig::from_file(file.path()).is_err());

        let file = write_settings(
            r#"
            search_url = "https://swappa.com/listings/x"

            [analysis]
            max_price = 0
            std_dev_multiplier = 1.0
            "#,
        );
        assert!(AppConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn rejects_missing_search_url() {
        let file = write_settings(
            r#"
            [analysis]
            max_price = 500
            std_dev_multiplier = 1.0
            "#,
        );
        assert!(AppConfig::from_file(file.path()).is_err());
    }
}
