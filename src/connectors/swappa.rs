// src/connectors/swappa.rs
use crate::connectors::traits::ListingSource;
use crate::error::ConnectorError;
use crate::types::{Condition, Listing, UNKNOWN_SIZE};
use crate::utils::jitter::pick_user_agent;
use async_trait::async_trait;
use reqwest::{header, Client};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const ROW: &str = "tr";
const PRICE: &str = "strong.fs-6 span[itemprop='price']";
const LINK: &str = "a[aria-controls='slide_listing_update_price']";
const CELL: &str = "td";

struct Selectors {
    row: Selector,
    price: Selector,
    link: Selector,
    cell: Selector,
}

impl Selectors {
    fn new() -> Result<Self, ConnectorError> {
        let parse = |css: &str| {
            Selector::parse(css).map_err(|e| ConnectorError::Selector(format!("{css}: {e}")))
        };
        Ok(Self {
            row: parse(ROW)?,
            price: parse(PRICE)?,
            link: parse(LINK)?,
            cell: parse(CELL)?,
        })
    }
}

pub struct SwappaClient {
    http_client: Client,
    search_url: Url,
    user_agents: Vec<String>,
    retries: u32,
    selectors: Selectors,
}

impl SwappaClient {
    pub fn new(
        search_url: &str,
        user_agents: Vec<String>,
        retries: u32,
        timeout: Duration,
    ) -> Result<Self, ConnectorError> {
        Ok(Self {
            http_client: Client::builder().timeout(timeout).build()?,
            search_url: Url::parse(search_url)?,
            user_agents,
            retries,
            selectors: Selectors::new()?,
        })
    }

    async fn fetch_page(&self) -> Result<String, ConnectorError> {
        let mut request = self.http_client.get(self.search_url.clone());
        if let Some(agent) = pick_user_agent(&self.user_agents) {
            info!("Using User-Agent: {}", agent);
            request = request.header(header::USER_AGENT, agent);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::Status {
                status,
                target: self.search_url.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    /// Extracts listing rows from a search page. Rows without a usable price
    /// or link are skipped; missing size or condition fall back to "Unknown".
    pub fn parse_listings(&self, html: &str) -> Vec<Listing> {
        let doc = Html::parse_document(html);
        doc.select(&self.selectors.row)
            .filter_map(|row| self.parse_row(row))
            .collect()
    }

    fn parse_row(&self, row: ElementRef<'_>) -> Option<Listing> {
        let price_text = row
            .select(&self.selectors.price)
            .next()?
            .text()
            .collect::<String>();
        let price = parse_price(&price_text)?;

        let href = row.select(&self.selectors.link).next()?.value().attr("href")?;
        let link = self.search_url.join(href.trim()).ok()?.to_string();

        let cells: Vec<String> = row
            .select(&self.selectors.cell)
            .map(|td| td.text().collect::<String>().trim().to_string())
            .collect();

        let size = cells
            .iter()
            .find(|text| text.contains("GB") || text.contains("TB"))
            .cloned()
            .unwrap_or_else(|| UNKNOWN_SIZE.to_string());

        let condition = cells
            .iter()
            .find_map(|text| Condition::from_label(text))
            .unwrap_or(Condition::Unknown);

        Some(Listing {
            price,
            size,
            condition,
            link,
        })
    }
}

fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ','))
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0)
}

#[async_trait]
impl ListingSource for SwappaClient {
    async fn fetch(&self) -> Result<Vec<Listing>, ConnectorError> {
        let mut attempt = 0;
        let body = loop {
            match self.fetch_page().await {
                Ok(body) => break body,
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    warn!("Fetch attempt {} failed: {}. Retrying...", attempt, e);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
                Err(e) => return Err(e),
            }
        };

        let listings = self.parse_listings(&body);
        debug!(count = listings.len(), "Parsed listings");
        Ok(listings)
    }
}
