//! Alpaca market-data REST client.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::models::{LatestQuoteResponse, OptionChainResponse};
use crate::config::AlpacaConfig;
use crate::constants::{ALPACA_DATA_URL, OPRA_FEED};
use crate::error::{Error, Result};
use crate::exchanges::traits::{MarketData, OptionContract, UnderlyingQuote};

pub struct AlpacaClient {
    config: AlpacaConfig,
    http: HttpClient,
    base_url: String,
}

impl AlpacaClient {
    pub fn new(config: AlpacaConfig) -> Self {
        Self {
            config,
            http: HttpClient::new(),
            base_url: ALPACA_DATA_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        let resp = self
            .http
            .get(url)
            .query(params)
            .header("accept", "application/json")
            .header("APCA-API-KEY-ID", &self.config.api_key_id)
            .header("APCA-API-SECRET-KEY", &self.config.api_secret_key)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http(format!("HTTP {}: {}", status, body)));
        }

        resp.json().await.map_err(|e| Error::Http(e.to_string()))
    }

    /// Fetch one page of the chain and append usable contracts.
    async fn fetch_chain_page(
        &self,
        underlying: &str,
        params: &[(String, String)],
        out: &mut Vec<OptionContract>,
    ) -> Result<Option<String>> {
        let url = format!("{}/v1beta1/options/snapshots/{}", self.base_url, underlying);
        let page: OptionChainResponse = self.get_json(&url, params).await?;

        for (symbol, snapshot) in page.snapshots {
            let Some(quote) = snapshot.latest_quote else {
                debug!("Skipping {}: no quote", symbol);
                continue;
            };
            if quote.bid_price <= Decimal::ZERO {
                debug!("Skipping illiquid contract {}", symbol);
                continue;
            }
            match OptionContract::new(
                symbol,
                snapshot.strike_price,
                quote.bid_price,
                quote.ask_price,
            ) {
                Ok(contract) => out.push(contract),
                Err(e) => warn!("Skipping contract: {}", e),
            }
        }

        Ok(page.next_page_token.filter(|t| !t.is_empty()))
    }
}

#[async_trait]
impl MarketData for AlpacaClient {
    async fn fetch_latest_ask(&self, symbol: &str) -> Result<UnderlyingQuote> {
        let url = format!("{}/v2/stocks/{}/quotes/latest", self.base_url, symbol);
        let resp: LatestQuoteResponse = self
            .get_json(&url, &[("feed".to_string(), "iex".to_string())])
            .await?;

        let quote = resp
            .quote
            .ok_or_else(|| Error::QuoteUnavailable(format!("no quote for {}", symbol)))?;

        if quote.ask_price <= Decimal::ZERO {
            return Err(Error::QuoteUnavailable(format!(
                "non-positive ask {} for {}",
                quote.ask_price, symbol
            )));
        }

        Ok(UnderlyingQuote {
            symbol: resp.symbol,
            ask: quote.ask_price,
        })
    }

    async fn fetch_call_chain(
        &self,
        underlying: &str,
        expiration: Option<NaiveDate>,
        strike_window: Option<(Decimal, Decimal)>,
    ) -> Result<Vec<OptionContract>> {
        let mut params = vec![
            ("feed".to_string(), OPRA_FEED.to_string()),
            ("type".to_string(), "call".to_string()),
        ];
        if let Some(exp) = expiration {
            params.push(("expiration_date".to_string(), exp.format("%Y-%m-%d").to_string()));
        }
        if let Some((gte, lte)) = strike_window {
            params.push(("strike_price_gte".to_string(), gte.to_string()));
            params.push(("strike_price_lte".to_string(), lte.to_string()));
        }

        let mut contracts = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut page_params = params.clone();
            if let Some(token) = &cursor {
                page_params.push(("page_token".to_string(), token.clone()));
            }

            match self
                .fetch_chain_page(underlying, &page_params, &mut contracts)
                .await?
            {
                Some(token) => cursor = Some(token),
                None => break,
            }
        }

        if contracts.is_empty() {
            return Err(Error::ChainUnavailable(format!(
                "no quoted call contracts for {}",
                underlying
            )));
        }

        Ok(contracts)
    }
}
