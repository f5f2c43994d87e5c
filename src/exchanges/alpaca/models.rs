use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// `GET /v2/stocks/{symbol}/quotes/latest`
#[derive(Debug, Deserialize)]
pub struct LatestQuoteResponse {
    pub symbol: String,
    pub quote: Option<StockQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockQuote {
    #[serde(rename = "ap")]
    pub ask_price: Decimal,
    #[serde(rename = "bp")]
    pub bid_price: Decimal,
}

/// `GET /v1beta1/options/snapshots/{underlying}` — one page of the chain.
#[derive(Debug, Deserialize)]
pub struct OptionChainResponse {
    #[serde(default)]
    pub snapshots: HashMap<String, OptionSnapshot>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionSnapshot {
    #[serde(rename = "latestQuote")]
    pub latest_quote: Option<OptionQuote>,
    /// Present on the contracts endpoint, absent from chain snapshots.
    #[serde(default, alias = "strikePrice")]
    pub strike_price: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionQuote {
    #[serde(rename = "ap")]
    pub ask_price: Decimal,
    #[serde(rename = "bp")]
    pub bid_price: Decimal,
}
