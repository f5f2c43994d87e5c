use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub alpaca: AlpacaConfig,
    pub spread: SpreadConfig,
}

#[derive(Debug, Clone)]
pub struct AlpacaConfig {
    pub api_key_id: String,
    pub api_secret_key: String,
}

#[derive(Debug, Clone)]
pub struct SpreadConfig {
    pub symbol: String,
    /// Desired difference between the long and short strikes.
    pub strike_width: Decimal,
    pub quantity: u32,
    /// Pin the chain to a specific expiration; nearest otherwise.
    pub expiration: Option<NaiveDate>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let alpaca = match std::env::var("ALPACA_KEY_FILE") {
            Ok(path) => AlpacaConfig::from_key_file(&path)?,
            Err(_) => AlpacaConfig::from_env_vars()?,
        };

        let symbol = std::env::var("SPREAD_SYMBOL")
            .unwrap_or_else(|_| "BP".to_string())
            .trim()
            .to_uppercase();

        let strike_width = match std::env::var("SPREAD_STRIKE_WIDTH") {
            Ok(raw) => raw
                .trim()
                .parse::<Decimal>()
                .map_err(|_| Error::Config(format!("invalid SPREAD_STRIKE_WIDTH: {}", raw)))?,
            Err(_) => Decimal::new(25, 1),
        };

        let quantity = match std::env::var("SPREAD_QUANTITY") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| Error::Config(format!("invalid SPREAD_QUANTITY: {}", raw)))?,
            Err(_) => 1,
        };

        let expiration = match std::env::var("SPREAD_EXPIRATION") {
            Ok(raw) => Some(
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .map_err(|_| Error::Config(format!("invalid SPREAD_EXPIRATION: {}", raw)))?,
            ),
            Err(_) => None,
        };

        Ok(Config {
            alpaca,
            spread: SpreadConfig {
                symbol,
                strike_width,
                quantity,
                expiration,
            },
        })
    }
}

impl AlpacaConfig {
    fn from_env_vars() -> Result<Self> {
        let api_key_id = std::env::var("APCA_API_KEY_ID")
            .map_err(|_| Error::Config("APCA_API_KEY_ID not set".into()))?;

        let api_secret_key = std::env::var("APCA_API_SECRET_KEY")
            .map_err(|_| Error::Config("APCA_API_SECRET_KEY not set".into()))?;

        Ok(Self {
            api_key_id,
            api_secret_key,
        })
    }

    /// Key and secret on the first two lines of a plain text file.
    pub fn from_key_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_key_file(&contents)
            .ok_or_else(|| Error::Config(format!("key file {} needs two non-empty lines", path)))
    }

    fn parse_key_file(contents: &str) -> Option<Self> {
        let mut lines = contents.lines().map(str::trim).filter(|l| !l.is_empty());
        let api_key_id = lines.next()?.to_string();
        let api_secret_key = lines.next()?.to_string();
        Some(Self {
            api_key_id,
            api_secret_key,
        })
    }
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            symbol: "BP".to_string(),
            strike_width: Decimal::new(25, 1),
            quantity: 1,
            expiration: None,
        }
    }
}
