use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Quote unavailable: {0}")]
    QuoteUnavailable(String),

    #[error("Option chain unavailable: {0}")]
    ChainUnavailable(String),

    #[error("Malformed contract symbol: {0}")]
    Parse(String),

    #[error("No valid spread: {0}")]
    NoValidSpread(String),
}
