use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::occ;

/// Where a contract's strike came from. Alpaca's chain snapshots omit the
/// strike field, in which case it is derived from the OCC symbol once at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strike {
    Provided(Decimal),
    Derived(Decimal),
}

impl Strike {
    pub fn value(&self) -> Decimal {
        match self {
            Strike::Provided(v) | Strike::Derived(v) => *v,
        }
    }
}

/// One call contract out of the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionContract {
    pub symbol: String,
    pub strike: Strike,
    pub bid: Decimal,
    pub ask: Decimal,
    pub expiration: NaiveDate,
}

impl OptionContract {
    /// Resolve the strike and expiration, preferring a source-provided
    /// strike over the symbol-derived one.
    pub fn new(
        symbol: String,
        provided_strike: Option<Decimal>,
        bid: Decimal,
        ask: Decimal,
    ) -> Result<Self> {
        let strike = match provided_strike {
            Some(v) => Strike::Provided(v),
            None => Strike::Derived(occ::parse_strike(&symbol)?),
        };
        let expiration = occ::parse_expiration(&symbol)?;
        Ok(Self {
            symbol,
            strike,
            bid,
            ask,
            expiration,
        })
    }

    pub fn strike_value(&self) -> Decimal {
        self.strike.value()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnderlyingQuote {
    pub symbol: String,
    pub ask: Decimal,
}

/// Market-data collaborator the pipeline runs against.
#[async_trait]
pub trait MarketData {
    /// Latest ask price for the underlying.
    async fn fetch_latest_ask(&self, symbol: &str) -> Result<UnderlyingQuote>;

    /// Call contracts for the underlying, optionally pinned to one
    /// expiration and windowed to a strike range.
    async fn fetch_call_chain(
        &self,
        underlying: &str,
        expiration: Option<NaiveDate>,
        strike_window: Option<(Decimal, Decimal)>,
    ) -> Result<Vec<OptionContract>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn provided_strike_wins_over_symbol() {
        let c = OptionContract::new(
            "BP250815C00035000".to_string(),
            Some(dec!(36)),
            dec!(0.50),
            dec!(1.60),
        )
        .unwrap();
        assert_eq!(c.strike, Strike::Provided(dec!(36)));
        assert_eq!(c.strike_value(), dec!(36));
    }

    #[test]
    fn missing_strike_is_derived_from_the_symbol() {
        let c = OptionContract::new("BP250815C00035000".to_string(), None, dec!(0.50), dec!(1.60))
            .unwrap();
        assert_eq!(c.strike, Strike::Derived(dec!(35.000)));
        assert_eq!(
            c.expiration,
            chrono::NaiveDate::from_ymd_opt(2025, 8, 15).unwrap()
        );
    }

    #[test]
    fn malformed_symbol_fails_construction() {
        assert!(OptionContract::new("BP250815X00035000".to_string(), None, dec!(0), dec!(0)).is_err());
    }
}
