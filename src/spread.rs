//! Bull call spread selection over a fetched chain.
//!
//! Pure functions: same chain in, same candidate out.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::constants::CONTRACT_MULTIPLIER;
use crate::error::{Error, Result};
use crate::exchanges::traits::OptionContract;

/// How the long leg was chosen. `FallbackBelowPrice` is the degenerate case
/// where no strike sits at or above the underlying ask and the maximum
/// strike is taken instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongLeg {
    AtOrAbovePrice,
    FallbackBelowPrice,
}

#[derive(Debug, Clone)]
pub struct SpreadCandidate {
    pub long: OptionContract,
    pub short: OptionContract,
}

impl SpreadCandidate {
    /// Debit per share: long ask minus short bid.
    pub fn spread_cost(&self) -> Decimal {
        self.long.ask - self.short.bid
    }

    /// Debit for `quantity` contracts, applying the 100-share multiplier
    /// exactly once.
    pub fn total_cost(&self, quantity: u32) -> Decimal {
        self.spread_cost() * Decimal::from(CONTRACT_MULTIPLIER) * Decimal::from(quantity)
    }
}

/// Distinct strikes ascending, keeping the first-seen contract per strike.
fn distinct_strikes(contracts: &[OptionContract]) -> Vec<(Decimal, &OptionContract)> {
    let mut by_strike: Vec<(Decimal, &OptionContract)> = Vec::new();
    for contract in contracts {
        let strike = contract.strike_value();
        if !by_strike.iter().any(|(s, _)| *s == strike) {
            by_strike.push((strike, contract));
        }
    }
    by_strike.sort_by(|a, b| a.0.cmp(&b.0));
    by_strike
}

/// Index of the long-leg strike in an ascending strike list: the smallest
/// strike at or above the underlying ask, or the maximum strike when every
/// strike sits below the price.
pub fn select_long_leg(underlying_ask: Decimal, strikes: &[Decimal]) -> Option<(usize, LongLeg)> {
    if strikes.is_empty() {
        return None;
    }
    match strikes.iter().position(|s| *s >= underlying_ask) {
        Some(i) => Some((i, LongLeg::AtOrAbovePrice)),
        None => Some((strikes.len() - 1, LongLeg::FallbackBelowPrice)),
    }
}

/// Pick the cheapest-viable bull call spread: long the strike nearest the
/// underlying ask (at or above it), short the strike nearest long + `width`
/// among strikes strictly above the long leg, ties toward the smaller
/// strike.
pub fn select_spread(
    underlying_ask: Decimal,
    contracts: &[OptionContract],
    width: Decimal,
) -> Result<SpreadCandidate> {
    let by_strike = distinct_strikes(contracts);

    if by_strike.len() < 2 {
        return Err(Error::NoValidSpread(format!(
            "need at least two distinct strikes, found {}",
            by_strike.len()
        )));
    }

    let strikes: Vec<Decimal> = by_strike.iter().map(|(s, _)| *s).collect();
    let (long_idx, long_leg) = select_long_leg(underlying_ask, &strikes)
        .ok_or_else(|| Error::NoValidSpread("empty chain".into()))?;
    let (long_strike, long) = by_strike[long_idx];

    if long_leg == LongLeg::FallbackBelowPrice {
        warn!(
            "No strike at or above underlying ask {}; fell back to maximum strike {}",
            underlying_ask, long_strike
        );
    }

    let target = long_strike + width;
    let short = by_strike[long_idx + 1..]
        .iter()
        .min_by(|(a, _), (b, _)| {
            (*a - target)
                .abs()
                .cmp(&(*b - target).abs())
                .then(a.cmp(b))
        })
        .map(|(_, c)| *c);

    let Some(short) = short else {
        let detail = match long_leg {
            LongLeg::AtOrAbovePrice => {
                format!("no strike above long leg {}", long_strike)
            }
            LongLeg::FallbackBelowPrice => format!(
                "every strike is below the underlying ask {}; maximum strike {} leaves no room for a short leg",
                underlying_ask, long_strike
            ),
        };
        return Err(Error::NoValidSpread(detail));
    };

    Ok(SpreadCandidate {
        long: long.clone(),
        short: short.clone(),
    })
}

/// Soonest expiration carrying at least two distinct strikes.
pub fn nearest_expiration(contracts: &[OptionContract]) -> Option<NaiveDate> {
    let mut strikes_by_exp: BTreeMap<NaiveDate, Vec<Decimal>> = BTreeMap::new();
    for contract in contracts {
        let strikes = strikes_by_exp.entry(contract.expiration).or_default();
        let strike = contract.strike_value();
        if !strikes.contains(&strike) {
            strikes.push(strike);
        }
    }
    strikes_by_exp
        .into_iter()
        .find(|(_, strikes)| strikes.len() >= 2)
        .map(|(exp, _)| exp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn contract(root: &str, exp: &str, strike_thousandths: &str, bid: Decimal, ask: Decimal) -> OptionContract {
        let symbol = format!("{}{}C{}", root, exp, strike_thousandths);
        OptionContract::new(symbol, None, bid, ask).unwrap()
    }

    fn bp_chain() -> Vec<OptionContract> {
        vec![
            contract("BP", "250815", "00035000", dec!(0.95), dec!(1.60)),
            contract("BP", "250815", "00037500", dec!(0.50), dec!(0.65)),
            contract("BP", "250815", "00040000", dec!(0.15), dec!(0.30)),
        ]
    }

    #[test]
    fn picks_the_documented_bp_spread() {
        let candidate = select_spread(dec!(33.88), &bp_chain(), dec!(2.5)).unwrap();
        assert_eq!(candidate.long.strike_value(), dec!(35.00));
        assert_eq!(candidate.short.strike_value(), dec!(37.50));
    }

    #[test]
    fn long_strike_is_always_below_short_strike() {
        let chain = bp_chain();
        for ask in [dec!(20), dec!(33.88), dec!(36), dec!(37.49)] {
            let candidate = select_spread(ask, &chain, dec!(2.5)).unwrap();
            assert!(candidate.long.strike_value() < candidate.short.strike_value());
        }
    }

    #[test]
    fn spread_cost_matches_the_worked_example() {
        let chain = vec![
            contract("BP", "250815", "00035000", dec!(1.40), dec!(1.60)),
            contract("BP", "250815", "00037500", dec!(0.50), dec!(0.65)),
        ];
        let candidate = select_spread(dec!(33.88), &chain, dec!(2.5)).unwrap();
        assert_eq!(candidate.spread_cost(), dec!(1.10));
        assert_eq!(candidate.total_cost(1), dec!(110.00));
        assert_eq!(candidate.total_cost(3), dec!(330.00));
    }

    #[test]
    fn short_leg_tie_resolves_to_the_smaller_strike() {
        // Target 36 sits exactly between 35.5 and 36.5.
        let chain = vec![
            contract("BP", "250815", "00033500", dec!(1.40), dec!(1.60)),
            contract("BP", "250815", "00035500", dec!(0.70), dec!(0.85)),
            contract("BP", "250815", "00036500", dec!(0.40), dec!(0.55)),
        ];
        let candidate = select_spread(dec!(33.00), &chain, dec!(2.5)).unwrap();
        assert_eq!(candidate.long.strike_value(), dec!(33.50));
        assert_eq!(candidate.short.strike_value(), dec!(35.50));
    }

    #[test]
    fn duplicate_strikes_collapse_to_the_first_seen_contract() {
        let first = contract("BP", "250815", "00037500", dec!(0.50), dec!(0.65));
        let dupe = contract("BPX", "250815", "00037500", dec!(0.55), dec!(0.70));
        let chain = vec![
            contract("BP", "250815", "00035000", dec!(1.40), dec!(1.60)),
            first.clone(),
            dupe,
        ];
        let candidate = select_spread(dec!(33.88), &chain, dec!(2.5)).unwrap();
        assert_eq!(candidate.short.symbol, first.symbol);
    }

    #[test]
    fn no_strike_at_or_above_price_falls_back_to_the_maximum() {
        let strikes = [dec!(25.0), dec!(27.5), dec!(30.0)];
        let (idx, leg) = select_long_leg(dec!(33.88), &strikes).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(leg, LongLeg::FallbackBelowPrice);

        // The fallback long is the top of the chain, so no short leg can
        // exist and selection reports the degenerate case.
        let chain = vec![
            contract("BP", "250815", "00025000", dec!(8.00), dec!(8.40)),
            contract("BP", "250815", "00027500", dec!(5.60), dec!(6.00)),
            contract("BP", "250815", "00030000", dec!(3.30), dec!(3.70)),
        ];
        let err = select_spread(dec!(33.88), &chain, dec!(2.5)).unwrap_err();
        match err {
            Error::NoValidSpread(msg) => assert!(msg.contains("below the underlying ask")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn fewer_than_two_distinct_strikes_is_no_valid_spread() {
        let chain = vec![
            contract("BP", "250815", "00035000", dec!(1.40), dec!(1.60)),
            contract("BPX", "250815", "00035000", dec!(1.45), dec!(1.65)),
        ];
        assert!(matches!(
            select_spread(dec!(33.88), &chain, dec!(2.5)),
            Err(Error::NoValidSpread(_))
        ));
        assert!(matches!(
            select_spread(dec!(33.88), &[], dec!(2.5)),
            Err(Error::NoValidSpread(_))
        ));
    }

    #[test]
    fn no_strike_above_the_long_leg_is_no_valid_spread() {
        let chain = vec![
            contract("BP", "250815", "00030000", dec!(3.30), dec!(3.70)),
            contract("BP", "250815", "00035000", dec!(1.40), dec!(1.60)),
        ];
        // Long leg lands on 35, the top of the chain.
        assert!(matches!(
            select_spread(dec!(33.88), &chain, dec!(2.5)),
            Err(Error::NoValidSpread(_))
        ));
    }

    #[test]
    fn selection_is_idempotent() {
        let chain = bp_chain();
        let a = select_spread(dec!(33.88), &chain, dec!(2.5)).unwrap();
        let b = select_spread(dec!(33.88), &chain, dec!(2.5)).unwrap();
        assert_eq!(a.long.symbol, b.long.symbol);
        assert_eq!(a.short.symbol, b.short.symbol);
        assert_eq!(a.spread_cost(), b.spread_cost());
    }

    #[test]
    fn nearest_expiration_needs_two_distinct_strikes() {
        let chain = vec![
            // Soonest expiration has a single strike, so it is skipped.
            contract("BP", "250808", "00035000", dec!(1.40), dec!(1.60)),
            contract("BP", "250815", "00035000", dec!(1.20), dec!(1.45)),
            contract("BP", "250815", "00037500", dec!(0.50), dec!(0.65)),
        ];
        assert_eq!(
            nearest_expiration(&chain),
            NaiveDate::from_ymd_opt(2025, 8, 15)
        );
    }

    #[test]
    fn nearest_expiration_on_an_empty_chain_is_none() {
        assert_eq!(nearest_expiration(&[]), None);
    }
}
