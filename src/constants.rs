use rust_decimal::Decimal;

pub const ALPACA_DATA_URL: &str = "https://data.alpaca.markets";

/// Options quotes come off the OPRA feed.
pub const OPRA_FEED: &str = "opra";

/// Standard equity option contract multiplier (shares per contract).
pub const CONTRACT_MULTIPLIER: u32 = 100;

/// Chain requests are windowed to strikes within this distance of the
/// underlying price.
pub const STRIKE_WINDOW: Decimal = Decimal::from_parts(10, 0, 0, false, 0);
