pub mod alpaca;
pub mod traits;

pub use traits::{MarketData, OptionContract, Strike, UnderlyingQuote};
