//! Console rendering for a selected spread.

use crate::exchanges::traits::UnderlyingQuote;
use crate::spread::SpreadCandidate;

/// Render the result block. Pure so the exact lines stay testable.
pub fn render(quote: &UnderlyingQuote, candidate: &SpreadCandidate, quantity: u32) -> String {
    let mut out = String::new();

    out.push_str(&format!("Bull Call Spread for {}:\n", quote.symbol));
    out.push_str(&format!("Stock Price: ${:.2}\n", quote.ask));
    out.push_str(&format!(
        "Buy Call (Long): {} Bid: ${:.2}, Ask: ${:.2}\n",
        candidate.long.symbol, candidate.long.bid, candidate.long.ask
    ));
    out.push_str(&format!(
        "Sell Call (Short): {} Bid: ${:.2}, Ask: ${:.2}\n",
        candidate.short.symbol, candidate.short.bid, candidate.short.ask
    ));
    out.push_str(&format!(
        "Spread Cost (per contract): ${:.2}\n",
        candidate.spread_cost()
    ));
    out.push_str(&format!(
        "Total Cost (for {} contract(s)): ${:.2}\n",
        quantity,
        candidate.total_cost(quantity)
    ));

    out
}

pub fn print(quote: &UnderlyingQuote, candidate: &SpreadCandidate, quantity: u32) {
    print!("{}", render(quote, candidate, quantity));
}
