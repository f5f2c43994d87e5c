use tracing::info;

use crate::config::{Config, SpreadConfig};
use crate::constants::STRIKE_WINDOW;
use crate::error::{Error, Result};
use crate::exchanges::alpaca::AlpacaClient;
use crate::exchanges::traits::MarketData;
use crate::report;
use crate::spread::{self, SpreadCandidate};

pub async fn run(config: Config) -> Result<()> {
    let client = AlpacaClient::new(config.alpaca.clone());
    run_with(&client, &config.spread).await?;
    Ok(())
}

/// The whole pipeline: quote, chain, nearest expiration, selection, report.
/// Generic over the market-data source so tests can stub it.
pub async fn run_with<M: MarketData + Sync>(
    market: &M,
    cfg: &SpreadConfig,
) -> Result<SpreadCandidate> {
    info!("Bull call spread search for {}", cfg.symbol);

    let quote = market.fetch_latest_ask(&cfg.symbol).await?;
    info!("Latest ask for {}: ${}", quote.symbol, quote.ask);

    let window = (quote.ask - STRIKE_WINDOW, quote.ask + STRIKE_WINDOW);
    let chain = market
        .fetch_call_chain(&cfg.symbol, cfg.expiration, Some(window))
        .await?;
    info!("Fetched {} quoted call contracts", chain.len());

    let chain: Vec<_> = match cfg.expiration {
        Some(exp) => chain.into_iter().filter(|c| c.expiration == exp).collect(),
        None => {
            let exp = spread::nearest_expiration(&chain).ok_or_else(|| {
                Error::NoValidSpread(format!(
                    "no expiration with two distinct strikes for {}",
                    cfg.symbol
                ))
            })?;
            info!("Using nearest expiration {}", exp);
            chain.into_iter().filter(|c| c.expiration == exp).collect()
        }
    };

    let candidate = spread::select_spread(quote.ask, &chain, cfg.strike_width)?;

    // Both legs must expire together for a multi-leg order to make sense.
    if candidate.long.expiration != candidate.short.expiration {
        return Err(Error::NoValidSpread(format!(
            "mismatched expirations: {} vs {}",
            candidate.long.expiration, candidate.short.expiration
        )));
    }

    info!(
        "Selected long {} / short {}",
        candidate.long.symbol, candidate.short.symbol
    );

    report::print(&quote, &candidate, cfg.quantity);

    Ok(candidate)
}
