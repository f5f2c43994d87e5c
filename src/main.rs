use bull_spread::app::run;
use bull_spread::config::Config;
use bull_spread::error::Result;
use bull_spread::logging::init;

#[tokio::main]
async fn main() -> Result<()> {
    init();

    let config = Config::from_env()?;

    run(config).await
}
