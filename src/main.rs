use clap::Parser;
use insider_exchange::cli::{commands, Cli, Commands};
use insider_exchange::core::{Config, ExchangeError};

#[tokio::main]
async fn main() -> Result<(), ExchangeError> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load configuration
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    config.validate()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Quote(args) => commands::quote::execute(args, &config).await?,
        Commands::Pools(args) => commands::pools::execute(args, &config).await?,
        Commands::Prices(args) => commands::prices::execute(args, &config).await?,
        Commands::Score(args) => commands::score::execute(args, &config).await?,
    }

    Ok(())
}
