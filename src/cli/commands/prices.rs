use crate::cli::{display::ExchangeDisplay, PricesArgs};
use crate::core::{Config, ExchangeError, ExchangeResult};
use crate::utils::parse_symbol;
use colored::*;

use super::seeded_market;

pub async fn execute(args: PricesArgs, _config: &Config) -> ExchangeResult<()> {
    println!("{}", "🚀 Insider Exchange Prices".bold().cyan());

    let (_, oracle) = seeded_market();

    let tokens = if let Some(query) = &args.search {
        oracle.search(query)
    } else if args.symbols.is_empty() {
        oracle.tokens()
    } else {
        args.symbols
            .iter()
            .map(|s| {
                let symbol = parse_symbol(s)?;
                oracle
                    .get_token(&symbol)
                    .ok_or(ExchangeError::UnknownToken(symbol))
            })
            .collect::<ExchangeResult<Vec<_>>>()?
    };

    if tokens.is_empty() {
        println!("{}", "❌ No tokens found".red().bold());
        return Ok(());
    }

    ExchangeDisplay::display_tokens(&tokens);
    println!(
        "\n{}",
        "💡 Prices are implied by pool reserves, stablecoins pegged at $1".dimmed()
    );

    Ok(())
}
