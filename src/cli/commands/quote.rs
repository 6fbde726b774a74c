use crate::cli::{display::ExchangeDisplay, QuoteArgs};
use crate::core::{Config, ExchangeError, ExchangeResult};
use crate::quotes::{QuoteBook, SwapBook, SwapQuoteEngine};
use crate::utils::parse_symbol;
use chrono::Utc;
use colored::*;
use log::info;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::seeded_market;

pub async fn execute(args: QuoteArgs, config: &Config) -> ExchangeResult<()> {
    let from = parse_symbol(&args.from)?;
    let to = parse_symbol(&args.to)?;

    if from == to {
        println!("{}", "❌ Cannot swap token to itself".red().bold());
        return Ok(());
    }

    let slippage = args.slippage.unwrap_or(config.default_slippage_pct);
    if !(0.0..=config.max_slippage_pct).contains(&slippage) {
        return Err(ExchangeError::InvalidSlippage(format!(
            "{}% is outside 0%..={}%",
            slippage, config.max_slippage_pct
        )));
    }
    let slippage_pct = Decimal::from_f64(slippage)
        .ok_or_else(|| ExchangeError::InvalidSlippage(slippage.to_string()))?;

    let (registry, oracle) = seeded_market();
    let engine = SwapQuoteEngine::with_config(oracle, registry, config);

    info!(
        "Quoting {} {} -> {} (slippage: {}%)",
        args.amount, from, to, slippage_pct
    );

    let quote = engine.quote(&from, &to, args.amount, slippage_pct)?;

    let user_address = match args.execute {
        Some(user_address) => user_address,
        None => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                println!("{}", "🚀 Insider Exchange Quote".bold().cyan());
                ExchangeDisplay::display_quote(&quote);
            }
            return Ok(());
        }
    };

    let quote_id = quote.id;
    let swaps = SwapBook::new(Arc::new(QuoteBook::new()));
    swaps.quotes().register(quote);
    let swap = swaps.submit(&quote_id, &user_address, Utc::now())?;
    let swap = swaps.execute(&swap.id, Utc::now())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&swap)?);
    } else {
        println!("{}", "🚀 Insider Exchange Swap".bold().cyan());
        ExchangeDisplay::display_quote(&swap.quote);
        ExchangeDisplay::display_swap(&swap);
    }

    Ok(())
}
