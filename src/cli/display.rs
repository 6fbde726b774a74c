use crate::core::{Pool, Quote, ScoreResult, Swap, Token, POOL_DISPLAY_NAME};
use crate::discovery::PoolStats;
use crate::prediction::{PathComparison, PayoutTier};
use crate::utils::{format_amount, format_compact_usd, format_usd};
use colored::*;
use console::style;
use rust_decimal::Decimal;

/// Terminal rendering for the CLI commands
pub struct ExchangeDisplay;

impl ExchangeDisplay {
    pub fn display_quote(quote: &Quote) {
        println!("\n{}", style("💱 Swap Quote").bold().underlined());
        println!(
            "  {} {} → {} {}",
            format_amount(quote.from_amount, 8),
            quote.from_token.bold(),
            format_amount(quote.to_amount, 8).green().bold(),
            quote.to_token.bold()
        );
        println!(
            "  Rate: 1 {} = {} {} | 1 {} = {} {}",
            quote.from_token,
            format_amount(quote.rate, 8),
            quote.to_token,
            quote.to_token,
            format_amount(quote.inverse_rate, 8),
            quote.from_token
        );
        println!(
            "  Price Impact: {} | Slippage: {}%",
            format_impact(quote.price_impact_pct),
            quote.slippage_pct.normalize()
        );
        println!(
            "  Min Received: {} {}",
            format_amount(quote.min_received, 8),
            quote.to_token
        );

        let route_str = quote.route.to_string();
        let route_colored = if quote.route.is_virtual() {
            format!("{} ({} virtual pool)", route_str, POOL_DISPLAY_NAME).yellow()
        } else if quote.route.is_multi_hop() {
            route_str.cyan()
        } else {
            route_str.green()
        };
        println!("  Route: {}", route_colored);
        for hop in &quote.route.hops {
            println!(
                "    {} {} → {} ({}% fee)",
                style("►").cyan(),
                hop.from_symbol,
                hop.to_symbol,
                (hop.fee_rate * Decimal::ONE_HUNDRED).normalize()
            );
            println!("      Pool: {}", style(&hop.pool_id).dim());
        }

        println!(
            "  Pool Fees: {} | Gas: {} ({} gas)",
            format_usd(quote.fee_usd),
            format_usd(quote.gas_fee_usd),
            quote.gas_limit
        );
        println!(
            "  Quote {} expires {}",
            style(quote.id).dim(),
            style(quote.expires_at.format("%H:%M:%S UTC")).dim()
        );
    }

    pub fn display_pool_list(pools: &[&Pool], stats: &PoolStats) {
        println!("\n{}", style("🏊 Liquidity Pools").bold().underlined());
        println!(
            "Total TVL: {} | 24h Volume: {} | 24h Fees: {}\n",
            format_compact_usd(stats.total_tvl).green().bold(),
            format_compact_usd(stats.total_volume_24h),
            format_compact_usd(stats.total_fees_24h)
        );

        for (i, pool) in pools.iter().enumerate() {
            println!(
                "{}. {}/{} {}",
                i + 1,
                pool.token_a.bold(),
                pool.token_b.bold(),
                style(format!("[{}]", pool.network)).dim()
            );
            println!(
                "   TVL: {} | Volume 24h: {} | Fee: {}% | APR: {}",
                format_compact_usd(pool.tvl),
                format_compact_usd(pool.volume_24h),
                (pool.fee_rate * Decimal::ONE_HUNDRED).normalize(),
                format!("{}%", pool.apr().normalize()).green()
            );
            if let Some(reserves) = &pool.reserves {
                println!(
                    "   Reserves: {} {} | {} {}",
                    format_amount(reserves.reserve_a, 2),
                    pool.token_a,
                    format_amount(reserves.reserve_b, 2),
                    pool.token_b
                );
            }
            println!("   Id: {}", style(&pool.id).dim());
        }
    }

    pub fn display_swap(swap: &Swap) {
        println!("\n{}", style("✅ Swap Executed").bold().underlined());
        println!("  Swap: {}", style(swap.id).dim());
        println!(
            "  {} {} → {} {}",
            format_amount(swap.quote.from_amount, 8),
            swap.quote.from_token.bold(),
            format_amount(swap.quote.to_amount, 8).green().bold(),
            swap.quote.to_token.bold()
        );
        println!("  Wallet: {}", swap.user_address);
        println!("  Status: {:?}", swap.status);
        if let Some(tx_hash) = &swap.tx_hash {
            println!("  Tx: {}", style(tx_hash).cyan());
        }
        if let Some(confirmed_at) = swap.confirmed_at {
            println!("  Confirmed: {}", confirmed_at.format("%H:%M:%S UTC"));
        }
    }

    pub fn display_tokens(tokens: &[Token]) {
        println!("\n{}", style("📈 Token Prices").bold().underlined());
        for token in tokens {
            println!(
                "  {:<6} {:<12} {:>16}  {}",
                token.symbol.bold(),
                token.name,
                format_usd(token.price),
                format_change(token.price_change_24h)
            );
        }
    }

    pub fn display_score(result: &ScoreResult, comparison: Option<&PathComparison>) {
        println!("\n{}", style("🎯 Prediction Score").bold().underlined());

        match comparison {
            Some(c) => println!(
                "  Ticks: {} | Path error: {:.3}%",
                c.ticks,
                c.error_pct()
            ),
            None => println!(
                "  {}",
                "Paths do not overlap a full tick, scored as zero".yellow()
            ),
        }

        let score_str = format!("{:.4}", result.score);
        let score_colored = if result.score >= 0.9 {
            score_str.green()
        } else if result.score >= 0.5 {
            score_str.yellow()
        } else {
            score_str.red()
        };
        println!("  Score: {}", score_colored.bold());
        println!("  Multiplier: {}", format!("{}x", result.multiplier).bold());
    }

    pub fn display_payout_table(stake: f64, payout: f64, table: &[PayoutTier]) {
        println!(
            "\n  Payout on {}: {}",
            stake,
            format!("{:.2}", payout).green().bold()
        );
        println!("  {}", style("Payout table").dim());
        for tier in table {
            println!(
                "    {:<16} {:>6}x  {:>12.2}",
                tier.label, tier.multiplier, tier.payout
            );
        }
    }
}

/// Format price impact with color
fn format_impact(impact_pct: Decimal) -> ColoredString {
    let impact_str = format!("{}%", impact_pct.normalize());
    if impact_pct < Decimal::new(1, 1) {
        impact_str.green()
    } else if impact_pct < Decimal::ONE {
        impact_str.yellow()
    } else {
        impact_str.red()
    }
}

fn format_change(change_pct: Decimal) -> ColoredString {
    if change_pct > Decimal::ZERO {
        format!("+{}%", change_pct.normalize()).green()
    } else if change_pct < Decimal::ZERO {
        format!("{}%", change_pct.normalize()).red()
    } else {
        "0%".normal()
    }
}
