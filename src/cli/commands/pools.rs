use crate::cli::{display::ExchangeDisplay, PoolSort, PoolsArgs};
use crate::core::{Config, ExchangeResult};
use crate::discovery::{default_pools, StaticPoolRegistry};
use crate::utils::parse_symbol;
use colored::*;
use log::info;

pub async fn execute(args: PoolsArgs, _config: &Config) -> ExchangeResult<()> {
    println!("{}", "🚀 Insider Exchange Pools".bold().cyan());

    let registry = StaticPoolRegistry::new(default_pools());
    let token = args.token.as_deref().map(parse_symbol).transpose()?;

    info!("Listing pools by {:?} (limit {})", args.sort, args.limit);

    let ranked = match args.sort {
        PoolSort::Tvl => registry.top_by_tvl(registry.all().len()),
        PoolSort::Volume => registry.top_by_volume(registry.all().len()),
        PoolSort::Apr => registry.top_by_apr(registry.all().len()),
    };

    let pools: Vec<_> = ranked
        .into_iter()
        .filter(|pool| token.as_deref().map_or(true, |t| pool.contains(t)))
        .take(args.limit)
        .collect();

    if pools.is_empty() {
        println!("{}", "❌ No pools found".red().bold());
        return Ok(());
    }

    ExchangeDisplay::display_pool_list(&pools, &registry.total_stats());

    Ok(())
}
