//! Resolve command implementation.

use anyhow::Result;
use pricecast_core::Provenance;
use pricecast_data::SymbolResolver;

use crate::cli::sources::Sources;
use crate::cli::ResolveArgs;

pub async fn run(args: ResolveArgs, sources: Sources) -> Result<()> {
    let resolver = SymbolResolver::new(sources.provider, sources.search);
    let resolved = resolver.resolve(&args.query).await?;

    println!("{}", resolved.as_str());
    match &resolved.provenance {
        Provenance::DirectHit => println!("  via direct quote"),
        Provenance::Searched { exchange, name } => {
            println!("  via symbol search");
            if let Some(name) = name {
                println!("  name:     {}", name);
            }
            if let Some(exchange) = exchange {
                println!("  exchange: {}", exchange);
            }
        }
    }
    Ok(())
}
