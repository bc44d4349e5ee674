//! Validate configuration command.

use anyhow::Result;
use pricecast_config::AppConfig;

use crate::cli::ValidateArgs;

pub fn run(config: &AppConfig, args: &ValidateArgs) -> Result<()> {
    match config.validate() {
        Ok(()) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Chart endpoint: {}", config.provider.chart_url);
            println!("Retries: {}", config.provider.retry.max_retries);
            println!(
                "Analysis: {} -> {}, horizon {}, range {}",
                config.analysis.interval,
                config.analysis.output,
                config.analysis.horizon,
                config.analysis.range
            );
            println!("Order mode: {:?}", config.analysis.order.kind);
            println!("Holidays: {}", config.calendar.holidays.len());
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    if args.print {
        println!();
        print!("{}", config.to_toml()?);
    }
    Ok(())
}
