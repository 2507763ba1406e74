use clap::Parser;
use oracle_amm::cli::{self, Cli, Commands};
use oracle_amm::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });

    // Initialize telemetry
    oracle_amm::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::QuoteIn(args) => args.execute(&config, cli.json)?,
        Commands::QuoteOut(args) => args.execute(&config, cli.json)?,
        Commands::Join(args) => args.execute(&config, cli.json)?,
        Commands::Exit(args) => args.execute(&config, cli.json)?,
        Commands::Estimate(args) => args.execute(&config, cli.json)?,
        Commands::Config => cli::print_config(&config, cli.json)?,
    }

    Ok(())
}
