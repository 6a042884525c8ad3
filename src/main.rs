use clap::Parser;
use momentum_price::cli::{AppContext, Cli, Commands};
use momentum_price::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::parse(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    momentum_price::telemetry::init_telemetry(&config.telemetry)?;

    let fixture = cli.fixture.as_deref();
    match cli.command {
        Commands::Price(args) => args.execute(&AppContext::new(config, fixture)?).await?,
        Commands::Series(args) => args.execute(&AppContext::new(config, fixture)?).await?,
        Commands::Batch(args) => args.execute(&AppContext::new(config, fixture)?).await?,
        Commands::Quote(args) => args.execute(&AppContext::new(config, fixture)?).await?,
        Commands::Changes(args) => args.execute(&AppContext::new(config, fixture)?).await?,
        Commands::Volume(args) => args.execute(&AppContext::new(config, fixture)?).await?,
        Commands::Percentage(args) => args.execute()?,
        Commands::Config => {
            println!("Current configuration:");
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
