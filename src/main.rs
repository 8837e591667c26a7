use anyhow::Result;
use clap::{Parser, Subcommand};
use defender_savings::config::{self, Config, DEFAULT_CONFIG_FILE};
use defender_savings::error::SavingsError;
use defender_savings::exit_codes::exit_code_for_anyhow;
use defender_savings::inventory::{fetch_inventory, list_subscription_configs, InventoryClient};
use defender_savings::output::{self, OutputFormat};
use defender_savings::{build_report, PricingTable, ResourceCounter};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "defender-savings")]
#[command(
    about = "Defender for Cloud cost and savings report",
    long_about = "defender-savings reads Defender for Cloud plan settings and Azure resource inventory\nfrom the Orca serving-layer API and reports what each enabled plan costs per cloud account,\nand what disabling it would save."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (overrides --log-level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Inventory API token (falls back to TOKEN in .env)
    #[arg(long, global = true, env = "TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch inventory and print the cost and savings report (default)
    Report,
    /// Show the built-in pricing table
    Pricing,
    /// Write a default configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(cli.log_level.to_lowercase()).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("ERROR: {:#}", e);
        std::process::exit(exit_code_for_anyhow(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Report);

    match command {
        Commands::Init { output } => {
            config::init_config(&output)?;
        }
        Commands::Pricing => {
            let pricing = PricingTable::default_table().map_err(SavingsError::from)?;
            println!("{}", output::pricing_table(&pricing));
        }
        Commands::Report => {
            let config = Config::load(cli.config.as_deref())?;
            let pricing = PricingTable::default_table().map_err(SavingsError::from)?;
            let token = config::resolve_token(cli.token, &std::env::current_dir()?)?;
            let client = InventoryClient::new(&config.api, &token)?;

            info!("Fetching Defender configurations");
            let configs = list_subscription_configs(&client).await?;

            info!("Fetching resources");
            let inventory = fetch_inventory(&client).await?;

            let counter = ResourceCounter::new(&configs);
            let counts = counter.count_resources_per_account(&inventory);

            let report = build_report(&configs, &counts, &pricing);
            output::print_report(&report, cli.output)?;
        }
    }

    Ok(())
}
