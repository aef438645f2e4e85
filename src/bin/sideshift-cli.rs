use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use sideshift_client::client::QuoteRequest;
use sideshift_client::config::{ClientConfig, RetryConfig};
use sideshift_client::SideshiftClient;

#[derive(Parser)]
#[command(name = "sideshift-cli")]
#[command(about = "Command-line access to the SideShift API", long_about = None)]
struct Cli {
    /// Account secret
    #[arg(long, env = "SIDESHIFT_SECRET", hide_env_values = true)]
    secret: String,

    /// Account id, used as affiliateId
    #[arg(long, env = "SIDESHIFT_ID")]
    id: String,

    #[arg(long, env = "SIDESHIFT_COMMISSION_RATE", default_value = "0.5")]
    commission_rate: String,

    #[arg(long, default_value = sideshift_client::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Log every request
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, default_value_t = 5)]
    max_retries: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported coins
    Coins,
    /// Download a coin icon
    Icon {
        coin: String,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Show account permissions
    Permissions,
    /// Rate for one pair
    Pair {
        from: String,
        to: String,
        #[arg(long)]
        amount: Option<f64>,
    },
    /// Rates for several coins
    Pairs {
        #[arg(required = true)]
        coins: Vec<String>,
    },
    /// Look up a shift
    Shift { id: String },
    /// Look up several shifts
    Shifts {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Latest public shifts
    Recent {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// XAI staking statistics
    Stats,
    /// Account information
    Account,
    /// Look up a checkout
    Checkout { id: String },
    /// Request a fixed-rate quote
    Quote {
        #[arg(long)]
        deposit_coin: String,
        #[arg(long)]
        deposit_network: String,
        #[arg(long)]
        settle_coin: String,
        #[arg(long)]
        settle_network: String,
        #[arg(long, conflicts_with = "settle_amount")]
        deposit_amount: Option<f64>,
        #[arg(long)]
        settle_amount: Option<f64>,
    },
    /// Cancel an order
    Cancel { order_id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("sideshift_client=info"))
            .with_writer(std::io::stderr)
            .init();
    }

    let config = ClientConfig::new(cli.secret, cli.id)
        .with_commission_rate(cli.commission_rate)
        .with_base_url(cli.base_url)
        .with_verbose(cli.verbose)
        .with_retries(RetryConfig {
            max_retries: cli.max_retries,
            ..RetryConfig::default()
        });
    let client = SideshiftClient::new(config)?;

    let result = match cli.command {
        Commands::Coins => client.get_coins().await,
        Commands::Icon { coin, output } => {
            let icon = client.get_coin_icon(&coin).await?;
            std::fs::write(&output, &icon.data)?;
            eprintln!(
                "Wrote {} bytes ({}) to {}",
                icon.data.len(),
                icon.content_type.as_deref().unwrap_or("unknown type"),
                output.display()
            );
            return Ok(());
        }
        Commands::Permissions => client.get_permissions().await,
        Commands::Pair { from, to, amount } => client.get_pair(&from, &to, amount).await,
        Commands::Pairs { coins } => client.get_pairs(&coins).await,
        Commands::Shift { id } => client.get_shift(&id).await,
        Commands::Shifts { ids } => client.get_bulk_shifts(&ids).await,
        Commands::Recent { limit } => client.get_recent_shifts(limit).await,
        Commands::Stats => client.get_xai_stats().await,
        Commands::Account => client.get_account().await,
        Commands::Checkout { id } => client.get_checkout(&id).await,
        Commands::Quote {
            deposit_coin,
            deposit_network,
            settle_coin,
            settle_network,
            deposit_amount,
            settle_amount,
        } => {
            let request = QuoteRequest {
                deposit_coin,
                deposit_network,
                settle_coin,
                settle_network,
                deposit_amount,
                settle_amount,
                user_ip: None,
            };
            client.request_quote(&request).await
        }
        Commands::Cancel { order_id } => client.cancel_order(&order_id).await,
    };

    match result {
        Ok(value) => print_value(&value)?,
        Err(err) => {
            eprintln!("Error: {err}");
            if let Some(request) = err.as_request() {
                if let Some(status) = request.status {
                    eprintln!("Status: {status}");
                }
                eprintln!("Details: {}", request.payload);
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_value(value: &Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
