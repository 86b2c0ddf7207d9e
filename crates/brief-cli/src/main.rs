//! Command-line interface for equibrief

mod analyze;
mod chat;
mod info;
mod tracking;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "brief")]
#[command(about = "Multi-agent company analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a company with the multi-agent workflow
    Analyze {
        /// Stock ticker (e.g. NVDA, AAPL)
        ticker: String,

        /// User ID for personalization
        #[arg(long, default_value = "default_user")]
        user_id: String,

        /// Simple mode: market snapshot only, no agents
        #[arg(long)]
        simple: bool,
    },

    /// Interactive follow-up questions about a ticker
    Chat {
        /// Stock ticker
        ticker: String,
    },

    /// Show system status
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    brief_utils::init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze {
            ticker,
            user_id,
            simple,
        } => analyze::run(&ticker.to_uppercase(), &user_id, simple).await,
        Command::Chat { ticker } => chat::run(&ticker.to_uppercase()).await,
        Command::Info => {
            info::run();
            Ok(())
        }
    }
}
