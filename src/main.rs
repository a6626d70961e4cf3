use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxc::core::Currency;
use fxc::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxc::AppCommand {
    fn from(cmd: Commands) -> fxc::AppCommand {
        match cmd {
            Commands::Currencies => fxc::AppCommand::Currencies,
            Commands::Convert { amount, from, to } => fxc::AppCommand::Convert { from, to, amount },
            Commands::Chart {
                from,
                to,
                output_dir,
            } => fxc::AppCommand::Chart {
                from,
                to,
                output_dir,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported currencies
    Currencies,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert, must be greater than zero
        #[arg(short, long, allow_hyphen_values = true)]
        amount: String,
        /// Source currency (defaults to the configured one)
        #[arg(short, long)]
        from: Option<Currency>,
        /// Target currency (defaults to the configured one)
        #[arg(short, long)]
        to: Option<Currency>,
    },
    /// Chart the exchange rate over the last year
    Chart {
        /// Source currency (defaults to the configured one)
        #[arg(short, long)]
        from: Option<Currency>,
        /// Target currency (defaults to the configured one)
        #[arg(short, long)]
        to: Option<Currency>,
        /// Directory to write the chart into
        #[arg(short, long)]
        output_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxc::cli::setup::setup(),
        Some(cmd) => fxc::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
