use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "condokit")]
#[command(
    version,
    about = "Taxpayer-ID validation and AI credential failover toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a CPF or CNPJ (kind detected from digit count)
    Validate {
        #[arg(help = "Document number, punctuation allowed")]
        document: String,
    },

    /// Manage the AI credential pool
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Run a prompt through the failover executor
    Ask {
        #[arg(help = "Prompt text")]
        prompt: String,
        #[arg(long, help = "Model override (wins over the tier default)")]
        model: Option<String>,
        #[arg(long, help = "Attach an image file (png, jpg, webp, gif)")]
        image: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Add a credential to the pool
    Add {
        #[arg(help = "API key value")]
        secret: String,
        #[arg(long, short, default_value = "100", help = "Priority, lower = preferred")]
        priority: i64,
        #[arg(long, help = "Mark as paid tier (selects the pro model)")]
        paid: bool,
        #[arg(long, help = "Identifier (defaults to a random UUID)")]
        id: Option<String>,
    },
    /// List the pool (secrets redacted)
    List,
    /// Reactivate every credential and clear error counts
    Reset,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration (merged from all sources)
    Show {
        #[arg(long, help = "Output as JSON instead of TOML")]
        json: bool,
    },
    /// Show the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        #[arg(long, short, help = "Overwrite an existing file")]
        force: bool,
    },
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", console::style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Validate { document } => {
            condokit::cli::commands::validate::run(&document)?;
        }
        Commands::Key { action } => match action {
            KeyAction::Add {
                secret,
                priority,
                paid,
                id,
            } => {
                condokit::cli::commands::key::add(&secret, priority, paid, id)?;
            }
            KeyAction::List => {
                condokit::cli::commands::key::list()?;
            }
            KeyAction::Reset => {
                condokit::cli::commands::key::reset()?;
            }
        },
        Commands::Ask {
            prompt,
            model,
            image,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(condokit::cli::commands::ask::run(
                &prompt,
                model,
                image.as_deref(),
            ))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => {
                condokit::cli::commands::config::show(json)?;
            }
            ConfigAction::Path => {
                condokit::cli::commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                condokit::cli::commands::config::init(force)?;
            }
        },
    }

    Ok(())
}
