use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lsvedit::config::Config;

mod cli;

#[derive(Parser)]
#[command(name = "lsvedit")]
#[command(about = "Edit the gold in Baldur's Gate 3 save archives")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Saves folder override for this invocation
    #[arg(short, long, global = true)]
    folder: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the save archives in the saves folder
    List,

    /// Pick a saves folder with the native dialog, then list it
    #[cfg(feature = "dialog")]
    Browse {
        /// Persist the chosen folder to the config file
        #[arg(long)]
        save: bool,
    },

    /// Extract a save archive into the working area
    Extract {
        /// Path to the .lsv archive (defaults to the most recent save)
        save: Option<String>,
    },

    /// Show the metadata of the extracted save
    Info,

    /// Inspect or change the gold of a save
    Gold {
        #[command(subcommand)]
        command: GoldCommands,
    },

    /// Check that the LSLib toolchain is usable
    Check,

    /// Initialize a new configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum GoldCommands {
    /// Print the gold of the extracted save
    Get,

    /// Change the gold total and write a new archive
    Set {
        /// The new gold total
        #[arg(allow_negative_numbers = true)]
        amount: i32,

        /// Path to the .lsv archive (defaults to the most recent save)
        #[arg(long)]
        save: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(folder) = cli.folder {
        config.saves_folder = folder;
    }

    match cli.command {
        Some(Commands::List) | None => {
            cli::saves::list_command(&config).await?;
        }
        #[cfg(feature = "dialog")]
        Some(Commands::Browse { save }) => {
            cli::saves::browse_command(&config, cli.config.clone(), save).await?;
        }
        Some(Commands::Extract { save }) => {
            cli::extract::extract_command(&config, save).await?;
        }
        Some(Commands::Info) => {
            cli::extract::info_command(&config).await?;
        }
        Some(Commands::Gold { command }) => match command {
            GoldCommands::Get => {
                cli::gold::get_command(&config).await?;
            }
            GoldCommands::Set { amount, save } => {
                cli::gold::set_command(&config, save, amount).await?;
            }
        },
        Some(Commands::Check) => {
            cli::doctor::check_command(&config).await?;
        }
        Some(Commands::Init { force }) => {
            cli::init::init_command(cli.config, force).await?;
        }
    }

    Ok(())
}
