use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use dexnav::domain::{ChainId, CustomExplorer, ExplorerEntityKind};
use dexnav::render::{chain_table, snapshot_line};
use dexnav::state::{AppConfig, parse_script, run_script, spawn_drawer};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// dexnav - explorer links and drawer menu state for the exchange front end
#[derive(Parser)]
#[command(version = VERSION, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the explorer link for a transaction, token, address or block
    Link {
        /// Transaction hash, contract address, wallet address or block
        identifier: String,
        /// Chain id (defaults to the configured default chain)
        #[arg(short, long)]
        chain: Option<ChainId>,
        /// Entity kind: tx, token, address or block
        #[arg(short, long, default_value = "tx")]
        kind: ExplorerEntityKind,
        /// Open the link in the browser
        #[arg(long)]
        open: bool,
    },
    /// List chains and their explorers
    Chains,
    /// Manage custom explorers
    Explorer {
        #[command(subcommand)]
        command: ExplorerCommand,
    },
    /// Play a drawer script, printing the menu state after each step
    Drawer {
        /// Comma-separated steps: open, close, settings, back, wait:<ms>
        script: String,
        /// Reset delay in milliseconds (defaults to the configured delay)
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Start with the drawer closed
        #[arg(long)]
        closed: bool,
    },
    /// Display version
    Version,
}

#[derive(Subcommand)]
enum ExplorerCommand {
    /// Add a custom explorer for a chain
    Add {
        #[arg(long)]
        chain: ChainId,
        #[arg(long)]
        name: String,
        /// Scheme and host, e.g. https://gnosisscan.io
        #[arg(long)]
        origin: String,
        /// The explorer works without registration
        #[arg(long)]
        keyless: bool,
        /// Path segment override, e.g. token=address (repeatable)
        #[arg(long = "segment", value_parser = parse_segment)]
        segments: Vec<(ExplorerEntityKind, String)>,
    },
    /// Remove the custom explorer for a chain
    Remove {
        #[arg(long)]
        chain: ChainId,
    },
}

fn parse_segment(s: &str) -> Result<(ExplorerEntityKind, String), String> {
    let Some((kind, segment)) = s.split_once('=') else {
        return Err(format!("expected KIND=SEGMENT, e.g. token=address, got '{s}'"));
    };
    let kind = kind
        .parse::<ExplorerEntityKind>()
        .map_err(|err| err.to_string())?;
    Ok((kind, segment.trim().to_string()))
}

/// Application entry point
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Link {
            identifier,
            chain,
            kind,
            open,
        } => {
            let config = AppConfig::load();
            let registry = config.registry();
            let chain = chain.unwrap_or(config.default_chain);
            let url = registry.link(chain, &identifier, kind);
            println!("{url}");
            if open {
                open::that(&url).wrap_err_with(|| format!("Failed to open {url}"))?;
            }
        }
        Commands::Chains => {
            let registry = AppConfig::load().registry();
            println!("{}", chain_table(&registry.entries()));
        }
        Commands::Explorer { command } => match command {
            ExplorerCommand::Add {
                chain,
                name,
                origin,
                keyless,
                segments,
            } => {
                let explorer = segments.into_iter().fold(
                    CustomExplorer::new(chain, name, origin).with_keyless(keyless),
                    |explorer, (kind, segment)| explorer.with_segment(kind, segment),
                );
                AppConfig::add_custom_explorer(explorer)?;
                println!("Added explorer for chain {chain}");
            }
            ExplorerCommand::Remove { chain } => {
                let removed = AppConfig::remove_custom_explorer(chain)?;
                println!("Removed {} (chain {chain})", removed.name);
            }
        },
        Commands::Drawer {
            script,
            delay_ms,
            closed,
        } => {
            let steps = parse_script(&script)?;
            let delay =
                delay_ms.map_or_else(|| AppConfig::load().reset_delay(), Duration::from_millis);
            let drawer = spawn_drawer(!closed, delay);

            tokio::select! {
                result = run_script(&drawer, &steps, |step, snapshot| {
                    println!("{}", snapshot_line(step, snapshot));
                }) => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted, unmounting drawer");
                }
            }

            let final_state = drawer.unmount().await?;
            println!("final menu={final_state}");
        }
        Commands::Version => {
            println!("dexnav v{VERSION}");
            println!("Explorer links and drawer menu state for the exchange front end");
        }
    }

    Ok(())
}
