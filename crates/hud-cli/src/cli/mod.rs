//! CLI entry and dispatch.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use hud_core::config::{self, Config};
use hud_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "hud")]
#[command(version)]
#[command(about = "HUD panel coordinator served over a line-delimited JSON bridge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: $HUD_HOME/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Serve the HUD over stdin/stdout until the host closes stdin
    Run,
    /// List registered panels
    Panels,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Write the default config template
    Init,
    /// Print the default config as TOML
    Generate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("create tokio runtime")?;

    let result = rt.block_on(dispatch(cli));
    // A pending stdin read holds a blocking thread; don't wait for it.
    rt.shutdown_timeout(Duration::from_millis(100));
    result
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(config::paths::config_path);

    match cli.command {
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path(&config_path);
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(&config_path),
            ConfigCommands::Generate => commands::config::generate(),
        },
        Commands::Panels => {
            let config = Config::load_from(&config_path).context("load config")?;
            commands::panels::list(config);
            Ok(())
        }
        Commands::Run => {
            let config = Config::load_from(&config_path).context("load config")?;
            let _guard = logging::init(&config.log)?;
            tracing::debug!(path = %config_path.display(), "config loaded");
            commands::run::run(config).await
        }
    }
}
