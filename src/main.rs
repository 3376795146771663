//! sess - tmux session picker
//!
//! Run with `sess <name>` to create or switch, or `sess --help` for usage.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sess::{
    config::Settings, session::render_listing, system_resolver, Multiplexer, SystemResolver,
    APP_NAME, VERSION,
};

const LONG_ABOUT: &str = "\
A fast and lightweight tmux session manager.

SESSIONS:
  ● Active tmux sessions
  ⚙ Tmuxinator projects
  ○ Default sessions from config

A name is resolved in that order; an unknown name creates a new session.

CONFIG:
  Settings:         ~/.config/sess/config.toml
  Default sessions: ~/.config/sess/sessions-<platform>.yml
  Platform detected automatically (macos, wsl, linux, ...)";

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "A fast tmux session picker")]
#[command(long_about = LONG_ABOUT)]
struct Cli {
    /// Session to create or switch to
    name: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Platform tag selecting the default sessions file
    #[arg(short, long, global = true)]
    platform: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all sessions
    List {
        /// Print sessions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open a session if it exists; never creates one
    Go {
        /// Session name
        name: Option<String>,
    },

    /// Delete an active tmux session
    Delete {
        /// Session name
        name: String,
    },

    /// Show what a session name resolves to
    Info {
        /// Session name
        name: String,
    },

    /// Switch to the previously active session (inside tmux only)
    Last,

    /// Reload tmux config in all active sessions
    Reload,

    /// Show configuration
    Config {
        /// Write the effective settings to the config file
        #[arg(long)]
        init: bool,
    },
}

fn setup_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug").add_directive("tokio=warn".parse()?)
    } else {
        // Quiet by default so listings stay clean; RUST_LOG still applies
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    }

    Ok(())
}

/// Whether the command talks to tmux beyond listing
fn needs_tmux(cli: &Cli) -> bool {
    match &cli.command {
        None => cli.name.is_some(),
        Some(Commands::Go { name }) => name.is_some(),
        Some(Commands::Delete { .. } | Commands::Last | Commands::Reload) => true,
        Some(Commands::List { .. } | Commands::Info { .. } | Commands::Config { .. }) => false,
    }
}

/// Print every session, or a hint when there are none
async fn print_listing(resolver: &SystemResolver) {
    let sessions = resolver.list_all().await;

    if sessions.is_empty() {
        println!("No sessions found.");
        println!();
        println!("Create a new session with: {} <name>", APP_NAME);
        println!(
            "Or add default sessions to {}",
            resolver.defaults().file_path(resolver.platform()).display()
        );
        return;
    }

    println!("{}", render_listing(&sessions));
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks
    color_eyre::install()?;

    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Settings::config_file_path()?,
    };

    let mut settings = Settings::load_from(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config, using defaults: {}", e);
        Settings::default()
    });
    if let Some(platform) = &cli.platform {
        settings.platform = Some(platform.clone());
    }
    settings.debug |= cli.debug;

    setup_logging(settings.debug, settings.log_file.as_deref())?;
    info!("Starting {} v{}", APP_NAME, VERSION);

    let resolver = system_resolver(&settings)?;
    if needs_tmux(&cli) {
        resolver.multiplexer().check_installed().await?;
    }

    match cli.command {
        None => match cli.name {
            Some(name) => resolver.create_or_switch(&name).await?,
            None => print_listing(&resolver).await,
        },

        Some(Commands::List { json }) => {
            let sessions = resolver.list_all().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
            } else if sessions.is_empty() {
                println!("No sessions found");
            } else {
                println!("{}", render_listing(&sessions));
            }
        }

        Some(Commands::Go { name: None }) => print_listing(&resolver).await,

        Some(Commands::Go { name: Some(name) }) => match resolver.go_to_session(&name).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                eprintln!("{}", e);
                eprintln!();
                print_listing(&resolver).await;
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },

        Some(Commands::Delete { name }) => {
            resolver.delete_session(&name).await?;
            println!("Session '{}' deleted successfully", name);
        }

        Some(Commands::Info { name }) => {
            println!("{}", resolver.get_session_info(&name).await?);
        }

        Some(Commands::Last) => resolver.switch_to_previous().await?,

        Some(Commands::Reload) => {
            for name in resolver.multiplexer().reload_configuration().await? {
                println!("  ✓ Reloaded session: {}", name);
            }
        }

        Some(Commands::Config { init }) => {
            if init {
                settings.save_to(&config_path)?;
                println!("Configuration initialized at {:?}", config_path);
            } else {
                println!("Configuration:");
                println!("{}", toml::to_string_pretty(&settings)?);
                println!("\nConfig file: {:?}", config_path);
                println!("Platform: {}", resolver.platform());
                println!(
                    "Defaults file: {:?}",
                    resolver.defaults().file_path(resolver.platform())
                );
                println!("Tmux config: {:?}", resolver.multiplexer().config_path());
            }
        }
    }

    Ok(())
}
