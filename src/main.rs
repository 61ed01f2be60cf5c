//! Librus Terminal - Entry Point
//!
//! Loads configuration, sets up logging and the portal backend, builds the
//! command registry and hands control to the interactive loop.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use librus_terminal::commands::default_registry;
use librus_terminal::core::config::{TerminalConfig, LOG_ENV_VAR};
use librus_terminal::core::error::Result;
use librus_terminal::session::{FixturePortal, Session, SessionHandle};
use librus_terminal::terminal::{EditorReader, InterruptFlag, Terminal};

#[derive(Parser, Debug)]
#[command(name = "librus-terminal", about = "Interactive console for a school-portal account", version)]
struct Cli {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML fixture with portal data (overrides the config file)
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Session lifetime in seconds (overrides the config file)
    #[arg(long)]
    session_lifetime: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Logs go to stderr so they never interleave with command output on stdout
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    tracing::info!("Librus terminal starting...");

    let portal = match &config.fixture_path {
        Some(path) => FixturePortal::load(path)?,
        None => {
            tracing::info!("no fixture configured - using demo portal data");
            FixturePortal::demo()?
        }
    };

    let interrupt = InterruptFlag::new();
    interrupt.install_handler()?;

    let session = SessionHandle::new(
        Session::new(Box::new(portal), config.session_lifetime())
            .with_interrupt(interrupt.clone()),
    );
    let registry = default_registry()?;

    println!("Type 'help' for a list of commands, Ctrl-C to quit.");

    let mut terminal = Terminal::new(session, registry, EditorReader::new()?, io::stdout())
        .with_config(&config)
        .with_interrupt(interrupt);
    terminal.run()
}

/// Defaults, then the config file, then command-line flags
fn load_config(cli: &Cli) -> Result<TerminalConfig> {
    let mut config = match &cli.config {
        Some(path) => TerminalConfig::load(path)?,
        None => TerminalConfig::default(),
    };

    if let Some(fixture) = &cli.fixture {
        config.fixture_path = Some(fixture.clone());
    }
    if cli.no_color {
        config.enable_color = false;
    }
    if let Some(secs) = cli.session_lifetime {
        config.session_lifetime_secs = secs;
    }

    config.validate()?;
    Ok(config)
}
