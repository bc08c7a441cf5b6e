//! Ephor - a command line client for Splunk's search export API.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod console;
mod error;
mod search;
mod session;
#[cfg(test)]
mod testutil;
mod util;

use console::Console;
use error::AppError;
use session::{Overrides, Session};
use util::print_error;

/// Ephor - a command line client for Splunk's search export API.
///
/// Runs a single search and prints the results, or starts an interactive
/// console (`-i`) for issuing repeated queries.
///
/// Connection details are read from a config file (config.yaml, config.yml
/// or config.json in the home directory, then the working directory) and
/// may be overridden by flags.
#[derive(Parser, Debug)]
#[command(name = "ephor")]
#[command(about = "Splunk search export CLI tool")]
#[command(version)]
pub struct Cli {
    /// The path to a config file if it is not in your home or working directory
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// The path to a file for writing query results (default: stdout)
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// The data type for the results (XML (default), JSON, CSV)
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// The port used by the Splunk instance (default 8089)
    #[arg(short = 'p', long)]
    pub port: Option<String>,

    /// The search query to execute (required if not using interactive mode)
    #[arg(short = 'q', long)]
    pub query: Option<String>,

    /// The URL of the Splunk instance (required if not using a config file)
    #[arg(short = 'r', long)]
    pub url: Option<String>,

    /// The username of a Splunk account (required if not using a config file)
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    /// The password of a Splunk account (required if not using a config file)
    #[arg(short = 'w', long)]
    pub password: Option<String>,

    /// Use the interactive console for making multiple queries
    #[arg(short = 'i', long)]
    pub interactive: bool,

    /// Verify the server's TLS certificate (disabled by default)
    #[arg(long)]
    pub verify_tls: bool,

    /// Request timeout in seconds (default 30)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Returns the values given explicitly on the command line.
    fn overrides(&self) -> Overrides {
        Overrides {
            username: self.username.clone(),
            password: self.password.clone(),
            url: self.url.clone(),
            port: self.port.clone(),
            output: self.output.clone(),
            verify_tls: self.verify_tls.then_some(true),
            timeout: self.timeout,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("ephor=debug,ephor_splunk=debug,ephor_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut session = Session::from_sources(cli.config.as_deref(), cli.overrides(), cli.interactive)?;
    if let Some(file) = cli.file {
        session.set_destination(file);
    }
    if let Some(query) = cli.query {
        session.set_query(query);
    }
    debug!(
        url = session.address(),
        port = session.port(),
        user = session.username(),
        output = %session.output(),
        verify_tls = session.verify_tls(),
        timeout_secs = session.timeout().as_secs(),
        interactive = session.interactive(),
        "session ready"
    );

    let stdout = std::io::stdout();
    if session.interactive() {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut console = Console::new(&mut session, stdout.lock());
        console.run(stdin).await
    } else {
        search::execute(&session, &mut stdout.lock()).await?;
        Ok(())
    }
}
