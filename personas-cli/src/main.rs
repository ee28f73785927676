//! personas CLI - runs the persona records HTTP service
//!
//! - `serve`: start the HTTP API (creates the table on startup)
//! - `init-db`: create the table once and exit

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use commands::serve::ServeArgs;

#[derive(Parser, Debug)]
#[command(
    name = "personas",
    version,
    about = "Persona records web service backed by PostgreSQL"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Create the personas table if it does not exist
    InitDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;
    config::report_dotenv(&dotenv);

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::InitDb => commands::run_init_db().await,
    }
}
