mod commands;
mod config;
mod contributions;
mod display;
mod error;
mod github;
mod logging;
mod progress;
mod report;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ghcontrib",
    version,
    about = "Get contribution metrics for all members of a GitHub organization"
)]
pub struct Cli {
    /// Show debug logging on stderr
    #[arg(long, global = true)]
    verbose: bool,

    /// Write debug logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate member contributions and write JSON and CSV reports
    Contributions {
        /// GitHub organization containing members to process
        #[arg(long, env = "GH_ORG")]
        org: Option<String>,
        /// Base name of the report files
        #[arg(long, default_value = "contributions")]
        output: String,
        /// Directory the reports are written to
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Start of the contribution window (YYYY-MM-DD or RFC 3339)
        #[arg(long, requires = "to")]
        from: Option<String>,
        /// End of the contribution window (YYYY-MM-DD or RFC 3339)
        #[arg(long, requires = "from")]
        to: Option<String>,
        /// Review contributions requested per GraphQL page (1-100)
        #[arg(long)]
        page_size: Option<u32>,
        /// Give up on a member after this many review pages
        #[arg(long)]
        max_pages: Option<u32>,
        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Do not draw a progress bar
        #[arg(long)]
        no_progress: bool,
    },
    /// List the members of an organization
    Members {
        /// GitHub organization to list
        #[arg(long, env = "GH_ORG")]
        org: Option<String>,
        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.log_file.as_deref(), cli.verbose) {
        display::error(&format!("Could not set up logging: {e}"));
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Contributions {
            org,
            output,
            dir,
            from,
            to,
            page_size,
            max_pages,
            json,
            no_progress,
        } => {
            let opts = commands::contributions::Options {
                org,
                output,
                dir,
                from,
                to,
                page_size,
                max_pages,
                json,
                no_progress,
            };
            commands::contributions::run(&opts).await
        }
        Commands::Members { org, json } => commands::members::run(&org, json).await,
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "run failed");
        display::error(&e.to_string());
        std::process::exit(1);
    }
}
