//! Form Builder CLI
//!
//! Command-line interface for form definition files and the Form Builder API.
//!
//! # Usage
//!
//! ```bash
//! formbuilder validate payroll.json
//! formbuilder normalize legacy.json -o payroll.json
//! formbuilder export legacy.json --dir exports/
//! formbuilder --as alice forms list --format json
//! formbuilder --as root --role admin forms assign 3 --user bob
//! formbuilder --as bob forms status 3 --status review
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use formbuilder_core::{Identity, Role};
use std::path::PathBuf;

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "formbuilder")]
#[command(author = "Form Builder Team")]
#[command(version)]
#[command(about = "Form Builder Command Line Interface", long_about = None)]
struct Cli {
    /// API endpoint URL
    #[arg(long, env = "FORMBUILDER_API_URL")]
    api_url: Option<String>,

    /// User id sent to the API
    #[arg(long = "as", env = "FORMBUILDER_USER")]
    user: Option<String>,

    /// Role sent to the API (admin or user)
    #[arg(long, env = "FORMBUILDER_ROLE")]
    role: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a form definition file
    Validate { file: PathBuf },
    /// Print a file in canonical form, accepting legacy key casing
    Normalize {
        file: PathBuf,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the canonical export file next to other exports
    Export {
        file: PathBuf,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Manage stored forms
    Forms {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum FormCommands {
    /// List forms visible to you
    List,
    /// Get form details
    Get { id: u64 },
    /// Assign a form to a user (admin)
    Assign {
        id: u64,
        #[arg(long)]
        user: String,
    },
    /// Change status and/or priority
    Status {
        id: u64,
        /// draft, todo, in_progress, review or completed
        #[arg(long)]
        status: Option<String>,
        /// low, medium or high
        #[arg(long)]
        priority: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let profile = cli.profile.as_deref();
    let config = config::Config::load(profile)?;

    let format = match cli.format {
        Some(format) => format,
        None => match config.default_format.as_deref() {
            Some(name) => <output::OutputFormat as clap::ValueEnum>::from_str(name, true)
                .map_err(|e| anyhow::anyhow!("default_format: {}", e))?,
            None => output::OutputFormat::Table,
        },
    };

    match cli.command {
        Commands::Validate { file } => commands::local::validate(&file),
        Commands::Normalize { file, output } => commands::local::normalize(&file, output.as_deref()),
        Commands::Export { file, dir } => commands::local::export(&file, &dir).map(|_| ()),
        Commands::Config { action } => commands::config::handle(action, profile),
        Commands::Forms { action } => {
            let api_url = cli.api_url.or(config.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string());
            let role: Role = cli.role.or(config.role).as_deref().unwrap_or("user").parse().map_err(anyhow::Error::msg)?;
            let identity = cli.user.or(config.user).map(|user| Identity::new(user, role));
            let client = commands::ApiClient::new(&api_url, identity);
            commands::forms::handle(action, &client, format).await
        }
    }
}
