//! vitae CLI - main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::ResolveArgs;

#[derive(Parser)]
#[command(name = "vitae")]
#[command(version)]
#[command(about = "Layered, theme-aware CV configuration", long_about = None)]
struct Cli {
    /// Log pipeline stages at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a CV against its theme and report every problem
    Validate {
        #[command(flatten)]
        args: ResolveArgs,
    },

    /// Print the fully resolved CV, defaults included
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = commands::resolve::Format::Yaml)]
        format: commands::resolve::Format,

        /// Write output to FILE instead of stdout
        #[arg(short = 'o', long)]
        output: Option<std::path::PathBuf>,
    },

    /// Print the JSON Schema of a theme
    Schema {
        /// Theme to export (defaults to the default theme)
        #[arg(long)]
        theme: Option<String>,
    },

    /// List the available themes
    Themes,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "vitae=debug" } else { "vitae=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let success = match cli.command {
        Commands::Validate { args } => commands::validate::execute(&args)?,
        Commands::Resolve {
            args,
            format,
            output,
        } => commands::resolve::execute(&args, format, output.as_deref())?,
        Commands::Schema { theme } => commands::schema::execute(theme.as_deref())?,
        Commands::Themes => commands::themes::execute()?,
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
