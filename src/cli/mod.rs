//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::walker::CyclePolicy;
use crate::{Config, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// UML state machine diagram walker CLI
#[derive(Parser, Debug)]
#[command(name = "state-diagram-walker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute (defaults to `show`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the state machine of the matching diagram(s)
    Show(ShowArgs),

    /// List the named elements of a model
    List {
        /// Project file (defaults to the bundled sample)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Validate a model and print its statistics
    Check {
        /// Project file (defaults to the bundled sample)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    /// Project file (defaults to the bundled sample)
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Exact diagram name (defaults to "Statemachine Diagram")
    #[arg(short, long, conflicts_with = "pattern")]
    pub diagram: Option<String>,

    /// Regular expression matched against element names
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Behavior on cyclic submachine nesting (overrides config)
    #[arg(long, value_enum)]
    pub on_cycle: Option<CyclePolicy>,
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text walk report
    #[default]
    Text,
    /// DOT format (Graphviz)
    Dot,
}

/// Execute the CLI command
pub async fn execute(args: Cli, config: Config) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command.unwrap_or_else(|| Commands::Show(ShowArgs::default())) {
        Commands::Show(show) => commands::show::execute(show, &config, &mut out)
            .await
            .map(|_| ()),
        Commands::List { model } => commands::list::execute(model, &config, &mut out).await,
        Commands::Check { model, json } => {
            commands::check::execute(model, json, &config, &mut out).await
        }
    }
}
