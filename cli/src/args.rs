//! Command-line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fill out grant application forms from a document knowledge base
#[derive(Parser, Debug)]
#[command(name = "formpilot", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Explicit config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fill out an application form for one applicant
    Fill {
        /// Applicant username (metadata filter for retrieval)
        #[arg(long)]
        user: String,

        /// Application form name (selects template, questions, prompts)
        #[arg(long)]
        form: String,

        /// Application year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Extract the question set from a form template
    Questions {
        /// Application form name
        #[arg(long)]
        form: String,
    },
}
