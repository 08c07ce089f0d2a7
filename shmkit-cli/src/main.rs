// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Shmkit CLI
//!
//! Command-line client for named shared memory segments.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod payload;

/// Shmkit - Named POSIX shared memory segments from the command line
#[derive(Parser)]
#[command(name = "shmkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "shmkit.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the normalized form of a segment name
    Format {
        /// Raw name to normalize
        raw: String,
    },

    /// Check whether a segment exists (exit status 1 if not)
    Exists {
        /// Segment name
        name: String,
    },

    /// Remove a segment name
    Unlink {
        /// Segment name
        name: String,
    },

    /// Write i32 values into a segment
    Send {
        /// Segment name
        #[arg(short, long)]
        name: String,

        /// Comma separated values
        #[arg(long, allow_hyphen_values = true)]
        values: String,

        /// Keep the segment mapped for this long before tearing down
        #[arg(long, default_value_t = 0)]
        hold_ms: u64,
    },

    /// Poll a segment until its contents match a checksum
    Recv {
        /// Segment name
        #[arg(short, long)]
        name: String,

        /// Number of i32 elements
        #[arg(short, long)]
        len: usize,

        /// Expected CRC32 of the contents
        #[arg(long)]
        checksum: u32,

        /// Map the segment read-only
        #[arg(long)]
        read_only: bool,

        /// Poll interval (defaults to the configuration file, then 1ms)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Give up after this long (defaults to the configuration file, then 5000ms)
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Run the two-process array exchange end to end
    Demo {
        /// Number of elements to exchange
        #[arg(short, long, default_value_t = 8)]
        len: usize,
    },

    /// List configured segments
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        file: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Format { raw } => commands::format::execute(&raw).await,
        Commands::Exists { name } => commands::exists::execute(&name).await,
        Commands::Unlink { name } => commands::unlink::execute(&name).await,
        Commands::Send {
            name,
            values,
            hold_ms,
        } => commands::send::execute(&name, &values, hold_ms).await,
        Commands::Recv {
            name,
            len,
            checksum,
            read_only,
            interval_ms,
            timeout_ms,
        } => {
            let request = commands::recv::Request {
                name,
                len,
                checksum,
                read_only,
                interval_ms,
                timeout_ms,
            };
            commands::recv::execute(&cli.config, request).await
        }
        Commands::Demo { len } => commands::demo::execute(&cli.config, len).await,
        Commands::List { json } => commands::list::execute(&cli.config, json).await,
        Commands::Validate { file } => commands::validate::execute(&file).await,
    }
}
