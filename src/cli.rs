//! Command-line interface for the Quoridor service.

use clap::{Parser, Subcommand};

/// Quoridor Server - rule engine and game service with a built-in opponent
#[derive(Parser, Debug)]
#[command(name = "quoridor_server")]
#[command(about = "Quoridor game service with a built-in opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
