use clap::{Parser, Subcommand};

/// Command-line interface definition for rTimeTracker
/// Local web app to track working time by tag with SQLite
#[derive(Parser)]
#[command(
    name = "rtimetracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "A personal time tracker: live timer, manual entries and tag quotas in the browser",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Run the web server
    Serve {
        #[arg(long = "bind", help = "Address to bind (default from config: 127.0.0.1)")]
        bind: Option<String>,

        #[arg(long = "port", help = "Port to listen on (default from config: 8000)")]
        port: Option<u16>,
    },

    /// Show the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
