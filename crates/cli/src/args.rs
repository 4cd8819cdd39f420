use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dragnet")]
#[command(version = "0.1.0")]
#[command(about = "A concurrent TCP connect port scanner", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    Scan {
        /// Target host (IP or hostname). Example: 127.0.0.1 or example.com
        #[arg(short = 't', long, required = true)]
        target: String,

        /// Ports to scan. Examples: 80,443 or 1-1024 or 22,80-90
        #[arg(short, long, default_value = "1-1024")]
        ports: String,

        /// Max concurrent probes
        #[arg(short, long, default_value = "500")]
        concurrency: usize,

        /// Per-port connect timeout in milliseconds
        #[arg(long, default_value = "1000")]
        timeout_ms: u64,

        /// Overall scan deadline in seconds (no deadline when omitted)
        #[arg(long)]
        deadline: Option<u64>,

        /// Output format: text, json, csv
        #[arg(short, long, default_value = "text")]
        output_format: String,

        /// Show closed, filtered, and errored ports too, not just open ones
        #[arg(short, long)]
        all: bool,
    },
}
