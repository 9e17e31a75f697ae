use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "arkitek")]
#[command(about = "Arkitek CLI for cluster links and boot scripts", long_about = None)]
pub struct Args {
    /// Server URL
    #[arg(long, env = "ARKITEK_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    pub server_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cluster link management
    Link {
        #[command(subcommand)]
        subcommand: LinkCommand,
    },
    /// iPXE boot script generation
    Boot {
        #[command(subcommand)]
        subcommand: BootCommand,
    },
    /// Benchmark and continuous test runs
    Run {
        #[command(subcommand)]
        subcommand: RunCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum LinkCommand {
    /// List registered cluster links
    List {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a new cluster link
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        endpoint: String,
        #[arg(long)]
        credentials: Option<String>,
        /// Builder classification (server default: generic)
        #[arg(long)]
        builder_type: Option<String>,
    },
    /// Delete a cluster link by ID
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum BootCommand {
    /// Generate an iPXE boot script
    Generate {
        #[arg(long)]
        cluster: String,
        /// Number of servers to deploy
        #[arg(long)]
        servers: u32,
        #[arg(long)]
        boot_image: Option<String>,
        #[arg(long)]
        kernel_params: Option<String>,
        /// Write to this file; "-" prints to stdout. Defaults to <cluster>-boot.ipxe
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum RunCommand {
    /// Start a benchmark against an endpoint
    Benchmark {
        #[arg(long)]
        endpoint: String,
        #[arg(long)]
        test_type: Option<String>,
        #[arg(long)]
        iterations: Option<u64>,
    },
    /// Run tests on a cluster until one fails
    UntilFail {
        #[arg(long)]
        cluster: String,
        #[arg(long)]
        test_type: Option<String>,
        #[arg(long)]
        max_iterations: Option<u64>,
    },
}
