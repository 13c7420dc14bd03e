//! Matrixops CLI - serve matrix operations over HTTP
//!
//! # Main Commands
//!
//! ```bash
//! matrixops serve                      # Start HTTP server (port 8000)
//! matrixops serve --port 9000          # Override MATRIXOPS_PORT
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! matrixops run sum matrix.csv         # Apply an operation to a local file
//! matrixops operations                 # Show available operations
//! ```

use clap::{Parser, Subcommand};
use matrixops::{logging::init_logging, operations_description, run_file, Operation, ServerConfig};
use serde_json::json;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "matrixops")]
#[command(about = "Integer matrix operations on CSV files, over HTTP", long_about = None)]
struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Address to bind (default: MATRIXOPS_HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to listen on (default: MATRIXOPS_PORT or 8000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Apply an operation to a CSV file and print the result
    Run {
        /// echo, invert, flatten, sum or multiply
        operation: String,

        /// Input CSV file
        input: PathBuf,
    },

    /// Show available operations
    Operations {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Serve { host, port } => cmd_serve(host, port).await,
        Commands::Run { operation, input } => cmd_run(&operation, &input),
        Commands::Operations { json } => cmd_operations(json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(
    host: Option<IpAddr>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_env()?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    matrixops::server::start_server(config).await?;
    Ok(())
}

fn cmd_run(operation: &str, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let operation: Operation = operation.parse()?;

    let config = ServerConfig::from_env()?;
    let output = run_file(operation, input, config.max_upload_bytes)?;
    if output.overflow_suspected {
        eprintln!("Warning: {}", matrixops::matrix::operations::OVERFLOW_WARNING);
    }

    println!("{}", output.body);
    Ok(())
}

fn cmd_operations(as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if as_json {
        let ops: Vec<_> = Operation::ALL
            .into_iter()
            .map(|op| {
                json!({
                    "operation": op,
                    "method": "POST",
                    "route": op.route(),
                    "description": op.description(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&ops)?);
    } else {
        println!("{}", operations_description());
    }
    Ok(())
}
