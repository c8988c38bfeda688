use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::fs::File;
use std::path::PathBuf;

use region_latency::latency::matrix::DEFAULT_UNKNOWN_TOKEN;
use region_latency::latency::merge::MergedMatrix;

#[derive(Parser)]
#[command(name = "latency-cli")]
#[command(about = "Client and data tooling for the region latency service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Query regions reachable from an origin within a latency budget
    Eligible {
        /// Origin region id, e.g. "West Europe"
        #[arg(long)]
        origin: String,
        /// Maximum latency in milliseconds
        #[arg(long)]
        max_latency: f64,
        #[arg(long, default_value = "azure")]
        provider: String,
    },
    /// Merge per-source latency CSVs into a single matrix
    Merge {
        /// Directory containing the partial CSV files
        #[arg(long)]
        input_dir: PathBuf,
        /// Output matrix path
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value = DEFAULT_UNKNOWN_TOKEN)]
        unknown_token: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Eligible {
            origin,
            max_latency,
            provider,
        } => {
            let res = client
                .post(format!("{}/regions/eligible", cli.url))
                .json(&json!({
                    "origin_region": origin,
                    "max_latency": max_latency,
                    "cloud_provider": provider,
                }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Merge {
            input_dir,
            output,
            unknown_token,
        } => {
            let merged = MergedMatrix::from_directory(&input_dir, &unknown_token)?;
            merged.write_csv(File::create(&output)?, &unknown_token)?;
            println!(
                "Merged {} source regions x {} target regions into {}",
                merged.sources().count(),
                merged.targets().count(),
                output.display()
            );
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
