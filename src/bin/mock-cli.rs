use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "mock-cli")]
#[command(about = "Management CLI for the mock server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Admin API key, if the server requires one.
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stored route configuration
    Routes,
    /// Replace the stored route configuration with a local file
    Replace {
        /// JSON route file to upload verbatim
        file: PathBuf,
    },
    /// Issue a bearer token for a subject
    Token {
        sub: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", key))?);
    }

    match cli.command {
        Commands::Routes => {
            let res = client.get(format!("{}/api/routes", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Replace { file } => {
            let body = tokio::fs::read(&file).await?;
            let res = client.post(format!("{}/api/routes", cli.url))
                .headers(headers)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?;
            if res.status().is_success() {
                println!("Uploaded {}", file.display());
            } else {
                print_response(res).await?;
            }
        }
        Commands::Token { sub } => {
            let res = client.post(format!("{}/token", cli.url))
                .json(&json!({ "sub": sub }))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        // Stored configuration is returned verbatim, even when it is not JSON.
        Err(_) => println!("{}", text),
    }
    Ok(())
}
