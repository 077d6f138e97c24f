use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "balancer-cli")]
#[command(about = "Management CLI for the failover load balancer", long_about = None)]
struct Cli {
    /// Public listener URL.
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    /// Admin API URL.
    #[arg(short, long, default_value = "http://localhost:8081")]
    admin_url: String,

    /// Admin API key (Bearer token).
    #[arg(short, long, default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check balancer status
    Status,
    /// List backend health
    Backends,
    /// Send a payload through the balancer
    Send { data: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    match cli.command {
        Commands::Status => {
            let res = client
                .get(format!("{}/admin/status", cli.admin_url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Backends => {
            let res = client
                .get(format!("{}/admin/backends", cli.admin_url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Send { data } => {
            let res = client
                .post(&cli.url)
                .json(&json!({ "data": data }))
                .send()
                .await?;
            let status = res.status();
            let body = res.text().await?;
            println!("{} {}", status.as_u16(), body);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
