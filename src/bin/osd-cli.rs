use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "osd-cli")]
#[command(about = "Client for the storage SDK REST gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9110")]
    url: String,

    /// Bearer token sent with every call.
    #[arg(short, long, env = "OSD_SDK_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show SDK and driver versions
    Identity,
    /// Volume operations
    Volumes {
        #[command(subcommand)]
        command: VolumeCommands,
    },
    /// Cloud migration operations
    Migrate {
        #[command(subcommand)]
        command: MigrateCommands,
    },
}

#[derive(Subcommand)]
enum VolumeCommands {
    /// List volume ids
    List,
    /// Show one volume
    Inspect { volume_id: String },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Show migration status
    Status,
    /// Cancel a migration task
    Cancel { task_id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(token) = &cli.token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))?,
        );
    }

    let (path, body) = match cli.command {
        Commands::Identity => ("identities/version", json!({})),
        Commands::Volumes { command } => match command {
            VolumeCommands::List => ("volumes/enumerate", json!({})),
            VolumeCommands::Inspect { volume_id } => {
                ("volumes/inspect", json!({ "volume_id": volume_id }))
            }
        },
        Commands::Migrate { command } => match command {
            MigrateCommands::Status => ("migrate/status", json!({})),
            MigrateCommands::Cancel { task_id } => {
                ("migrate/cancel", json!({ "request": { "task_id": task_id } }))
            }
        },
    };

    let res = client
        .post(format!("{}/v1/{path}", cli.url.trim_end_matches('/')))
        .headers(headers)
        .json(&body)
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
