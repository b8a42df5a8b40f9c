use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Command line client for the scenario relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a scenario through the relay
    Fetch {
        /// Scenario name, forwarded as-is
        scenario: String,
    },
    /// Show how many calls the relay is still waiting on
    InFlight,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Fetch { scenario } => {
            client
                .get(format!("{}/test/{}", base, scenario))
                .send()
                .await?
        }
        Commands::InFlight => client.get(format!("{}/in-flight", base)).send().await?,
    };
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    if json.get("status").is_some() && json.get("title").is_some() {
        eprintln!("Remote call failed:");
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
