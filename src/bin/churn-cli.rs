use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "churn-cli")]
#[command(about = "Client for the churn prediction endpoint", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Request ID to send as x-request-id.
    #[arg(short, long)]
    request_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check endpoint health
    Health,
    /// Score one customer
    Predict {
        #[arg(long)]
        monthly_spend: f64,
        #[arg(long)]
        tenure_months: f64,
        #[arg(long)]
        num_support_tickets: f64,
    },
    /// Send a raw JSON body to /predict
    Raw {
        /// JSON text sent verbatim.
        body: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let request = match cli.command {
        Commands::Health => client.get(format!("{}/health", cli.url)),
        Commands::Predict {
            monthly_spend,
            tenure_months,
            num_support_tickets,
        } => client.post(format!("{}/predict", cli.url)).json(&json!({
            "monthly_spend": monthly_spend,
            "tenure_months": tenure_months,
            "num_support_tickets": num_support_tickets,
        })),
        Commands::Raw { body } => client
            .post(format!("{}/predict", cli.url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body),
    };

    let request = match cli.request_id {
        Some(id) => request.header("x-request-id", id),
        None => request,
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: endpoint returned status {}", status);
        eprintln!("Response: {}", render(status, &text)?);
        return Ok(());
    }

    println!("{}", render(status, &text)?);
    Ok(())
}

/// Pretty JSON for successful responses; error bodies are shown as sent,
/// since they may not be JSON.
fn render(status: reqwest::StatusCode, text: &str) -> Result<String, serde_json::Error> {
    if !status.is_success() {
        return Ok(text.to_string());
    }
    let json: Value = serde_json::from_str(text)?;
    serde_json::to_string_pretty(&json)
}
