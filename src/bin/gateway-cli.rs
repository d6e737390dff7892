use clap::{Args, Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use chat_gateway::ConfigInput;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the chat gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8482")]
    url: String,

    #[arg(short, long, default_value = "123456")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service liveness
    Health,
    /// Show the current configuration (API key masked)
    Show,
    /// Update configuration fields; omitted flags are left unchanged
    Set(SetArgs),
}

#[derive(Args)]
struct SetArgs {
    /// Session token; repeat the flag or pass a comma separated list
    #[arg(long = "session")]
    sessions: Vec<String>,

    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    apikey: Option<String>,

    #[arg(long)]
    proxy: Option<String>,

    #[arg(long)]
    is_incognito: Option<bool>,

    #[arg(long)]
    max_chat_history_length: Option<i64>,

    #[arg(long)]
    no_role_prefix: Option<bool>,

    #[arg(long)]
    search_result_compatible: Option<bool>,

    #[arg(long)]
    prompt_for_file: Option<String>,

    #[arg(long)]
    ignore_search_result: Option<bool>,

    #[arg(long)]
    ignore_model_monitoring: Option<bool>,

    #[arg(long)]
    is_max_subscribe: Option<bool>,

    #[arg(long)]
    reject_model_mismatch: Option<bool>,

    #[arg(long)]
    default_model: Option<String>,

    #[arg(long)]
    force_model: Option<String>,
}

impl SetArgs {
    fn into_input(self) -> ConfigInput {
        ConfigInput {
            sessions: if self.sessions.is_empty() {
                None
            } else {
                Some(self.sessions)
            },
            address: self.address,
            api_key: self.apikey,
            proxy: self.proxy,
            is_incognito: self.is_incognito,
            max_chat_history_length: self.max_chat_history_length,
            no_role_prefix: self.no_role_prefix,
            search_result_compatible: self.search_result_compatible,
            prompt_for_file: self.prompt_for_file,
            ignore_search_result: self.ignore_search_result,
            ignore_model_monitoring: self.ignore_model_monitoring,
            is_max_subscribe: self.is_max_subscribe,
            reject_model_mismatch: self.reject_model_mismatch,
            default_model: self.default_model,
            force_model: self.force_model,
        }
    }
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
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Show => {
            let res = client
                .get(format!("{}/admin/config", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Set(args) => {
            let res = client
                .post(format!("{}/admin/config", cli.url))
                .headers(headers)
                .json(&args.into_input())
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
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
