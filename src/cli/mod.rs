pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "posts")]
#[command(about = "Posts CLI - command-line client for the Posts API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "POSTS_API_URL",
        default_value = "http://127.0.0.1:8000",
        help = "Base URL of the Posts API"
    )]
    pub url: String,

    #[arg(long, global = true, env = "POSTS_API_TOKEN", help = "Bearer token for write operations")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a bearer token signed with the configured JWT_SECRET")]
    Token {
        #[arg(help = "User id to embed in the token")]
        user_id: i32,
        #[arg(long, help = "Validity in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },

    #[command(about = "Check server health status from the /health endpoint")]
    Health,

    #[command(flatten)]
    Posts(commands::posts::PostCommands),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = client::ApiClient::new(&cli.url, cli.token.clone())?;

    match cli.command {
        Commands::Token { user_id, hours } => commands::token::handle(user_id, hours, output_format),
        Commands::Health => commands::health::handle(&client, output_format).await,
        Commands::Posts(cmd) => commands::posts::handle(cmd, &client, output_format).await,
    }
}
