use reqwest::Method;
use serde_json::Value;

use crate::cli::client::ApiClient;
use crate::cli::utils::output_value;
use crate::cli::OutputFormat;

pub async fn handle(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let body: Value = client.send_json(client.request(Method::GET, "/health")?).await?;

    output_value(&output_format, &body, |body| {
        let status = body.get("status").and_then(|s| s.as_str()).unwrap_or("unknown");
        let database = body.get("database").and_then(|s| s.as_str()).unwrap_or("unknown");
        println!("✓ status: {} (database: {})", status, database);
    })
}
