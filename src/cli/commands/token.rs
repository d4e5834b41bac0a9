use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_value;
use crate::cli::OutputFormat;
use crate::config;

pub fn handle(user_id: i32, hours: Option<u64>, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config::config().security;
    let hours = hours.unwrap_or(security.jwt_expiry_hours);

    let token = generate_jwt(&Claims::new(user_id, hours)?, &security.jwt_secret)?;

    output_value(&output_format, &json!({ "access_token": token, "token_type": "bearer" }), |_| {
        println!("{}", token);
    })
}
