use serde::Serialize;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::database::models::{Post, PostOut};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "success": true, "message": message }))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Pretty JSON for `--json`, otherwise hand the value to `text`
pub fn output_value<T, F>(output_format: &OutputFormat, value: &T, text: F) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T),
{
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => text(value),
    }
    Ok(())
}

pub fn print_post(post: &Post) {
    let draft = if post.published { "" } else { " [unpublished]" };
    println!(
        "#{} {}{} (owner {}, {})",
        post.id,
        post.title,
        draft,
        post.owner_id,
        post.created_at.format("%Y-%m-%d %H:%M")
    );
}

pub fn print_post_out(post: &PostOut) {
    print_post(&post.post);
    println!("    votes: {}", post.votes);
}
