use clap::Subcommand;
use reqwest::Method;

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_success, output_value, print_post, print_post_out};
use crate::cli::OutputFormat;
use crate::database::models::{Post, PostCreate, PostOut};

#[derive(Subcommand)]
pub enum PostCommands {
    #[command(about = "List posts with vote counts")]
    List {
        #[arg(long, default_value_t = 10, help = "Maximum number of posts")]
        limit: u32,
        #[arg(long, default_value_t = 0, help = "Number of posts to skip")]
        skip: u32,
        #[arg(long, default_value = "", help = "Only titles containing this text")]
        search: String,
    },

    #[command(about = "Show one post with its vote count")]
    Get {
        #[arg(help = "Post id")]
        id: i32,
    },

    #[command(about = "Create a post owned by the token's user")]
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, help = "Create the post as unpublished")]
        unpublished: bool,
    },

    #[command(about = "Replace a post's title, content and published flag")]
    Update {
        #[arg(help = "Post id")]
        id: i32,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, help = "Mark the post as unpublished")]
        unpublished: bool,
    },

    #[command(about = "Delete a post (owner only)")]
    Delete {
        #[arg(help = "Post id")]
        id: i32,
    },
}

pub async fn handle(cmd: PostCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        PostCommands::List { limit, skip, search } => {
            let request = client
                .request(Method::GET, "/posts/")?
                .query(&[("limit", limit.to_string()), ("skip", skip.to_string()), ("search", search)]);
            let posts: Vec<PostOut> = client.send_json(request).await?;

            output_value(&output_format, &posts, |posts| {
                if posts.is_empty() {
                    println!("No posts found");
                }
                for post in posts {
                    print_post_out(post);
                }
            })
        }
        PostCommands::Get { id } => {
            let post: PostOut = client
                .send_json(client.request(Method::GET, &format!("/posts/{}", id))?)
                .await?;
            output_value(&output_format, &post, print_post_out)
        }
        PostCommands::Create { title, content, unpublished } => {
            let payload = PostCreate {
                title,
                content,
                published: !unpublished,
            };
            let post: Post = client
                .send_json(client.authed(Method::POST, "/posts/")?.json(&payload))
                .await?;
            output_value(&output_format, &post, print_post)
        }
        PostCommands::Update { id, title, content, unpublished } => {
            let payload = PostCreate {
                title,
                content,
                published: !unpublished,
            };
            let post: Post = client
                .send_json(client.authed(Method::PUT, &format!("/posts/{}", id))?.json(&payload))
                .await?;
            output_value(&output_format, &post, print_post)
        }
        PostCommands::Delete { id } => {
            client
                .send_empty(client.authed(Method::DELETE, &format!("/posts/{}", id))?)
                .await?;
            output_success(&output_format, &format!("Post {} deleted", id))
        }
    }
}
