#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use posts_api::auth::{generate_jwt, Claims};
use posts_api::database::models::Vote;
use reqwest::StatusCode;
use sqlx::PgPool;
use tokio::sync::OnceCell;

pub const JWT_SECRET: &str = "integration-test-secret";

static SCHEMA: OnceCell<()> = OnceCell::const_new();

/// A `posts-api` child process owned by one test; killed on drop.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn(database_url: &str) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_posts-api"));
        cmd.env("POSTS_API_PORT", port.to_string())
            .env("DATABASE_URL", database_url)
            .env("JWT_SECRET", JWT_SECRET)
            .env("APP_ENV", "development")
            .env("SECURITY_ENFORCE_UPDATE_OWNERSHIP", "false")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Database-backed tests are skipped when no DATABASE_URL is available.
pub fn database_url() -> Option<String> {
    let _ = dotenvy::dotenv();
    std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty())
}

pub struct TestContext {
    pub server: TestServer,
    pub pool: PgPool,
    pub client: reqwest::Client,
}

impl TestContext {
    /// Creates a user row and returns its id
    pub async fn create_user(&self) -> Result<i32> {
        let email = format!("{}@example.test", uuid::Uuid::new_v4().simple());
        let id: i32 = sqlx::query_scalar("INSERT INTO users (email, password) VALUES ($1, 'not-a-hash') RETURNING id")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    pub async fn add_vote(&self, post_id: i64, user_id: i32) -> Result<Vote> {
        let vote: Vote =
            sqlx::query_as("INSERT INTO votes (post_id, user_id) VALUES ($1, $2) RETURNING post_id, user_id")
                .bind(i32::try_from(post_id)?)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(vote)
    }

    pub fn token_for(&self, user_id: i32) -> String {
        generate_jwt(&Claims::new(user_id, 1).expect("claims"), JWT_SECRET).expect("token")
    }
}

pub async fn setup() -> Result<Option<TestContext>> {
    let Some(database_url) = database_url() else {
        eprintln!("DATABASE_URL not set; skipping database-backed test");
        return Ok(None);
    };

    let pool = PgPool::connect(&database_url).await?;
    SCHEMA.get_or_try_init(|| ensure_schema(&pool)).await?;

    let server = TestServer::spawn(&database_url)?;
    server.wait_ready(Duration::from_secs(10)).await?;

    Ok(Some(TestContext {
        server,
        pool,
        client: reqwest::Client::new(),
    }))
}

/// Test fixture tables; the service itself never creates schema.
async fn ensure_schema(pool: &PgPool) -> Result<()> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            email VARCHAR NOT NULL UNIQUE,
            password VARCHAR NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
        "CREATE TABLE IF NOT EXISTS posts (
            id SERIAL PRIMARY KEY,
            title VARCHAR NOT NULL,
            content VARCHAR NOT NULL,
            published BOOLEAN NOT NULL DEFAULT TRUE,
            owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
        "CREATE TABLE IF NOT EXISTS votes (
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            PRIMARY KEY (user_id, post_id)
        )",
    ];
    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
