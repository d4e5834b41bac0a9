use anyhow::{anyhow, bail, Context};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Thin reqwest wrapper around the Posts HTTP surface
pub struct ApiClient {
    base_url: url::Url,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let base_url = url::Url::parse(base_url).with_context(|| format!("invalid server URL: {}", base_url))?;
        Ok(Self {
            base_url,
            token,
            http: reqwest::Client::new(),
        })
    }

    pub fn request(&self, method: Method, path: &str) -> anyhow::Result<RequestBuilder> {
        let url = self.base_url.join(path)?;
        Ok(self.http.request(method, url))
    }

    /// Same as `request` but fails early when no token was supplied.
    pub fn authed(&self, method: Method, path: &str) -> anyhow::Result<RequestBuilder> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| anyhow!("this command needs --token or POSTS_API_TOKEN"))?;
        Ok(self.request(method, path)?.bearer_auth(token))
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> anyhow::Result<T> {
        let response = Self::check(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn send_empty(&self, request: RequestBuilder) -> anyhow::Result<()> {
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn check(response: Response) -> anyhow::Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        match status {
            StatusCode::UNAUTHORIZED => bail!("unauthorized: {}", detail),
            StatusCode::FORBIDDEN => bail!("forbidden: {}", detail),
            StatusCode::NOT_FOUND => bail!("not found: {}", detail),
            _ => bail!("{} {}", status.as_u16(), detail),
        }
    }
}
