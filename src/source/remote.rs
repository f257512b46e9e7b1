//! REST backend entity source

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::traits::EntitySource;
use crate::http::check_response;

/// GETs a JSON document from a REST endpoint
pub struct HttpSource {
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl EntitySource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn load(&self) -> anyhow::Result<Value> {
        debug!("GET {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let response = check_response(response, "Entity source").await?;
        Ok(response.json().await?)
    }
}
