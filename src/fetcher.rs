// Report API client: group overview and per-server health history

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::models::{GroupOverview, HealthSnapshot};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::instrument;

/// Source of dashboard data. The worker only talks to the API through this trait.
pub trait Fetcher: Send + Sync + 'static {
    /// GET /data/{group}
    fn fetch_overview(
        &self,
        group: &str,
    ) -> impl Future<Output = Result<GroupOverview, FetchError>> + Send;

    /// GET /health/server-{id}/health
    fn fetch_history(
        &self,
        server_id: i64,
    ) -> impl Future<Output = Result<Vec<HealthSnapshot>, FetchError>> + Send;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn overview_url(&self, group: &str) -> String {
        format!("{}/data/{}", self.base_url, group)
    }

    pub fn history_url(&self, server_id: i64) -> String {
        format!("{}/health/server-{}/health", self.base_url, server_id)
    }

    // Body is read as text first so a bad payload surfaces as Parse, not Request.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Transport { status });
        }
        let body = response.text().await?;
        tracing::debug!(url, bytes = body.len(), "response received");
        Ok(serde_json::from_str(&body)?)
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(skip(self), fields(operation = "fetch_overview"))]
    async fn fetch_overview(&self, group: &str) -> Result<GroupOverview, FetchError> {
        let url = self.overview_url(group);
        self.get_json(&url).await
    }

    #[instrument(skip(self), fields(operation = "fetch_history"))]
    async fn fetch_history(&self, server_id: i64) -> Result<Vec<HealthSnapshot>, FetchError> {
        let url = self.history_url(server_id);
        self.get_json(&url).await
    }
}
