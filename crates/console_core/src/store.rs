//! Pattern store seam and its adapters.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::PatternRecord,
    protocol::{normalize_rows, PatternRow},
};
use tracing::{debug, warn};
use url::Url;

use crate::{config::SupabaseSettings, error::StoreUnavailable};

#[async_trait]
pub trait PatternStore: Send + Sync {
    async fn list_patterns(&self) -> Result<Vec<PatternRecord>, StoreUnavailable>;
}

/// Stands in when the remote store is not configured.
pub struct MissingPatternStore {
    reason: String,
}

impl MissingPatternStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PatternStore for MissingPatternStore {
    async fn list_patterns(&self) -> Result<Vec<PatternRecord>, StoreUnavailable> {
        Err(StoreUnavailable::new(self.reason.clone()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticPatternStore {
    patterns: Vec<PatternRecord>,
}

impl StaticPatternStore {
    pub fn new(patterns: Vec<PatternRecord>) -> Self {
        Self { patterns }
    }

    pub fn from_rows(rows: Vec<PatternRow>) -> Self {
        let (patterns, duplicates) = normalize_rows(rows);
        if !duplicates.is_empty() {
            warn!(?duplicates, "dropped pattern rows with repeated ids");
        }
        Self { patterns }
    }

    /// Loads rows shaped like the remote `Patterns` table from a JSON array.
    pub async fn from_json_file(path: &Path) -> Result<Self, StoreUnavailable> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|err| {
            StoreUnavailable::new(format!("failed to read '{}': {err}", path.display()))
        })?;
        let rows: Vec<PatternRow> = serde_json::from_str(&raw).map_err(|err| {
            StoreUnavailable::new(format!("invalid pattern file '{}': {err}", path.display()))
        })?;
        Ok(Self::from_rows(rows))
    }
}

#[async_trait]
impl PatternStore for StaticPatternStore {
    async fn list_patterns(&self) -> Result<Vec<PatternRecord>, StoreUnavailable> {
        Ok(self.patterns.clone())
    }
}

/// Reads the pattern table through Supabase's PostgREST endpoint.
pub struct SupabasePatternStore {
    http: Client,
    endpoint: Url,
    api_key: String,
}

impl SupabasePatternStore {
    pub fn new(
        http: Client,
        base_url: &str,
        api_key: impl Into<String>,
        table: &str,
    ) -> Result<Self, StoreUnavailable> {
        let endpoint = table_endpoint(base_url, table)?;
        Ok(Self {
            http,
            endpoint,
            api_key: api_key.into(),
        })
    }

    pub fn from_settings(settings: &SupabaseSettings) -> Result<Self, StoreUnavailable> {
        if settings.url.trim().is_empty() {
            return Err(StoreUnavailable::new("SUPABASE_URL is not configured"));
        }
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|err| StoreUnavailable::new(format!("failed to build http client: {err}")))?;
        Self::new(
            http,
            &settings.url,
            settings.api_key.clone(),
            &settings.table,
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn table_endpoint(base_url: &str, table: &str) -> Result<Url, StoreUnavailable> {
    let mut base = Url::parse(base_url.trim()).map_err(|err| {
        StoreUnavailable::new(format!("invalid pattern store url '{base_url}': {err}"))
    })?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(&format!("rest/v1/{}", table.trim())).map_err(|err| {
        StoreUnavailable::new(format!("invalid pattern table '{table}': {err}"))
    })
}

#[async_trait]
impl PatternStore for SupabasePatternStore {
    async fn list_patterns(&self) -> Result<Vec<PatternRecord>, StoreUnavailable> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("select", "*")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| StoreUnavailable::new(format!("failed to reach pattern store: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreUnavailable::new(format!(
                "pattern store returned {status}: {}",
                body.trim()
            )));
        }

        let rows: Vec<PatternRow> = response.json().await.map_err(|err| {
            StoreUnavailable::new(format!("invalid pattern store payload: {err}"))
        })?;
        let (patterns, duplicates) = normalize_rows(rows);
        if !duplicates.is_empty() {
            warn!(?duplicates, "dropped pattern rows with repeated ids");
        }
        debug!(count = patterns.len(), "fetched patterns");
        Ok(patterns)
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
