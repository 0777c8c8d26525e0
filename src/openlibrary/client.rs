//! HTTP client for the OpenLibrary JSON API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;

use super::CatalogSource;
use crate::{
    config::OpenLibraryConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(config: &OpenLibraryConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, url: Url) -> AppResult<Value> {
        tracing::debug!("OpenLibrary GET {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("OpenLibrary request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("OpenLibrary record not found".to_string()));
        }
        if !status.is_success() {
            return Err(AppError::Upstream(format!("OpenLibrary returned {}", status)));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|_| AppError::Upstream("OpenLibrary invalid JSON".to_string()))?;

        if !data.is_object() {
            return Err(AppError::Upstream("OpenLibrary invalid JSON".to_string()));
        }
        Ok(data)
    }
}

#[async_trait]
impl CatalogSource for OpenLibraryClient {
    async fn search(&self, query: &str, limit: u32, fields: Option<String>) -> AppResult<Value> {
        let mut params = vec![("q", query.to_string()), ("limit", limit.to_string())];
        if let Some(fields) = fields {
            params.push(("fields", fields));
        }

        let url = Url::parse_with_params(&format!("{}/search.json", self.base_url), &params)
            .map_err(|e| AppError::Internal(format!("Invalid OpenLibrary URL: {}", e)))?;

        self.get_json(url).await
    }

    async fn edition(&self, olid: &str) -> AppResult<Value> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::Internal(format!("Invalid OpenLibrary URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("OpenLibrary base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push("books")
            .push(&format!("{}.json", olid));

        self.get_json(url).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound(format!("Edition {} not found", olid)),
            other => other,
        })
    }
}
