//! Fetches one Confluence page's storage body by id.

use async_trait::async_trait;
use reqwest::Client;

use super::wire::ConfluenceBodyResponse;
use crate::domain::config::ConfluenceConfig;
use crate::domain::models::{Task, TaskResult};
use crate::domain::ports::Downloader;
use crate::error::DownloadError;
use crate::hash::strhash;

pub struct ConfluenceDownloader {
    config: ConfluenceConfig,
    client: Client,
}

impl ConfluenceDownloader {
    pub fn new(config: ConfluenceConfig) -> Self {
        let client = Client::builder()
            .build()
            .expect("failed to build Confluence HTTP client");
        Self { config, client }
    }
}

#[async_trait]
impl Downloader for ConfluenceDownloader {
    async fn fetch(&self, task: &Task) -> Result<Option<TaskResult>, DownloadError> {
        if task.downloader != "confluence" {
            return Err(DownloadError::WrongDownloader {
                expected: "confluence".to_string(),
                actual: task.downloader.clone(),
            });
        }

        let url = format!(
            "{}/wiki/rest/api/content/{}",
            self.config.base_url.trim_end_matches('/'),
            task.url
        );
        let res = self
            .client
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.api_key))
            .query(&[("expand", "body.storage,body.view")])
            .send()
            .await
            .map_err(|e| DownloadError::Transport(task.url.clone(), e))?;

        let status_code = res.status().as_u16();
        let headers = res
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect();

        if !res.status().is_success() {
            let body = res.text().await.unwrap_or_default();
            let hash = strhash(body.as_bytes());
            return Ok(Some(TaskResult {
                title: task.title.clone(),
                url: task.url.clone(),
                status_code,
                headers,
                content: body,
                hash,
                language: task.language,
                difficulty: task.difficulty,
                temperature: task.temperature,
            }));
        }

        let parsed: ConfluenceBodyResponse = res
            .json()
            .await
            .map_err(|e| DownloadError::Transport(task.url.clone(), e))?;

        let body_html = parsed
            .body
            .and_then(|b| b.view)
            .map(|v| v.value)
            .unwrap_or_default();

        if body_html.is_empty() {
            return Err(DownloadError::EmptyBody(task.url.clone()));
        }

        let hash = strhash(body_html.as_bytes());
        Ok(Some(TaskResult {
            title: task.title.clone(),
            url: task.url.clone(),
            status_code,
            headers,
            content: body_html,
            hash,
            language: task.language,
            difficulty: task.difficulty,
            temperature: task.temperature,
        }))
    }
}
