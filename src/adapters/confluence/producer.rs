//! Enumerates candidate pages from a Confluence space and emits Tasks,
//! filtered by a recency predicate.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::seq::SliceRandom;
use reqwest::Client;
use uuid::Uuid;

use super::wire::{ConfluencePage, ConfluencePageListResponse};
use crate::asyncio::flatten_lazy;
use crate::domain::config::{ConfluenceConfig, GeneratorConfig};
use crate::domain::models::Task;
use crate::domain::ports::{Producer, TaskStream};
use crate::error::ConfluenceError;

pub struct ConfluenceProducer {
    config: ConfluenceConfig,
    generator_config: GeneratorConfig,
    client: Client,
}

impl ConfluenceProducer {
    pub fn new(config: ConfluenceConfig, generator_config: GeneratorConfig) -> Self {
        let client = Client::builder()
            .build()
            .expect("failed to build Confluence HTTP client");
        Self {
            config,
            generator_config,
            client,
        }
    }

    async fn fetch_window(&self, offset: u32, limit: u32) -> Result<Vec<ConfluencePage>, ConfluenceError> {
        let url = format!(
            "{}/wiki/rest/api/content/search",
            self.config.base_url.trim_end_matches('/')
        );
        let cql = format!("space = \"{}\" and type = page", self.config.space);
        let res = self
            .client
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.api_key))
            .query(&[
                ("cql", cql.as_str()),
                ("start", offset.to_string().as_str()),
                ("limit", limit.to_string().as_str()),
                ("expand", "version,history,lastModified"),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(ConfluenceError::ApiError {
                status,
                space: self.config.space.clone(),
                body,
            });
        }

        let parsed: ConfluencePageListResponse = res
            .json()
            .await
            .map_err(|e| ConfluenceError::ParseError(e.to_string()))?;
        Ok(parsed.results)
    }

    fn survives_recency_filter(&self, page: &ConfluencePage) -> bool {
        if self.config.months_back <= 0 {
            return true;
        }
        let Some(raw) = page.last_modified_timestamp() else {
            // Fail-open: no timestamp field decipherable.
            return true;
        };
        let normalized = normalize_trailing_utc_marker(raw);
        let Ok(modified) = DateTime::parse_from_rfc3339(&normalized) else {
            return true;
        };
        let cutoff = Utc::now() - ChronoDuration::days(self.config.months_back * 30);
        modified.with_timezone(&Utc) >= cutoff
    }
}

/// Normalizes a trailing `Z` UTC marker into an explicit offset so
/// `DateTime::parse_from_rfc3339` accepts it uniformly.
fn normalize_trailing_utc_marker(timestamp: &str) -> String {
    if let Some(stripped) = timestamp.strip_suffix('Z') {
        format!("{stripped}+00:00")
    } else {
        timestamp.to_string()
    }
}

#[async_trait]
impl Producer for ConfluenceProducer {
    fn name(&self) -> &str {
        "confluence"
    }

    async fn stream(&self) -> Result<TaskStream<'_>, ConfluenceError> {
        let mut offset = self.config.skip;
        let end = self.config.skip + self.config.max_pages;
        let mut windows = Vec::new();
        while offset < end {
            let limit = self.config.page_batch_size.min(end - offset);
            windows.push((offset, limit));
            offset += self.config.page_batch_size;
        }

        let fetched = crate::asyncio::run_limited(
            windows
                .into_iter()
                .map(|(offset, limit)| self.fetch_window(offset, limit))
                .collect(),
            self.config.concurrency,
        )
        .await;

        let mut pages = Vec::new();
        for batch in fetched {
            match batch {
                Ok(p) => pages.push(p),
                Err(err) => tracing::warn!(error = %err, "confluence window fetch failed"),
            }
        }

        let mut survivors: Vec<ConfluencePage> = flatten_lazy(pages)
            .filter(|page| self.survives_recency_filter(page))
            .collect();

        if self.config.random_selection && !self.config.no_random_selection {
            survivors.shuffle(&mut rand::thread_rng());
        }

        let language = self.generator_config.language.parse().unwrap_or_default();
        let difficulty = self
            .generator_config
            .difficulty_ratio
            .parse()
            .unwrap_or_default();
        let temperature = self.generator_config.temperature;

        let tasks: Vec<Task> = survivors
            .into_iter()
            .map(|page| {
                let idempotency_key = page
                    .last_modified_timestamp()
                    .map(str::to_string)
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                let mut metadata = std::collections::HashMap::new();
                metadata.insert(
                    "links".to_string(),
                    serde_json::to_value(&page.links).unwrap_or_default(),
                );
                Task {
                    title: page.title,
                    url: page.id,
                    downloader: "confluence".to_string(),
                    idempotency_key,
                    metadata,
                    language,
                    difficulty,
                    temperature,
                }
            })
            .collect();

        Ok(Box::pin(tokio_stream::iter(tasks)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn producer() -> ConfluenceProducer {
        ConfluenceProducer::new(
            ConfluenceConfig {
                space: "ENG".into(),
                base_url: "https://example.atlassian.net".into(),
                username: "bot".into(),
                api_key: "token".into(),
                cloud: true,
                no_cloud: false,
                max_pages: 50,
                months_back: 3,
                random_selection: false,
                no_random_selection: true,
                concurrency: 4,
                page_batch_size: 50,
                skip: 0,
                enabled: true,
                disabled: false,
            },
            GeneratorConfig {
                model: "m".into(),
                language: "en".into(),
                max_tokens: 1,
                temperature: 0.7,
                base_url: "http://localhost".into(),
                difficulty_ratio: "mixed".into(),
                concurrency: 1,
                is_short: true,
                batch_size: 1,
                enabled: true,
                disabled: false,
            },
        )
    }

    #[test]
    fn recent_page_survives_filter() {
        let p = producer();
        let page: ConfluencePage = serde_json::from_value(serde_json::json!({
            "id": "1",
            "title": "Doc",
            "version": { "when": (Utc::now() - ChronoDuration::days(30)).to_rfc3339() },
        }))
        .unwrap();
        assert!(p.survives_recency_filter(&page));
    }

    #[test]
    fn stale_page_is_dropped_by_filter() {
        let p = producer();
        let page: ConfluencePage = serde_json::from_value(serde_json::json!({
            "id": "1",
            "title": "Doc",
            "version": { "when": (Utc::now() - ChronoDuration::days(400)).to_rfc3339() },
        }))
        .unwrap();
        assert!(!p.survives_recency_filter(&page));
    }

    #[test]
    fn page_with_no_timestamp_is_kept_fail_open() {
        let p = producer();
        let page: ConfluencePage = serde_json::from_value(serde_json::json!({
            "id": "1",
            "title": "Doc",
        }))
        .unwrap();
        assert!(p.survives_recency_filter(&page));
    }

    #[test]
    fn trailing_z_marker_is_normalized() {
        assert_eq!(
            normalize_trailing_utc_marker("2024-01-02T03:04:05Z"),
            "2024-01-02T03:04:05+00:00"
        );
        assert_eq!(
            normalize_trailing_utc_marker("2024-01-02T03:04:05+00:00"),
            "2024-01-02T03:04:05+00:00"
        );
    }
}
