//! Typed view of the subset of the Confluence REST page-list response the
//! producer actually consults. The platform returns many more fields than
//! are modeled here; unknown fields are ignored on deserialize rather than
//! rejected, so the producer keeps working as the platform's schema grows.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct ConfluencePageListResponse {
    #[serde(default)]
    pub results: Vec<ConfluencePage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfluencePage {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: Option<Version>,
    #[serde(default)]
    pub history: Option<History>,
    #[serde(rename = "lastModified", default)]
    pub last_modified: Option<TimestampField>,
    #[serde(default)]
    pub created: Option<TimestampField>,
    #[serde(rename = "_expandable", default)]
    pub expandable: HashMap<String, String>,
    #[serde(rename = "_links", default)]
    pub links: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Version {
    pub when: Option<String>,
    #[serde(default)]
    pub number: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct History {
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: Option<TimestampField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimestampField {
    pub when: Option<String>,
}

impl ConfluencePage {
    /// Probes timestamp fields in the priority order the recency predicate
    /// requires: `version.when`, `lastModified.when`,
    /// `history.lastUpdated.when`, `_expandable.lastModified`,
    /// `created.when`.
    pub fn last_modified_timestamp(&self) -> Option<&str> {
        self.version
            .as_ref()
            .and_then(|v| v.when.as_deref())
            .or_else(|| self.last_modified.as_ref().and_then(|t| t.when.as_deref()))
            .or_else(|| {
                self.history
                    .as_ref()
                    .and_then(|h| h.last_updated.as_ref())
                    .and_then(|t| t.when.as_deref())
            })
            .or_else(|| self.expandable.get("lastModified").map(String::as_str))
            .or_else(|| self.created.as_ref().and_then(|t| t.when.as_deref()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfluenceBodyResponse {
    #[serde(default)]
    pub body: Option<ConfluenceBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfluenceBody {
    #[serde(default)]
    pub view: Option<ConfluenceBodyValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfluenceBodyValue {
    #[serde(default)]
    pub value: String,
}
