//! Kodik API Data Structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single stream variant for one quality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KodikVideoSource {
    pub src: String,
    #[serde(rename = "type", default)]
    pub mime_type: String,
}

/// Quality label ("360", "480", "720", ...) to stream variants
pub type KodikVideoLinks = BTreeMap<String, Vec<KodikVideoSource>>;

/// Advertisement block returned alongside the links
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KodikVast {
    #[serde(default)]
    pub title_small: String,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub timer: Option<u64>,
    #[serde(default)]
    pub hide_interface: Option<bool>,
    #[serde(default)]
    pub advert_id: Option<String>,
    /// Player flags not modelled above (vpaid_*, start_muted, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of the private link endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KodikDirectLinkResponse {
    #[serde(default)]
    pub advert_script: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub default: Option<i64>,
    pub links: KodikVideoLinks,
    #[serde(default)]
    pub vast: Vec<KodikVast>,
    #[serde(default)]
    pub reserve_vast: Vec<KodikVast>,
    #[serde(default)]
    pub ip: Option<String>,
}

/// Identifiers scraped from the inline player script
#[derive(Debug, Clone, PartialEq)]
pub struct KodikVideoInfo {
    /// `urlParams` blob; empty when absent or not valid JSON
    pub url_params: Map<String, Value>,
    pub video_type: String,
    pub hash: String,
    pub id: String,
}

impl KodikVideoInfo {
    /// Query pairs for the link endpoint: `urlParams` entries in page order,
    /// then `type`, `hash` and `id` replacing any same-named entry in place.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .url_params
            .iter()
            .map(|(key, value)| (key.clone(), param_to_string(value)))
            .collect();

        for (key, value) in [
            ("type", &self.video_type),
            ("hash", &self.hash),
            ("id", &self.id),
        ] {
            match pairs.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1.clone_from(value),
                None => pairs.push((key.to_string(), value.clone())),
            }
        }

        pairs
    }
}

fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
