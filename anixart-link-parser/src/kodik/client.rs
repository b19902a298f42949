//! Kodik link resolver
//!
//! Two independent pipelines:
//! - `latest_endpoint`: embed page -> `app.player_single.*.js` -> `atob(...)` path.
//!   Kodik rotates the private endpoint, so it has to be rediscovered.
//! - `direct_links`: embed page -> inline `urlParams`/`videoInfo.*` -> endpoint
//!   -> per-source decode.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use super::cipher::{decode_base64_text, decode_source};
use super::types::{KodikDirectLinkResponse, KodikVideoInfo, KodikVideoLinks};
use crate::config::KodikConfig;
use crate::error::Result;
use crate::extract::named_capture;
use crate::http::{FetchRequest, ReqwestFetcher, SharedFetcher};

static RE_PLAYER_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)src="(?<path>/assets/js/app\.player_single\..*?\.js)">"#)
        .expect("invalid player script regex")
});
static RE_ENCODED_ENDPOINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)url:atob\("(?<encoded>[^"]+)"\)"#).expect("invalid atob regex")
});
static RE_URL_PARAMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)var\surlParams\s=\s'(?<params>.*?)';").expect("invalid urlParams regex")
});
static RE_VIDEO_HASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)videoInfo.hash\s=\s'(?<hash>.*?)';").expect("invalid videoInfo.hash regex")
});
static RE_VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)videoInfo.id\s=\s'(?<id>.*?)';").expect("invalid videoInfo.id regex")
});
static RE_VIDEO_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"videoInfo.type\s=\s'(?<type>.*?)';").expect("invalid videoInfo.type regex")
});
// Kodik sometimes hands out unobfuscated storage manifests; those must not be decoded
static RE_PLAIN_HLS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)//(get|cloud)\.kodik-storage\.com/useruploads/.*?/.*?/(240|360|480|720|1080)\.mp4:hls:manifest.m3u8",
    )
    .expect("invalid plain HLS regex")
});

/// Kodik link resolver
pub struct KodikParser {
    fetcher: SharedFetcher,
    config: KodikConfig,
}

impl KodikParser {
    pub fn new(fetcher: SharedFetcher, config: KodikConfig) -> Self {
        Self { fetcher, config }
    }

    /// Resolver on the shared reqwest pool with default endpoints
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(ReqwestFetcher::shared()), KodikConfig::default())
    }

    #[must_use]
    pub fn config(&self) -> &KodikConfig {
        &self.config
    }

    /// Discover the current private link endpoint path (e.g. `/ftor`)
    pub async fn latest_endpoint(&self, embed_url: &str) -> Result<Option<String>> {
        let page_url = Url::parse(embed_url)?;
        let page = self.fetch_text(embed_url).await?;

        let Some(script_path) = Self::extract_player_script(&page) else {
            debug!(embed_url, "Kodik player script not found");
            return Ok(None);
        };

        let script_url = page_url.join(script_path)?;
        // A rotated script is a discovery miss, not a provider failure
        let script = self.fetcher.fetch(FetchRequest::get(script_url.as_str())).await?;
        if !script.status.is_success() {
            debug!(script = %script_url, status = %script.status, "Kodik player script unavailable");
            return Ok(None);
        }

        let Some(encoded) = Self::extract_encoded_endpoint(&script.body) else {
            debug!(script = %script_url, "Kodik endpoint payload not found");
            return Ok(None);
        };

        let endpoint = decode_base64_text(encoded);
        if endpoint.is_none() {
            warn!(encoded, "Kodik endpoint payload is not valid base64 text");
        }
        Ok(endpoint)
    }

    /// Fetch direct links for an embed page via `endpoint_path`
    /// (the configured default when `None`)
    pub async fn direct_links(
        &self,
        embed_url: &str,
        endpoint_path: Option<&str>,
    ) -> Result<Option<KodikVideoLinks>> {
        let page = self.fetch_text(embed_url).await?;

        let Some(info) = Self::extract_video_info(&page) else {
            debug!(embed_url, "Kodik videoInfo not found");
            return Ok(None);
        };

        let endpoint = endpoint_path.unwrap_or(self.config.default_endpoint.as_str());
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(info.query_pairs())
            .finish();
        let request_url = format!("{}{}?{}", self.config.api_origin, endpoint, query);

        // Sent without a Referer
        let response = self.fetcher.fetch(FetchRequest::get(&request_url)).await?;

        if !response.is_json() {
            debug!(
                url = %request_url,
                content_type = ?response.content_type(),
                "Kodik endpoint did not answer with JSON"
            );
            return Ok(None);
        }
        let response = response.check_status(&request_url)?;

        let body: KodikDirectLinkResponse = match response.json() {
            Ok(body) => body,
            Err(e) => {
                warn!(url = %request_url, error = %e, "Malformed Kodik link response");
                return Ok(None);
            }
        };

        Ok(Self::decode_links(body.links))
    }

    /// Discover the endpoint, then fetch links; falls back to the default
    /// endpoint when discovery comes up empty.
    pub async fn resolve(&self, embed_url: &str) -> Result<Option<KodikVideoLinks>> {
        let endpoint = self.latest_endpoint(embed_url).await?;
        if endpoint.is_none() {
            debug!(default = %self.config.default_endpoint, "Using default Kodik endpoint");
        }
        self.direct_links(embed_url, endpoint.as_deref()).await
    }

    /// Path of the versioned `app.player_single` script
    #[must_use]
    pub fn extract_player_script(page: &str) -> Option<&str> {
        named_capture(&RE_PLAYER_SCRIPT, page, "path")
    }

    /// Base64 payload of `url:atob("...")`
    #[must_use]
    pub fn extract_encoded_endpoint(script: &str) -> Option<&str> {
        named_capture(&RE_ENCODED_ENDPOINT, script, "encoded")
    }

    /// Inline `urlParams` and `videoInfo.{type,hash,id}`; `None` unless all three ids are present
    #[must_use]
    pub fn extract_video_info(page: &str) -> Option<KodikVideoInfo> {
        let hash = named_capture(&RE_VIDEO_HASH, page, "hash")?;
        let id = named_capture(&RE_VIDEO_ID, page, "id")?;
        let video_type = named_capture(&RE_VIDEO_TYPE, page, "type")?;

        let url_params = named_capture(&RE_URL_PARAMS, page, "params")
            .and_then(|raw| serde_json::from_str::<Map<String, Value>>(raw).ok())
            .unwrap_or_default();

        Some(KodikVideoInfo {
            url_params,
            video_type: video_type.to_string(),
            hash: hash.to_string(),
            id: id.to_string(),
        })
    }

    /// Whether `src` is an unobfuscated storage manifest
    #[must_use]
    pub fn is_plain_hls(src: &str) -> bool {
        RE_PLAIN_HLS.is_match(src)
    }

    /// Decode every obfuscated source; plain manifests are left as-is
    fn decode_links(mut links: KodikVideoLinks) -> Option<KodikVideoLinks> {
        for (quality, sources) in &mut links {
            for source in sources.iter_mut() {
                if Self::is_plain_hls(&source.src) {
                    continue;
                }
                let Some(decoded) = decode_source(&source.src) else {
                    warn!(quality = %quality, "Kodik source could not be decoded");
                    return None;
                };
                source.src = decoded;
            }
        }
        Some(links)
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.fetcher.fetch(FetchRequest::get(url)).await?;
        Ok(response.check_status(url)?.body)
    }
}
