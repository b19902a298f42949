//! Sibnet link resolver
//!
//! The embed page assigns a relative, signed path (`src: "/v/....mp4"`).
//! Requesting it from the video host with the embed page as `Referer`
//! redirects to the CDN URL, which is the playable link.
//!
//! Redirects are followed here rather than by the HTTP client: the forced
//! `Host` header must only reach the video host, never the CDN.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use reqwest::header::{HOST, REFERER};
use tracing::debug;
use url::Url;

use crate::config::SibnetConfig;
use crate::error::{ParserError, Result};
use crate::extract::indexed_capture;
use crate::http::{FetchRequest, ReqwestFetcher, SharedFetcher};

static RE_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src: (".*?")"#).expect("invalid src regex"));

/// Sibnet link resolver
pub struct SibnetParser {
    fetcher: SharedFetcher,
    config: SibnetConfig,
}

impl SibnetParser {
    pub fn new(fetcher: SharedFetcher, config: SibnetConfig) -> Self {
        Self { fetcher, config }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(ReqwestFetcher::shared()), SibnetConfig::default())
    }

    /// Relative video path from the first `src: "..."` assignment, quotes stripped
    #[must_use]
    pub fn extract_video_path(page: &str) -> Option<String> {
        indexed_capture(&RE_SRC, page, 1).map(|quoted| quoted.replace('"', ""))
    }

    /// Resolve an embed page (`https://video.sibnet.ru/shell.php?videoid=...`) into the final CDN URL
    pub async fn direct_link(&self, embed_url: &str) -> Result<Option<String>> {
        let page = self
            .fetcher
            .fetch(FetchRequest::get(embed_url))
            .await?
            .check_status(embed_url)?;

        let Some(path) = Self::extract_video_path(&page.body) else {
            debug!(embed_url, "Sibnet video src not found");
            return Ok(None);
        };

        let mut url = Url::parse(&format!("{}{}", self.config.video_origin, path))?;
        let mut request = FetchRequest::get(url.as_str())
            .header(HOST, &self.config.video_host)?
            .header(REFERER, embed_url)?
            .discard_body()
            .no_redirect();

        for _ in 0..=self.config.max_redirects {
            let response = self.fetcher.fetch(request).await?;

            let Some(location) = response.redirect_location() else {
                if response.final_url.is_none() {
                    debug!(path = %path, "Sibnet video request reported no final URL");
                }
                return Ok(response.final_url);
            };

            url = url.join(location)?;
            debug!(next = %url, "Following Sibnet redirect");
            request = FetchRequest::get(url.as_str())
                .header(REFERER, embed_url)?
                .discard_body()
                .no_redirect();
        }

        Err(ParserError::TooManyRedirects { url: url.into() })
    }
}
