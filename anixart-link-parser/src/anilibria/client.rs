//! AniLibria link resolver
//!
//! The reference carries `id=<release>` and `ep=<ordinal>`; the release
//! document already contains ready-to-play HLS URLs per episode.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use super::types::{AniLibriaLinks, AniLibriaRelease};
use crate::config::AniLibriaConfig;
use crate::error::Result;
use crate::extract::named_capture_u64;
use crate::http::{FetchRequest, ReqwestFetcher, SharedFetcher};

static RE_RELEASE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"id=(?<id>\d+)").expect("invalid release id regex"));
static RE_EPISODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ep=(?<ep>\d+)").expect("invalid episode regex"));

const RELEASES_PATH: &str = "/api/v1/anime/releases";

/// AniLibria link resolver
pub struct AniLibriaParser {
    fetcher: SharedFetcher,
    config: AniLibriaConfig,
}

impl AniLibriaParser {
    pub fn new(fetcher: SharedFetcher, config: AniLibriaConfig) -> Self {
        Self { fetcher, config }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(ReqwestFetcher::shared()), AniLibriaConfig::default())
    }

    /// Extract release id from `...id=<digits>...`
    #[must_use]
    pub fn extract_release_id(link: &str) -> Option<u64> {
        named_capture_u64(&RE_RELEASE_ID, link, "id")
    }

    /// Extract episode ordinal from `...ep=<digits>...`
    #[must_use]
    pub fn extract_episode(link: &str) -> Option<u64> {
        named_capture_u64(&RE_EPISODE, link, "ep")
    }

    /// Fetch a release document. `None` when the body does not fit the release schema.
    pub async fn release(&self, release_id: u64) -> Result<Option<AniLibriaRelease>> {
        let url = format!("{}{}/{}", self.config.api_origin, RELEASES_PATH, release_id);
        let response = self
            .fetcher
            .fetch(FetchRequest::get(&url))
            .await?
            .check_status(&url)?;

        match response.json::<AniLibriaRelease>() {
            Ok(release) => Ok(Some(release)),
            Err(e) => {
                warn!(url = %url, error = %e, "Malformed AniLibria release");
                Ok(None)
            }
        }
    }

    /// Resolve `...?id=<release>&ep=<ordinal>` into 1080/720/480 streams
    pub async fn direct_links(&self, link: &str) -> Result<Option<AniLibriaLinks>> {
        let Some(episode) = Self::extract_episode(link) else {
            debug!(link, "AniLibria link has no episode ordinal");
            return Ok(None);
        };
        let Some(release_id) = Self::extract_release_id(link) else {
            debug!(link, "AniLibria link has no release id");
            return Ok(None);
        };

        let Some(release) = self.release(release_id).await? else {
            return Ok(None);
        };

        let Some(found) = release.episode(episode) else {
            debug!(release_id, episode, "AniLibria episode not found");
            return Ok(None);
        };

        let links = found.links();
        Ok((!links.is_empty()).then_some(links))
    }
}
