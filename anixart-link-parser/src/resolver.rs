//! Common resolver interface
//!
//! Each provider keeps its own result shape. `ResolvedSource` wraps them
//! without flattening away per-quality variants or MIME types.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::anilibria::{AniLibriaLinks, AniLibriaParser};
use crate::config::ParserConfig;
use crate::error::Result;
use crate::http::{ReqwestFetcher, SharedFetcher};
use crate::kodik::{KodikParser, KodikVideoLinks};
use crate::sibnet::SibnetParser;

const KODIK_DOMAINS: &[&str] = &["kodik.info", "kodik.biz", "kodik.cc", "aniqit.com"];
const ANILIBRIA_DOMAINS: &[&str] = &["anilibria.top", "anilibria.tv", "libria.fun"];
const SIBNET_DOMAINS: &[&str] = &["sibnet.ru"];

/// Supported video hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Kodik,
    AniLibria,
    Sibnet,
}

impl Provider {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kodik => "kodik",
            Self::AniLibria => "anilibria",
            Self::Sibnet => "sibnet",
        }
    }

    /// Detect the provider from the host of an embed URL
    #[must_use]
    pub fn detect(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();

        [
            (Self::Kodik, KODIK_DOMAINS),
            (Self::AniLibria, ANILIBRIA_DOMAINS),
            (Self::Sibnet, SIBNET_DOMAINS),
        ]
        .into_iter()
        .find(|(_, domains)| domains.iter().any(|domain| host_matches(&host, domain)))
        .map(|(provider, _)| provider)
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// One playable stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoLink {
    pub quality: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Successful resolution, in the provider's own shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "links", rename_all = "lowercase")]
pub enum ResolvedSource {
    Kodik(KodikVideoLinks),
    AniLibria(AniLibriaLinks),
    Sibnet(String),
}

impl ResolvedSource {
    #[must_use]
    pub const fn provider(&self) -> Provider {
        match self {
            Self::Kodik(_) => Provider::Kodik,
            Self::AniLibria(_) => Provider::AniLibria,
            Self::Sibnet(_) => Provider::Sibnet,
        }
    }

    /// Every stream as a flat list. Sibnet has no quality label and reports an empty one.
    #[must_use]
    pub fn video_links(&self) -> Vec<VideoLink> {
        match self {
            Self::Kodik(links) => links
                .iter()
                .flat_map(|(quality, sources)| {
                    sources.iter().map(move |source| VideoLink {
                        quality: quality.clone(),
                        url: source.src.clone(),
                        mime_type: (!source.mime_type.is_empty()).then(|| source.mime_type.clone()),
                    })
                })
                .collect(),
            Self::AniLibria(links) => links
                .iter()
                .map(|(quality, source)| VideoLink {
                    quality: quality.clone(),
                    url: source.src.clone(),
                    mime_type: None,
                })
                .collect(),
            Self::Sibnet(url) => vec![VideoLink {
                quality: String::new(),
                url: url.clone(),
                mime_type: None,
            }],
        }
    }

    /// URL of the first stream with the highest numeric quality label
    #[must_use]
    pub fn best_url(&self) -> Option<String> {
        let mut best: Option<(u32, String)> = None;
        for link in self.video_links() {
            let rank: u32 = link.quality.parse().unwrap_or(0);
            match &best {
                Some((top, _)) if rank <= *top => {}
                _ => best = Some((rank, link.url)),
            }
        }
        best.map(|(_, url)| url)
    }
}

/// Provider-specific resolver behind a shared contract
#[async_trait]
pub trait LinkResolver: Send + Sync {
    fn provider(&self) -> Provider;

    /// `Ok(None)` means the page was reachable but held no playable source
    async fn resolve_source(&self, url: &str) -> Result<Option<ResolvedSource>>;
}

#[async_trait]
impl LinkResolver for KodikParser {
    fn provider(&self) -> Provider {
        Provider::Kodik
    }

    async fn resolve_source(&self, url: &str) -> Result<Option<ResolvedSource>> {
        Ok(self.resolve(url).await?.map(ResolvedSource::Kodik))
    }
}

#[async_trait]
impl LinkResolver for AniLibriaParser {
    fn provider(&self) -> Provider {
        Provider::AniLibria
    }

    async fn resolve_source(&self, url: &str) -> Result<Option<ResolvedSource>> {
        Ok(self.direct_links(url).await?.map(ResolvedSource::AniLibria))
    }
}

#[async_trait]
impl LinkResolver for SibnetParser {
    fn provider(&self) -> Provider {
        Provider::Sibnet
    }

    async fn resolve_source(&self, url: &str) -> Result<Option<ResolvedSource>> {
        Ok(self.direct_link(url).await?.map(ResolvedSource::Sibnet))
    }
}

/// All three resolvers over one fetcher, dispatching on the embed host
pub struct LinkParser {
    kodik: KodikParser,
    anilibria: AniLibriaParser,
    sibnet: SibnetParser,
}

impl LinkParser {
    pub fn new(fetcher: SharedFetcher, config: &ParserConfig) -> Self {
        Self {
            kodik: KodikParser::new(fetcher.clone(), config.kodik.clone()),
            anilibria: AniLibriaParser::new(fetcher.clone(), config.anilibria.clone()),
            sibnet: SibnetParser::new(fetcher, config.sibnet.clone()),
        }
    }

    /// Build with a dedicated reqwest client from `config.http`
    pub fn from_config(config: &ParserConfig) -> Result<Self> {
        let fetcher = Arc::new(ReqwestFetcher::new(&config.http)?);
        Ok(Self::new(fetcher, config))
    }

    #[must_use]
    pub const fn kodik(&self) -> &KodikParser {
        &self.kodik
    }

    #[must_use]
    pub const fn anilibria(&self) -> &AniLibriaParser {
        &self.anilibria
    }

    #[must_use]
    pub const fn sibnet(&self) -> &SibnetParser {
        &self.sibnet
    }

    #[must_use]
    pub fn resolver(&self, provider: Provider) -> &dyn LinkResolver {
        match provider {
            Provider::Kodik => &self.kodik,
            Provider::AniLibria => &self.anilibria,
            Provider::Sibnet => &self.sibnet,
        }
    }

    /// Resolve any supported embed URL; unknown hosts resolve to `None`
    pub async fn resolve(&self, url: &str) -> Result<Option<ResolvedSource>> {
        let Some(provider) = Provider::detect(url) else {
            debug!(url, "No resolver for embed host");
            return Ok(None);
        };
        debug!(url, provider = provider.as_str(), "Resolving embed URL");
        self.resolver(provider).resolve_source(url).await
    }
}

impl Default for LinkParser {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestFetcher::shared()), &ParserConfig::default())
    }
}
