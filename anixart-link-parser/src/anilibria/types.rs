//! AniLibria API Data Structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stream URL for one quality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AniLibriaVideoSource {
    pub src: String,
}

/// Quality label ("1080", "720", "480") to stream
pub type AniLibriaLinks = BTreeMap<String, AniLibriaVideoSource>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AniLibriaName {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default)]
    pub alternative: Option<String>,
}

/// Opening/ending markers in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AniLibriaTimecode {
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub stop: Option<f64>,
}

/// Release episode (`/api/v1/anime/releases/{id}` -> `episodes[]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AniLibriaEpisode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_english: Option<String>,
    /// Episode number; specials use fractional ordinals
    pub ordinal: f64,
    #[serde(default)]
    pub opening: AniLibriaTimecode,
    #[serde(default)]
    pub ending: AniLibriaTimecode,
    #[serde(default)]
    pub hls_480: Option<String>,
    #[serde(default)]
    pub hls_720: Option<String>,
    #[serde(default)]
    pub hls_1080: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub sort_order: Option<i64>,
    #[serde(default)]
    pub release_id: Option<u64>,
}

impl AniLibriaEpisode {
    /// Streams keyed by quality; qualities the API left null are omitted
    #[must_use]
    pub fn links(&self) -> AniLibriaLinks {
        [
            ("1080", &self.hls_1080),
            ("720", &self.hls_720),
            ("480", &self.hls_480),
        ]
        .into_iter()
        .filter_map(|(quality, src)| {
            src.as_ref().map(|src| {
                (quality.to_string(), AniLibriaVideoSource { src: src.clone() })
            })
        })
        .collect()
    }
}

/// Release document; unknown fields are ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AniLibriaRelease {
    pub id: u64,
    #[serde(default)]
    pub name: AniLibriaName,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub is_ongoing: bool,
    #[serde(default)]
    pub episodes_count: Option<u32>,
    #[serde(default)]
    pub episodes: Vec<AniLibriaEpisode>,
}

impl AniLibriaRelease {
    /// First episode whose ordinal equals `ordinal`
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    pub fn episode(&self, ordinal: u64) -> Option<&AniLibriaEpisode> {
        self.episodes.iter().find(|e| e.ordinal == ordinal as f64)
    }
}
