//! Anixart Link Parser
//!
//! Resolvers that turn third-party embed pages into direct stream URLs.
//! Each provider is an independent, stateless pipeline over an injected
//! HTTP fetcher:
//! - kodik: player script discovery + obfuscated link endpoint
//! - anilibria: release API lookup by episode ordinal
//! - sibnet: inline `src:` scrape + redirect follow
//!
//! A resolver returns `Ok(None)` when the page no longer carries what it
//! expects, and `Err` only when the provider could not be reached.
//!
//! # Usage
//!
//! ```no_run
//! use anixart_link_parser::{logging::init_logging, LinkParser, ParserConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! // parser.toml is optional; ANIXART_PARSER_* variables override it
//! let config = ParserConfig::load(Some("parser.toml"))?;
//! init_logging(&config.logging)?;
//!
//! let parser = LinkParser::from_config(&config)?;
//! if let Some(source) = parser.resolve("https://video.sibnet.ru/shell.php?videoid=4242").await? {
//!     println!("{:?}", source.best_url());
//! }
//! # Ok(())
//! # }
//! ```

// Shared infrastructure
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod logging;

// Providers
pub mod anilibria;
pub mod kodik;
pub mod sibnet;

// Common interface + host dispatch
pub mod resolver;

#[cfg(test)]
pub mod test_helpers;

pub use anilibria::AniLibriaParser;
pub use crate::config::ParserConfig;
pub use error::{ParserError, Result};
pub use http::{FetchRequest, FetchResponse, HttpFetcher, ReqwestFetcher, SharedFetcher};
pub use kodik::KodikParser;
pub use resolver::{LinkParser, LinkResolver, Provider, ResolvedSource, VideoLink};
pub use sibnet::SibnetParser;
