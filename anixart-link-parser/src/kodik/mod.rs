//! Kodik Link Resolver
//!
//! Resolves a Kodik embed page (`https://kodik.info/seria/...`) into
//! per-quality stream URLs.
//!
//! # Example
//!
//! ```no_run
//! use anixart_link_parser::kodik::KodikParser;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let parser = KodikParser::with_defaults();
//! if let Some(links) = parser.resolve("https://kodik.info/seria/1234/abcdef/720p").await? {
//!     for (quality, sources) in &links {
//!         println!("{quality}: {}", sources[0].src);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cipher;
mod client;
pub mod types;

pub use cipher::decode_cipher;
pub use client::KodikParser;
pub use types::*;
