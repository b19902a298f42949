//! AniLibria Link Resolver
//!
//! Resolves `...?id=<release>&ep=<ordinal>` references through the public
//! release API.

mod client;
pub mod types;

pub use client::AniLibriaParser;
pub use types::*;
