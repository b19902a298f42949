//! Sibnet Link Resolver

mod client;

pub use client::SibnetParser;
