//! Scripted fetcher for driving resolvers without a network

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use crate::error::{ParserError, Result};
use crate::http::{FetchRequest, FetchResponse, HttpFetcher};

enum Matcher {
    Exact(String),
    Prefix(String),
}

/// Answers requests from a fixed route table and records what was asked
pub struct ScriptedFetcher {
    routes: Vec<(Matcher, FetchResponse)>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn route(mut self, url: &str, response: FetchResponse) -> Self {
        self.routes.push((Matcher::Exact(url.to_string()), response));
        self
    }

    pub fn route_prefix(mut self, prefix: &str, response: FetchResponse) -> Self {
        self.routes.push((Matcher::Prefix(prefix.to_string()), response));
        self
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpFetcher for ScriptedFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        self.requests.lock().unwrap().push(request.clone());

        self.routes
            .iter()
            .find(|(matcher, _)| match matcher {
                Matcher::Exact(url) => *url == request.url,
                Matcher::Prefix(prefix) => request.url.starts_with(prefix.as_str()),
            })
            .map(|(_, response)| response.clone())
            .ok_or_else(|| ParserError::Network(format!("no scripted route for {}", request.url)))
    }
}

/// 200 response declared as JSON
pub fn json_response(body: impl Into<String>) -> FetchResponse {
    FetchResponse::new(StatusCode::OK, body).with_header(CONTENT_TYPE, "application/json")
}
