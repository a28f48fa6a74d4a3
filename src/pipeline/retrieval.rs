//! Best-effort retrieval of supplementary context.
//!
//! The pipeline calls a [`Retriever`] once per stage with the rendered stage
//! query. Results are advisory: the pipeline logs how many hits came back and
//! otherwise discards them, and any failure is swallowed.

use crate::error::{Error, Result};
use futures::future::BoxFuture;
use serde::Deserialize;
use std::time::Duration;

/// Default endpoint of the DuckDuckGo Instant Answer API.
pub const DUCKDUCKGO_ENDPOINT: &str = "https://api.duckduckgo.com/";

/// One (title, snippet) pair returned by a keyword search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
}

/// A keyword text search.
pub trait Retriever: Send + Sync {
    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<SearchHit>>>;
}

/// A retriever that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetrieval;

impl Retriever for NoRetrieval {
    fn search<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, Result<Vec<SearchHit>>> {
        Box::pin(async { Ok(Vec::new()) })
    }
}

#[derive(Deserialize)]
struct InstantAnswer {
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text")]
    text: Option<String>,
    #[serde(rename = "FirstURL")]
    first_url: Option<String>,
    /// Grouped topics nest one level
    #[serde(rename = "Topics", default)]
    topics: Vec<RelatedTopic>,
}

/// Retriever backed by the DuckDuckGo Instant Answer API.
///
/// `ureq` is blocking, so each request runs on tokio's blocking pool.
#[derive(Clone)]
pub struct DuckDuckGoRetriever {
    agent: ureq::Agent,
    endpoint: String,
    max_hits: usize,
}

impl Default for DuckDuckGoRetriever {
    fn default() -> Self {
        Self::new(DUCKDUCKGO_ENDPOINT)
    }
}

impl DuckDuckGoRetriever {
    /// Create a retriever for an endpoint with a 5 second request timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(5)))
            .build();
        Self {
            agent: config.into(),
            endpoint: endpoint.into(),
            max_hits: 5,
        }
    }

    /// Limit the number of hits kept per query.
    pub fn max_hits(mut self, n: usize) -> Self {
        self.max_hits = n;
        self
    }

    fn fetch(agent: &ureq::Agent, endpoint: &str, query: &str) -> Result<InstantAnswer> {
        let mut response = agent
            .get(endpoint)
            .query("q", query)
            .query("format", "json")
            .query("no_html", "1")
            .query("skip_disambig", "1")
            .call()
            .map_err(|e| Error::Retrieval(format!("request failed: {}", e)))?;

        response
            .body_mut()
            .read_json::<InstantAnswer>()
            .map_err(|e| Error::Retrieval(format!("malformed response: {}", e)))
    }
}

impl Retriever for DuckDuckGoRetriever {
    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<SearchHit>>> {
        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();
        let query = query.to_string();
        let max_hits = self.max_hits;

        Box::pin(async move {
            let answer = tokio::task::spawn_blocking(move || Self::fetch(&agent, &endpoint, &query))
                .await
                .map_err(|e| Error::Retrieval(format!("search task failed: {}", e)))??;
            Ok(hits_from_answer(answer, max_hits))
        })
    }
}

/// Flatten an instant answer into at most `max_hits` hits.
fn hits_from_answer(answer: InstantAnswer, max_hits: usize) -> Vec<SearchHit> {
    let mut hits = Vec::new();

    if !answer.abstract_text.trim().is_empty() {
        hits.push(SearchHit {
            title: answer.heading,
            snippet: answer.abstract_text,
        });
    }

    let mut stack: Vec<RelatedTopic> = answer.related_topics.into_iter().rev().collect();
    while let Some(topic) = stack.pop() {
        if hits.len() >= max_hits {
            break;
        }
        if !topic.topics.is_empty() {
            stack.extend(topic.topics.into_iter().rev());
            continue;
        }
        let Some(text) = topic.text.filter(|t| !t.trim().is_empty()) else {
            continue;
        };
        let title = match text.split_once(" - ") {
            Some((head, _)) => head.to_string(),
            None => topic.first_url.unwrap_or_else(|| text.clone()),
        };
        hits.push(SearchHit {
            title,
            snippet: text,
        });
    }

    hits.truncate(max_hits);
    hits
}
