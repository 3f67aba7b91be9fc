//! Web search collaborator.

use reqwest::blocking::Client;
use serde::Deserialize;
use slidesmith_core::{Error, Result, SearchResult};

/// Source of ranked `(title, url)` candidates for a query.
pub trait SearchProvider {
    /// Run one query; results keep the provider's ranking.
    fn search(&self, query: &str) -> Result<Vec<SearchResult>>;
}

impl<T: SearchProvider + ?Sized> SearchProvider for &T {
    fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        (**self).search(query)
    }
}

/// Google Programmable Search (Custom Search JSON API) client.
pub struct GoogleSearch {
    client: Client,
    endpoint: String,
    api_key: String,
    engine_id: String,
    extra: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
}

impl GoogleSearch {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        engine_id: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            extra: Vec::new(),
        }
    }

    /// Pass an additional query parameter through to the API (e.g. `num`, `lr`).
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    fn query_params<'a>(&'a self, query: &'a str) -> Vec<(&'a str, &'a str)> {
        let mut params = vec![
            ("key", self.api_key.as_str()),
            ("cx", self.engine_id.as_str()),
            ("q", query),
        ];
        params.extend(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        params
    }
}

impl SearchProvider for GoogleSearch {
    fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        log::info!("Searching for '{}'", query);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query_params(query))
            .send()
            .map_err(|e| Error::Retrieval(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Retrieval(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .map_err(|e| Error::Retrieval(format!("Failed to read response body: {}", e)))?;
        let results = parse_results(&body)?;
        log::debug!("Search returned {} results", results.len());
        Ok(results)
    }
}

/// Map an API response body to results, in order. A body without `items` has no results.
fn parse_results(body: &str) -> Result<Vec<SearchResult>> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| Error::Retrieval(format!("Malformed search response: {}", e)))?;

    Ok(response
        .items
        .into_iter()
        .map(|item| SearchResult::new(item.title, item.link))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve_once;

    #[test]
    fn test_parse_results_keeps_order() {
        let body = r#"{
            "kind": "customsearch#search",
            "items": [
                {"title": "Quantum computing - Wikipedia", "link": "https://en.wikipedia.org/wiki/Quantum_computing", "snippet": "..."},
                {"title": "What Is Quantum Computing? | IBM", "link": "https://www.ibm.com/topics/quantum-computing"}
            ]
        }"#;

        let results = parse_results(body).unwrap();
        assert_eq!(
            results,
            vec![
                SearchResult::new(
                    "Quantum computing - Wikipedia",
                    "https://en.wikipedia.org/wiki/Quantum_computing"
                ),
                SearchResult::new(
                    "What Is Quantum Computing? | IBM",
                    "https://www.ibm.com/topics/quantum-computing"
                ),
            ]
        );
    }

    #[test]
    fn test_missing_items_is_empty() {
        let results = parse_results(r#"{"kind": "customsearch#search"}"#).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_malformed_body_is_retrieval_error() {
        let err = parse_results("<html>quota exceeded</html>").unwrap_err();
        assert!(matches!(err, Error::Retrieval(_)));
    }

    #[test]
    fn test_search_against_server() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"items": [{"title": "Rust", "link": "https://www.rust-lang.org/"}]}"#,
        );
        let search = GoogleSearch::new(url, "k", "cx-1").with_param("num", "10");

        let results = search.search("rust").unwrap();
        let request = server.join().unwrap();

        assert_eq!(results, vec![SearchResult::new("Rust", "https://www.rust-lang.org/")]);
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /?"));
        for param in ["key=k", "cx=cx-1", "q=rust", "num=10"] {
            assert!(request_line.contains(param), "missing {}", param);
        }
    }

    #[test]
    fn test_forbidden_status_is_retrieval_error() {
        let (url, server) = serve_once("403 Forbidden", r#"{"error": {"code": 403}}"#);

        let err = GoogleSearch::new(url, "k", "cx").search("rust").unwrap_err();
        server.join().unwrap();

        assert!(matches!(&err, Error::Retrieval(msg) if msg.contains("403")));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_unreachable_endpoint_is_retrieval_error() {
        // bind then drop so nothing listens on the port
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let search = GoogleSearch::new(format!("http://127.0.0.1:{}", port), "k", "cx");

        assert!(matches!(search.search("rust"), Err(Error::Retrieval(_))));
    }

    #[test]
    fn test_query_params_include_credentials_and_extras() {
        let search = GoogleSearch::new("http://localhost", "k", "cx-1").with_param("num", "10");

        assert_eq!(
            search.query_params("rust"),
            vec![("key", "k"), ("cx", "cx-1"), ("q", "rust"), ("num", "10")]
        );
    }
}
