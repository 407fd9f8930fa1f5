use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::IgnoredAny;
use serde::Deserialize;
use url::Url;

use super::{Probe, ProbeOutcome};
use crate::config::FirebaseConfig;
use crate::error::HunterError;

pub const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com";
const PAGE_SIZE: u32 = 300;

/// Lists a collection through the Firestore REST API using only the web API
/// key, i.e. with the same access an unauthenticated browser client has.
pub struct FirestoreProbe {
    client: Client,
    documents_url: Url,
    api_key: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPage {
    #[serde(default)]
    documents: Vec<IgnoredAny>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl FirestoreProbe {
    pub fn new(client: Client, config: &FirebaseConfig, endpoint: &str) -> Result<Self, HunterError> {
        let mut documents_url = Url::parse(endpoint)
            .map_err(|e| HunterError::config(format!("invalid endpoint {}: {}", endpoint, e)))?;
        documents_url
            .path_segments_mut()
            .map_err(|_| HunterError::config(format!("endpoint {} cannot be a base URL", endpoint)))?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                config.project_id.as_str(),
                "databases",
                config.database(),
                "documents",
            ]);

        Ok(Self {
            client,
            documents_url,
            api_key: config.api_key.clone(),
        })
    }

    fn collection_url(&self, collection: &str, page_token: Option<&str>) -> Url {
        let mut url = self.documents_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(collection);
        }
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("key", &self.api_key)
                .append_pair("pageSize", &PAGE_SIZE.to_string())
                .append_pair("mask.fieldPaths", "__name__");
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }
        url
    }
}

/// Interpret one list response. Non-2xx responses are errors carrying the
/// Firestore message when the body has one.
fn parse_page(status: u16, body: &str) -> anyhow::Result<ListPage> {
    if !(200..300).contains(&status) {
        return Err(match serde_json::from_str::<ErrorBody>(body) {
            Ok(e) => anyhow!(
                "HTTP {} {}: {}",
                status,
                e.error.status.unwrap_or_default(),
                e.error.message
            ),
            Err(_) => anyhow!("HTTP {}", status),
        });
    }
    if body.trim().is_empty() {
        return Ok(ListPage::default());
    }
    serde_json::from_str(body).context("malformed list response")
}

#[async_trait]
impl Probe for FirestoreProbe {
    async fn probe(&self, candidate: &str) -> anyhow::Result<ProbeOutcome> {
        let mut documents = 0u64;
        let mut page_token: Option<String> = None;

        loop {
            let url = self.collection_url(candidate, page_token.as_deref());
            let resp = self.client.get(url).send().await?;
            let status = resp.status().as_u16();
            let body = resp.text().await?;
            let page = parse_page(status, &body)?;

            documents += page.documents.len() as u64;
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(collection = candidate, documents, "firestore list complete");
        // An empty collection does not exist as far as Firestore is concerned.
        Ok(if documents == 0 {
            ProbeOutcome::NotFound
        } else {
            ProbeOutcome::found(documents)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FirebaseConfig {
        FirebaseConfig::from_json(r#"{"apiKey":"AIzaKey","projectId":"demo-app"}"#).unwrap()
    }

    fn probe(endpoint: &str) -> FirestoreProbe {
        FirestoreProbe::new(Client::new(), &config(), endpoint).unwrap()
    }

    #[test]
    fn builds_collection_url() {
        let url = probe(DEFAULT_ENDPOINT).collection_url("users", None);
        assert_eq!(
            url.path(),
            "/v1/projects/demo-app/databases/(default)/documents/users"
        );
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("key".into(), "AIzaKey".into())));
        assert!(query.contains(&("pageSize".into(), "300".into())));
        assert!(!query.iter().any(|(k, _)| k == "pageToken"));
    }

    #[test]
    fn encodes_candidate_as_single_segment() {
        let url = probe("http://localhost:8080/").collection_url("a b/c", Some("tok"));
        assert!(url.path().ends_with("/documents/a%20b%2Fc"));
        assert_eq!(url.host_str(), Some("localhost"));
        assert!(url.query_pairs().any(|(k, v)| k == "pageToken" && v == "tok"));
    }

    #[test]
    fn rejects_non_base_endpoint() {
        let err = FirestoreProbe::new(Client::new(), &config(), "mailto:x@y.z").err();
        assert!(matches!(err, Some(HunterError::Config(_))));
    }

    #[test]
    fn counts_documents_and_reads_token() {
        let body = r#"{"documents":[{"name":"a"},{"name":"b"}],"nextPageToken":"next"}"#;
        let page = parse_page(200, body).unwrap();
        assert_eq!(page.documents.len(), 2);
        assert_eq!(page.next_page_token.as_deref(), Some("next"));
    }

    #[test]
    fn empty_object_means_no_documents() {
        let page = parse_page(200, "{}").unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn permission_denied_is_an_error() {
        let body = r#"{"error":{"code":403,"message":"Missing or insufficient permissions.","status":"PERMISSION_DENIED"}}"#;
        let err = parse_page(403, body).unwrap_err().to_string();
        assert!(err.contains("PERMISSION_DENIED"));
        assert!(err.contains("insufficient permissions"));
    }

    #[test]
    fn opaque_failure_keeps_status() {
        let err = parse_page(502, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.to_string(), "HTTP 502");
    }
}
