//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate. Documents are written through the `_bulk`
//! endpoint as alternating action and source lines; the per-item results in
//! the response are parsed into a summary so a single rejected document never
//! fails the batch.

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::{BulkDocument, BulkItemFailure, BulkSummary};

/// OpenSearch provider implementation.
pub struct OpenSearchProvider {
    client: OpenSearch,
}

impl OpenSearchProvider {
    /// Create a new provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    pub async fn new(url: &str) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch provider");

        Ok(Self { client })
    }
}

/// Build the `_bulk` body for a page of documents: one `{"index": ...}`
/// action line followed by the document source, per document.
fn bulk_body_lines(documents: &[BulkDocument]) -> Vec<Value> {
    let mut lines = Vec::with_capacity(documents.len() * 2);
    for doc in documents {
        lines.push(json!({ "index": { "_id": doc.id } }));
        lines.push(doc.source.clone());
    }
    lines
}

/// Fold the per-item results of a `_bulk` response into a summary.
///
/// Each item reports under its action name (`index` here); an `error` object
/// on the item marks that one document as failed.
fn parse_bulk_response(response: &Value) -> BulkSummary {
    let mut summary = BulkSummary::default();

    let items = match response.get("items").and_then(Value::as_array) {
        Some(items) => items,
        None => return summary,
    };

    for item in items {
        let result = match item.get("index") {
            Some(result) => result,
            None => continue,
        };
        summary.total += 1;

        match result.get("error") {
            Some(reason) if !reason.is_null() => summary.failures.push(BulkItemFailure {
                id: result
                    .get("_id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                reason: reason.to_string(),
            }),
            _ => summary.indexed += 1,
        }
    }

    summary
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    async fn ensure_index_exists(
        &self,
        index: &str,
        settings: &Value,
    ) -> Result<(), SearchIndexError> {
        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if exists.status_code().is_success() {
            debug!(index = %index, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(settings.clone())
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index, status = %status, body = %error_body, "Index creation failed");
            return Err(SearchIndexError::index_creation(format!(
                "Creating index '{}' failed with status {}: {}",
                index, status, error_body
            )));
        }

        info!(index = %index, "Created index");
        Ok(())
    }

    async fn bulk_index(
        &self,
        index: &str,
        documents: &[BulkDocument],
    ) -> Result<BulkSummary, SearchIndexError> {
        if documents.is_empty() {
            return Ok(BulkSummary::default());
        }

        let body: Vec<JsonBody<Value>> = bulk_body_lines(documents)
            .into_iter()
            .map(Into::into)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index, status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_index(format!(
                "Bulk request to '{}' failed with status {}: {}",
                index, status, error_body
            )));
        }

        let parsed = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let summary = parse_bulk_response(&parsed);
        debug!(
            index = %index,
            total = summary.total,
            indexed = summary.indexed,
            failed = summary.failed(),
            "Bulk page submitted"
        );
        Ok(summary)
    }
}
