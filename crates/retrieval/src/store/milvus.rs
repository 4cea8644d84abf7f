//! Milvus backend over the RESTful v2 API.
//!
//! Talks JSON to a Milvus proxy at `http://{host}:{port}/v2/vectordb/...`.
//! Every response carries the envelope `{code, message, data}`; a non-zero
//! code is a failure regardless of HTTP status.

use crate::store::backend::VectorBackend;
use crate::store::types::{
    CollectionSchema, FieldKind, IndexParams, PendingBatch, SearchPage, SearchParams,
};
use ragbox_core::{AppError, AppResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Connection timeout for the vector store.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Shard count for newly created collections.
const SHARDS_NUM: u32 = 2;

/// Response envelope shared by all v2 endpoints.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct HasData {
    has: bool,
}

#[derive(Debug, Deserialize)]
struct DescribeData {
    #[serde(default)]
    fields: Vec<DescribeField>,
}

#[derive(Debug, Deserialize)]
struct DescribeField {
    #[serde(alias = "fieldName")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct SearchRow {
    id: i64,
    #[serde(default)]
    distance: f32,
    #[serde(default)]
    text: String,
}

/// Milvus REST v2 client.
pub struct MilvusBackend {
    base_url: String,
    client: Client,
}

impl MilvusBackend {
    /// Create a client for the proxy at `host:port`.
    pub fn new(host: &str, port: u16) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                AppError::Init(format!("Failed to create HTTP client for Milvus: {}", e))
            })?;

        Ok(Self {
            base_url: format!("http://{}:{}", host, port),
            client,
        })
    }

    /// POST a JSON body and unwrap the response envelope.
    ///
    /// `wrap` classifies transport and envelope failures into the error
    /// variant appropriate for the calling operation.
    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
        wrap: fn(String) -> AppError,
    ) -> AppResult<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| wrap(format!("Request to {} failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(wrap(format!("Milvus HTTP error ({}): {}", status, text)));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| wrap(format!("Failed to parse Milvus response: {}", e)))?;

        if envelope.code != 0 {
            return Err(wrap(format!(
                "Milvus error code {}: {}",
                envelope.code,
                envelope.message.unwrap_or_default()
            )));
        }

        Ok(envelope.data)
    }

    fn schema_json(schema: &CollectionSchema) -> serde_json::Value {
        let fields: Vec<serde_json::Value> = schema
            .fields
            .iter()
            .map(|field| match &field.kind {
                FieldKind::Int64 { primary } => json!({
                    "fieldName": field.name,
                    "dataType": "Int64",
                    "isPrimary": primary,
                }),
                FieldKind::FloatVector { dim } => json!({
                    "fieldName": field.name,
                    "dataType": "FloatVector",
                    "elementTypeParams": { "dim": dim },
                }),
                FieldKind::VarChar { max_length } => json!({
                    "fieldName": field.name,
                    "dataType": "VarChar",
                    "elementTypeParams": { "max_length": max_length },
                }),
            })
            .collect();

        json!({ "autoID": false, "fields": fields })
    }
}

#[async_trait::async_trait]
impl VectorBackend for MilvusBackend {
    fn backend_name(&self) -> &str {
        "milvus"
    }

    async fn has_collection(&self, name: &str) -> AppResult<bool> {
        let data: Option<HasData> = self
            .post(
                "/v2/vectordb/collections/has",
                json!({ "collectionName": name }),
                AppError::Init,
            )
            .await?;

        Ok(data.map(|d| d.has).unwrap_or(false))
    }

    async fn describe_collection(&self, name: &str) -> AppResult<Vec<String>> {
        let data: Option<DescribeData> = self
            .post(
                "/v2/vectordb/collections/describe",
                json!({ "collectionName": name }),
                AppError::Init,
            )
            .await?;

        let fields = data
            .ok_or_else(|| AppError::Init(format!("Describe of '{}' returned no data", name)))?
            .fields
            .into_iter()
            .map(|f| f.name)
            .collect();

        Ok(fields)
    }

    async fn create_collection(&mut self, name: &str, schema: &CollectionSchema) -> AppResult<()> {
        self.post::<serde_json::Value>(
            "/v2/vectordb/collections/create",
            json!({
                "collectionName": name,
                "schema": Self::schema_json(schema),
                "params": { "shardsNum": SHARDS_NUM },
            }),
            AppError::Init,
        )
        .await?;

        Ok(())
    }

    async fn create_index(
        &mut self,
        name: &str,
        field: &str,
        params: &IndexParams,
    ) -> AppResult<()> {
        self.post::<serde_json::Value>(
            "/v2/vectordb/indexes/create",
            json!({
                "collectionName": name,
                "indexParams": [{
                    "fieldName": field,
                    "indexName": format!("{}_idx", field),
                    "metricType": params.metric,
                    "params": {
                        "index_type": params.index_type,
                        "nlist": params.nlist,
                    },
                }],
            }),
            AppError::Init,
        )
        .await?;

        Ok(())
    }

    async fn load_collection(&mut self, name: &str) -> AppResult<()> {
        self.post::<serde_json::Value>(
            "/v2/vectordb/collections/load",
            json!({ "collectionName": name }),
            AppError::Init,
        )
        .await?;

        Ok(())
    }

    async fn insert(&mut self, name: &str, batch: &PendingBatch) -> AppResult<()> {
        let rows: Vec<serde_json::Value> = batch
            .ids
            .iter()
            .zip(batch.vectors.iter())
            .zip(batch.texts.iter())
            .map(|((id, vector), text)| {
                json!({ "id": id, "embedding": vector, "text": text })
            })
            .collect();

        self.post::<serde_json::Value>(
            "/v2/vectordb/entities/insert",
            json!({ "collectionName": name, "data": rows }),
            AppError::Write,
        )
        .await?;

        Ok(())
    }

    async fn commit(&mut self, name: &str) -> AppResult<()> {
        self.post::<serde_json::Value>(
            "/v2/vectordb/collections/flush",
            json!({ "collectionName": name }),
            AppError::Write,
        )
        .await?;

        Ok(())
    }

    async fn search(
        &self,
        name: &str,
        query: &[f32],
        top_k: usize,
        params: &SearchParams,
    ) -> AppResult<SearchPage> {
        let rows: Option<Vec<SearchRow>> = self
            .post(
                "/v2/vectordb/entities/search",
                json!({
                    "collectionName": name,
                    "data": [query],
                    "annsField": "embedding",
                    "limit": top_k,
                    "outputFields": ["id", "text"],
                    "searchParams": {
                        "metricType": params.metric,
                        "params": { "nprobe": params.nprobe },
                    },
                }),
                AppError::Search,
            )
            .await?;

        let rows = rows.unwrap_or_default();
        let mut page = SearchPage::default();
        for row in rows {
            page.ids.push(row.id);
            page.distances.push(row.distance);
            page.texts.push(row.text);
        }

        Ok(page)
    }

    async fn list_collections(&self) -> AppResult<Vec<String>> {
        let data: Option<Vec<String>> = self
            .post(
                "/v2/vectordb/collections/list",
                json!({}),
                AppError::Init,
            )
            .await?;

        Ok(data.unwrap_or_default())
    }
}
