//! Qdrant namespace store backend.
//!
//! Implements [`NamespaceStore`] using the
//! [qdrant-client](https://docs.rs/qdrant-client) crate over gRPC. Each
//! namespace maps to a Qdrant collection with cosine distance; chunk text
//! and metadata are stored as point payload.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::vectors_config::Config as VectorsConfigKind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::debug;
use uuid::Uuid;

use crate::document::{Chunk, EmbeddedChunk, SearchResult};
use crate::error::{RagError, Result};
use crate::store::NamespaceStore;

/// A [`NamespaceStore`] backed by [Qdrant](https://qdrant.tech/).
///
/// Collections are created implicitly on first upsert, sized to the
/// dimensionality of that batch. Points get fresh uuid-v4 IDs on every
/// upsert, so re-ingesting the same content adds points rather than
/// overwriting them.
pub struct QdrantNamespaceStore {
    client: Qdrant,
}

impl QdrantNamespaceStore {
    /// Create a new store connecting to the given Qdrant URL.
    pub fn new(url: &str) -> Result<Self> {
        let client = Qdrant::from_url(url).build().map_err(Self::map_err)?;
        Ok(Self { client })
    }

    /// Create a new store from an existing client.
    pub fn from_client(client: Qdrant) -> Self {
        Self { client }
    }

    fn map_err(e: qdrant_client::QdrantError) -> RagError {
        RagError::Store { backend: "qdrant".to_string(), message: e.to_string() }
    }

    /// Extract a string from a Qdrant payload value.
    fn extract_string(value: &QdrantValue) -> Option<String> {
        match &value.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        }
    }

    /// Return the vector dimensionality of an existing collection, if the
    /// collection uses a single unnamed vector configuration.
    async fn collection_dimensions(&self, namespace: &str) -> Result<Option<usize>> {
        let info = self.client.collection_info(namespace).await.map_err(Self::map_err)?;
        let size = info
            .result
            .and_then(|r| r.config)
            .and_then(|c| c.params)
            .and_then(|p| p.vectors_config)
            .and_then(|v| v.config)
            .and_then(|config| match config {
                VectorsConfigKind::Params(params) => Some(params.size as usize),
                VectorsConfigKind::ParamsMap(_) => None,
            });
        Ok(size)
    }
}

#[async_trait]
impl NamespaceStore for QdrantNamespaceStore {
    async fn upsert(&self, namespace: &str, chunks: &[EmbeddedChunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let dims = chunks[0].vector.len();
        if let Some(bad) = chunks.iter().find(|c| c.vector.len() != dims) {
            return Err(RagError::DimensionMismatch {
                namespace: namespace.to_string(),
                expected: dims,
                actual: bad.vector.len(),
            });
        }

        if self.client.collection_exists(namespace).await.map_err(Self::map_err)? {
            if let Some(expected) = self.collection_dimensions(namespace).await? {
                if expected != dims {
                    return Err(RagError::DimensionMismatch {
                        namespace: namespace.to_string(),
                        expected,
                        actual: dims,
                    });
                }
            }
        } else {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(namespace).vectors_config(
                        VectorParamsBuilder::new(dims as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(Self::map_err)?;
            debug!(collection = namespace, dimensions = dims, "created qdrant collection");
        }

        let points: Vec<PointStruct> = chunks
            .iter()
            .map(|embedded| {
                let mut payload_map = serde_json::Map::new();
                payload_map.insert(
                    "text".to_string(),
                    serde_json::Value::String(embedded.chunk.text.clone()),
                );
                let metadata_obj: serde_json::Map<String, serde_json::Value> = embedded
                    .chunk
                    .metadata
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect();
                payload_map.insert("metadata".to_string(), serde_json::Value::Object(metadata_obj));

                let payload =
                    Payload::try_from(serde_json::Value::Object(payload_map)).unwrap_or_default();

                PointStruct::new(Uuid::new_v4().to_string(), embedded.vector.clone(), payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(namespace, points).wait(true))
            .await
            .map_err(Self::map_err)?;

        debug!(collection = namespace, count = chunks.len(), "upserted chunks to qdrant");
        Ok(())
    }

    async fn exists(&self, namespace: &str) -> Result<bool> {
        self.client.collection_exists(namespace).await.map_err(Self::map_err)
    }

    async fn search(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        if !self.exists(namespace).await? {
            return Err(RagError::NamespaceNotFound(namespace.to_string()));
        }

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(namespace, vector.to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(Self::map_err)?;

        let results = response
            .result
            .into_iter()
            .map(|scored| {
                let text =
                    scored.payload.get("text").and_then(Self::extract_string).unwrap_or_default();

                let metadata: HashMap<String, String> = scored
                    .payload
                    .get("metadata")
                    .and_then(|v| match &v.kind {
                        Some(Kind::StructValue(s)) => Some(
                            s.fields
                                .iter()
                                .filter_map(|(k, v)| {
                                    Self::extract_string(v).map(|s| (k.clone(), s))
                                })
                                .collect(),
                        ),
                        _ => None,
                    })
                    .unwrap_or_default();

                SearchResult { chunk: Chunk { text, metadata }, score: scored.score }
            })
            .collect();

        Ok(results)
    }
}
