use crate::catalog::{CatalogBuilder, EndpointCatalog, IndexedOperation};
use crate::constants::DEFAULT_TOP_K;
use crate::document::ApiDocument;
use crate::encoder::{encode_checked, TextEncoder};
use crate::error::{Result, SearchError};
use crate::ranking::ranker::validate_top_k;
use crate::ranking::SimilarityRanker;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// One match returned by [`SearchService::find_matching_api`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub path: String,
    pub method: String,
    pub description: String,
    pub parameters: Vec<Value>,
    pub confidence: f32,
}

impl QueryResult {
    fn new(operation: &IndexedOperation, confidence: f32) -> Self {
        Self {
            path: operation.path.clone(),
            method: operation.method.clone(),
            description: operation.description.clone(),
            parameters: operation.parameters.clone(),
            confidence,
        }
    }
}

enum CatalogSource {
    Path(PathBuf),
    Document(ApiDocument),
}

/// Owns an encoder and the catalog built with it, and answers queries.
///
/// The catalog is built exactly once, either up front ([`SearchService::build`])
/// or on the first query ([`SearchService::from_path`], [`SearchService::lazy`]).
/// Concurrent first queries wait on the same build. A failed build is retried on
/// the next query, but a document file that was read successfully is not read again.
pub struct SearchService<E: TextEncoder> {
    encoder: E,
    source: Option<CatalogSource>,
    document: OnceCell<ApiDocument>,
    builder: CatalogBuilder,
    catalog: OnceCell<EndpointCatalog>,
    default_top_k: usize,
}

impl<E: TextEncoder> SearchService<E> {
    /// Indexes `document` right away.
    pub async fn build(encoder: E, document: &ApiDocument) -> Result<Self> {
        Self::build_with(encoder, document, CatalogBuilder::default()).await
    }

    pub async fn build_with(
        encoder: E,
        document: &ApiDocument,
        builder: CatalogBuilder,
    ) -> Result<Self> {
        let catalog = builder.build(document, &encoder).await?;
        Ok(Self {
            encoder,
            source: None,
            document: OnceCell::new(),
            builder,
            catalog: OnceCell::new_with(Some(catalog)),
            default_top_k: DEFAULT_TOP_K,
        })
    }

    /// Reads and indexes the document at `path` on first use.
    pub fn from_path(encoder: E, path: impl Into<PathBuf>) -> Self {
        Self::deferred(encoder, CatalogSource::Path(path.into()))
    }

    /// Indexes an already parsed document on first use.
    pub fn lazy(encoder: E, document: ApiDocument) -> Self {
        Self::deferred(encoder, CatalogSource::Document(document))
    }

    fn deferred(encoder: E, source: CatalogSource) -> Self {
        Self {
            encoder,
            source: Some(source),
            document: OnceCell::new(),
            builder: CatalogBuilder::default(),
            catalog: OnceCell::new(),
            default_top_k: DEFAULT_TOP_K,
        }
    }

    /// Applies only to catalogs that have not been built yet.
    pub fn with_builder(mut self, builder: CatalogBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_default_top_k(mut self, top_k: usize) -> Result<Self> {
        validate_top_k(top_k)?;
        self.default_top_k = top_k;
        Ok(self)
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// The catalog, building it first if needed.
    pub async fn catalog(&self) -> Result<&EndpointCatalog> {
        self.catalog
            .get_or_try_init(|| async {
                match &self.source {
                    Some(CatalogSource::Path(path)) => {
                        let document = self
                            .document
                            .get_or_try_init(|| async {
                                info!("Loading API document from {:?}", path);
                                ApiDocument::load(path)
                            })
                            .await?;
                        self.builder.build(document, &self.encoder).await
                    }
                    Some(CatalogSource::Document(document)) => {
                        self.builder.build(document, &self.encoder).await
                    }
                    None => Err(SearchError::malformed("no API document to index")),
                }
            })
            .await
    }

    /// [`find_matching_api`](Self::find_matching_api) with the configured default `top_k`.
    pub async fn search(&self, query: &str) -> Result<Vec<QueryResult>> {
        self.find_matching_api(query, self.default_top_k).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_matching_api(&self, query: &str, top_k: usize) -> Result<Vec<QueryResult>> {
        validate_top_k(top_k)?;
        let catalog = self.catalog().await?;

        let query_vector = encode_checked(&self.encoder, query).await?;
        debug!(embedding_size = query_vector.len(), "Generated query embedding");

        let results: Vec<QueryResult> = SimilarityRanker::rank(&query_vector, catalog, top_k)?
            .into_iter()
            .map(|ranked| QueryResult::new(ranked.operation, ranked.score))
            .collect();

        if results.is_empty() {
            warn!(query = %query, "No matches found");
        } else {
            for (i, result) in results.iter().enumerate() {
                debug!(
                    "Match {}: {} {} (confidence={:.4})",
                    i + 1,
                    result.method,
                    result.path,
                    result.confidence
                );
            }
        }

        Ok(results)
    }
}
