use super::similarity::cosine_similarity;
use crate::catalog::{EndpointCatalog, IndexedOperation};
use crate::error::{Result, SearchError};
use std::cmp::Ordering;
use tracing::debug;

/// A scored catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedOperation<'a> {
    pub score: f32,
    pub operation: &'a IndexedOperation,
}

/// Exact linear-scan ranking over an [`EndpointCatalog`].
pub struct SimilarityRanker;

impl SimilarityRanker {
    /// Scores every operation against `query_vector` and returns the best
    /// `min(top_k, catalog.len())`, highest first. Equal scores keep catalog order.
    pub fn rank<'a>(
        query_vector: &[f32],
        catalog: &'a EndpointCatalog,
        top_k: usize,
    ) -> Result<Vec<RankedOperation<'a>>> {
        validate_top_k(top_k)?;

        if let Some(expected) = catalog.dimension() {
            if query_vector.len() != expected {
                return Err(SearchError::DimensionMismatch {
                    expected,
                    actual: query_vector.len(),
                });
            }
        }

        let mut scored: Vec<RankedOperation<'a>> = catalog
            .iter()
            .map(|operation| RankedOperation {
                score: cosine_similarity(query_vector, operation.vector()),
                operation,
            })
            .collect();

        // `sort_by` is stable
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        debug!(
            candidates = catalog.len(),
            returned = scored.len(),
            best = ?scored.first().map(|r| r.score),
            "Ranked catalog"
        );
        Ok(scored)
    }
}

pub(crate) fn validate_top_k(top_k: usize) -> Result<()> {
    if top_k == 0 {
        return Err(SearchError::InvalidArgument(
            "top_k must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
