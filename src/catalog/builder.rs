use super::description::{DescriptionBuilder, OperationDetails};
use super::operation::{IndexedOperation, UnindexedOperation};
use super::EndpointCatalog;
use crate::constants::DEFAULT_BUILD_CONCURRENCY;
use crate::document::ApiDocument;
use crate::encoder::{encode_checked, TextEncoder};
use crate::error::{Result, SearchError};
use futures::{StreamExt, TryStreamExt};
use tracing::{debug, debug_span, info};
use tracing_futures::Instrument;

// Path-item fields that sit next to the HTTP methods but are not operations.
// `x-*` extension keys are skipped as well.
const PATH_ITEM_FIELDS: &[&str] = &["summary", "description", "parameters", "servers", "$ref"];

/// Turns an [`ApiDocument`] into an [`EndpointCatalog`].
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    concurrency: usize,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_BUILD_CONCURRENCY,
        }
    }
}

impl CatalogBuilder {
    /// Maximum number of encoder calls in flight while building.
    pub fn with_concurrency(concurrency: usize) -> Result<Self> {
        if concurrency == 0 {
            return Err(SearchError::InvalidArgument(
                "build concurrency must be at least 1".to_string(),
            ));
        }
        Ok(Self { concurrency })
    }

    /// Reads every (path, method) pair in document order and renders its description.
    pub fn collect_operations(document: &ApiDocument) -> Result<Vec<UnindexedOperation>> {
        let mut operations = Vec::new();

        for (path, methods) in document.paths()? {
            let methods = methods.as_object().ok_or_else(|| {
                SearchError::malformed(format!("path '{}' is not a mapping of methods", path))
            })?;

            for (method, details) in methods {
                if PATH_ITEM_FIELDS.contains(&method.as_str()) || method.starts_with("x-") {
                    continue;
                }
                let location = format!("{} {}", method.to_uppercase(), path);
                let details = OperationDetails::from_value(&location, details)?;
                let description = DescriptionBuilder::render(path, method, &details);

                operations.push(UnindexedOperation {
                    path: path.clone(),
                    method: method.to_uppercase(),
                    description,
                    parameters: details.parameters,
                });
            }
        }

        Ok(operations)
    }

    #[tracing::instrument(skip_all, fields(concurrency = self.concurrency))]
    pub async fn build<E: TextEncoder + ?Sized>(
        &self,
        document: &ApiDocument,
        encoder: &E,
    ) -> Result<EndpointCatalog> {
        let operations = Self::collect_operations(document)?;
        info!("Generating embeddings for {} operations...", operations.len());

        // `buffered` yields in input order, so the catalog keeps document order
        // no matter which encode finishes first.
        let indexed: Vec<IndexedOperation> = futures::stream::iter(operations)
            .map(|operation| {
                let span = debug_span!("encode", method = %operation.method, path = %operation.path);
                async move {
                    debug!(description = %operation.description, "Encoding operation");
                    let vector = encode_checked(encoder, &operation.description).await?;
                    Ok::<_, SearchError>(operation.index(vector))
                }
                .instrument(span)
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let catalog = EndpointCatalog::from_operations(indexed)?;
        if let (Some(expected), Some(actual)) = (encoder.dimension(), catalog.dimension()) {
            if expected != actual {
                return Err(SearchError::DimensionMismatch { expected, actual });
            }
        }

        info!(
            operations = catalog.len(),
            dimension = ?catalog.dimension(),
            "Catalog built"
        );
        Ok(catalog)
    }
}
