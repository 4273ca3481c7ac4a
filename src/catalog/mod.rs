pub mod builder;
pub mod description;
pub mod operation;

pub use builder::CatalogBuilder;
pub use description::{DescriptionBuilder, OperationDetails};
pub use operation::{IndexedOperation, UnindexedOperation};

use crate::document::ApiDocument;
use crate::encoder::TextEncoder;
use crate::error::{Result, SearchError};

/// The indexed operations of one document, in document order.
///
/// Immutable once built; every vector shares the same dimension.
#[derive(Debug, Clone, Default)]
pub struct EndpointCatalog {
    operations: Vec<IndexedOperation>,
    dimension: Option<usize>,
}

impl EndpointCatalog {
    pub async fn build<E: TextEncoder + ?Sized>(
        document: &ApiDocument,
        encoder: &E,
    ) -> Result<Self> {
        CatalogBuilder::default().build(document, encoder).await
    }

    pub fn from_operations(operations: Vec<IndexedOperation>) -> Result<Self> {
        let dimension = operations.first().map(IndexedOperation::dimension);

        if let Some(expected) = dimension {
            if let Some(op) = operations.iter().find(|op| op.dimension() != expected) {
                return Err(SearchError::DimensionMismatch {
                    expected,
                    actual: op.dimension(),
                });
            }
        }

        Ok(Self {
            operations,
            dimension,
        })
    }

    pub fn operations(&self) -> &[IndexedOperation] {
        &self.operations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexedOperation> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// `None` for an empty catalog.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}
