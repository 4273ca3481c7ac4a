pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod document;
pub mod encoder;
pub mod error;
pub mod ranking;
pub mod search_service;

#[cfg(test)]
mod tests;

pub use catalog::{
    CatalogBuilder, DescriptionBuilder, EndpointCatalog, IndexedOperation, OperationDetails,
    UnindexedOperation,
};
pub use cli::parse_args;
pub use config::{Config, EncoderKind};
pub use constants::*;
pub use document::ApiDocument;
pub use encoder::{BertEncoder, HashingEncoder, TextEncoder};
pub use error::{Result, SearchError};
pub use ranking::{cosine_similarity, RankedOperation, SimilarityRanker};
pub use search_service::{QueryResult, SearchService};
