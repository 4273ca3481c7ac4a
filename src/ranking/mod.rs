pub mod ranker;
pub mod similarity;

pub use ranker::{RankedOperation, SimilarityRanker};
pub use similarity::cosine_similarity;
