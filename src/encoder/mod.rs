pub mod bert;
pub mod hashing;

use anyhow::Result as AnyhowResult;
use async_trait::async_trait;
use std::sync::Arc;

pub use bert::BertEncoder;
pub use hashing::HashingEncoder;

/// Maps a string to a fixed-dimension dense vector.
///
/// Implementations must be deterministic for a given model and return vectors
/// of the same length for every input.
#[async_trait]
pub trait TextEncoder: Send + Sync {
    async fn encode(&self, text: &str) -> AnyhowResult<Vec<f32>>;

    /// Output dimension, when the encoder knows it up front.
    fn dimension(&self) -> Option<usize> {
        None
    }
}

#[async_trait]
impl<T: TextEncoder + ?Sized> TextEncoder for Box<T> {
    async fn encode(&self, text: &str) -> AnyhowResult<Vec<f32>> {
        (**self).encode(text).await
    }

    fn dimension(&self) -> Option<usize> {
        (**self).dimension()
    }
}

#[async_trait]
impl<T: TextEncoder + ?Sized> TextEncoder for Arc<T> {
    async fn encode(&self, text: &str) -> AnyhowResult<Vec<f32>> {
        (**self).encode(text).await
    }

    fn dimension(&self) -> Option<usize> {
        (**self).dimension()
    }
}

pub(crate) fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Encodes `text` and checks the result is a usable vector: non-empty and
/// free of NaN/infinite components.
pub(crate) async fn encode_checked<E: TextEncoder + ?Sized>(
    encoder: &E,
    text: &str,
) -> crate::error::Result<Vec<f32>> {
    use crate::error::SearchError;

    let vector = encoder
        .encode(text)
        .await
        .map_err(|e| SearchError::encoding(text, e))?;

    if vector.is_empty() {
        return Err(SearchError::encoding(text, "encoder returned an empty vector"));
    }
    if vector.iter().any(|x| !x.is_finite()) {
        return Err(SearchError::encoding(
            text,
            "encoder returned a non-finite component",
        ));
    }
    Ok(vector)
}
