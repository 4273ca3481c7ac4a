use super::{l2_normalize, TextEncoder};
use crate::constants::VECTOR_SIZE;
use anyhow::Result as AnyhowResult;
use async_trait::async_trait;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Feature-hashing encoder: every lower-cased alphanumeric token lands in one
/// of `dimension` buckets with a +1/-1 sign taken from the hash's top bit.
///
/// Needs no model files and is fully deterministic, which makes it the
/// encoder of choice for tests and quick demos.
#[derive(Debug, Clone)]
pub struct HashingEncoder {
    dimension: usize,
}

impl HashingEncoder {
    pub fn new(dimension: usize) -> AnyhowResult<Self> {
        if dimension == 0 {
            return Err(anyhow::anyhow!("Hashing dimension must be positive"));
        }
        Ok(Self { dimension })
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();

        for token in lowered
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        l2_normalize(&mut vector);
        vector
    }
}

impl Default for HashingEncoder {
    fn default() -> Self {
        Self {
            dimension: VECTOR_SIZE,
        }
    }
}

#[async_trait]
impl TextEncoder for HashingEncoder {
    async fn encode(&self, text: &str) -> AnyhowResult<Vec<f32>> {
        Ok(self.embed(text))
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}
