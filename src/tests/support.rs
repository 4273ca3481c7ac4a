use crate::encoder::{HashingEncoder, TextEncoder};
use crate::ApiDocument;
use anyhow::Result as AnyhowResult;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn users_document() -> ApiDocument {
    ApiDocument::new(json!({
        "openapi": "3.0.0",
        "paths": {
            "/users": {
                "get": {
                    "summary": "List all users",
                    "description": "Returns a list of users in the system",
                    "parameters": [
                        {
                            "name": "limit",
                            "in": "query",
                            "description": "Maximum number of users to return"
                        }
                    ]
                },
                "post": {
                    "summary": "Create a new user",
                    "description": "Creates a new user in the system"
                }
            },
            "/users/{id}": {
                "get": {
                    "summary": "Get user details",
                    "description": "Returns details of a specific user",
                    "parameters": [
                        {
                            "name": "id",
                            "in": "path",
                            "description": "The user ID"
                        }
                    ]
                }
            }
        }
    }))
}

/// Returns fixed vectors for known texts and fails on anything else.
pub struct TableEncoder {
    table: HashMap<String, Vec<f32>>,
}

impl TableEncoder {
    pub fn new(entries: &[(&str, Vec<f32>)]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(text, vector)| (text.to_string(), vector.clone()))
                .collect(),
        }
    }
}

#[async_trait]
impl TextEncoder for TableEncoder {
    async fn encode(&self, text: &str) -> AnyhowResult<Vec<f32>> {
        self.table
            .get(text)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no vector for '{}'", text))
    }
}

/// Same vector for every input.
pub struct ConstantEncoder(pub Vec<f32>);

#[async_trait]
impl TextEncoder for ConstantEncoder {
    async fn encode(&self, _text: &str) -> AnyhowResult<Vec<f32>> {
        Ok(self.0.clone())
    }
}

/// Hashing encoder that refuses any text containing `marker`.
pub struct FailingEncoder {
    pub marker: &'static str,
    pub inner: HashingEncoder,
}

impl FailingEncoder {
    pub fn new(marker: &'static str) -> Self {
        Self {
            marker,
            inner: HashingEncoder::default(),
        }
    }
}

#[async_trait]
impl TextEncoder for FailingEncoder {
    async fn encode(&self, text: &str) -> AnyhowResult<Vec<f32>> {
        if text.contains(self.marker) {
            return Err(anyhow::anyhow!("model rejected input"));
        }
        self.inner.encode(text).await
    }
}

/// Hashing encoder that counts its calls.
#[derive(Default)]
pub struct CountingEncoder {
    pub calls: AtomicUsize,
    pub inner: HashingEncoder,
}

impl CountingEncoder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextEncoder for CountingEncoder {
    async fn encode(&self, text: &str) -> AnyhowResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.inner.encode(text).await
    }

    fn dimension(&self) -> Option<usize> {
        self.inner.dimension()
    }
}

/// Hashing encoder where shorter texts take longer, so concurrent encodes
/// finish out of submission order.
pub struct SlowShortTextEncoder {
    pub inner: HashingEncoder,
}

#[async_trait]
impl TextEncoder for SlowShortTextEncoder {
    async fn encode(&self, text: &str) -> AnyhowResult<Vec<f32>> {
        let delay = 200u64.saturating_sub(text.len() as u64);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.inner.encode(text).await
    }
}
