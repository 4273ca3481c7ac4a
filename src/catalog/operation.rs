use serde_json::Value;

/// An operation read from the document whose description has not been encoded yet.
#[derive(Debug, Clone, PartialEq)]
pub struct UnindexedOperation {
    pub path: String,
    pub method: String,
    pub description: String,
    pub parameters: Vec<Value>,
}

impl UnindexedOperation {
    pub fn index(self, vector: Vec<f32>) -> IndexedOperation {
        IndexedOperation {
            path: self.path,
            method: self.method,
            description: self.description,
            parameters: self.parameters,
            vector,
        }
    }
}

/// An operation together with the embedding of its description.
///
/// Only obtainable through [`UnindexedOperation::index`], so anything holding
/// one is guaranteed to carry a vector.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedOperation {
    pub path: String,
    pub method: String,
    pub description: String,
    pub parameters: Vec<Value>,
    vector: Vec<f32>,
}

impl IndexedOperation {
    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}
