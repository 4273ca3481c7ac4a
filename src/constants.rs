pub const MODEL_PATH: &str = "models/all-MiniLM-L6-v2";
pub const CONFIG_PATH: &str = "matcher.yaml";

pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_BUILD_CONCURRENCY: usize = 4;

// MiniLM embedding size
pub const VECTOR_SIZE: usize = 384;
