use crate::error::{Result, SearchError};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// A parsed API interface-description document (OpenAPI-style).
///
/// Only the `paths` section is interpreted; everything else is kept as-is.
/// Key order from the source file is preserved for both JSON and YAML.
#[derive(Debug, Clone)]
pub struct ApiDocument {
    root: Value,
}

impl ApiDocument {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        let root = serde_json::from_str(source).map_err(|e| SearchError::Parse(e.to_string()))?;
        Ok(Self { root })
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(source).map_err(|e| SearchError::Parse(e.to_string()))?;
        Ok(Self {
            root: yaml_to_json(yaml)?,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SearchError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        debug!(path = ?path, yaml = is_yaml, "Loading API document");
        if is_yaml {
            Self::from_yaml_str(&source)
        } else {
            Self::from_json_str(&source)
        }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn paths(&self) -> Result<&Map<String, Value>> {
        self.root
            .get("paths")
            .ok_or_else(|| SearchError::malformed("document has no `paths` field"))?
            .as_object()
            .ok_or_else(|| SearchError::malformed("`paths` is not a mapping"))
    }
}

impl From<Value> for ApiDocument {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

fn yaml_to_json(value: serde_yaml::Value) -> Result<Value> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                object.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

// Unquoted YAML keys such as `200:` or `true:` become strings.
fn yaml_key(key: serde_yaml::Value) -> Result<String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        other => Err(SearchError::Parse(format!(
            "unsupported mapping key: {:?}",
            other
        ))),
    }
}
