use crate::error::{Result, SearchError};
use serde_json::Value;

/// The fields of an operation that feed its rendered description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationDetails {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<Value>,
}

impl OperationDetails {
    pub fn from_value(location: &str, value: &Value) -> Result<Self> {
        let details = value.as_object().ok_or_else(|| {
            SearchError::malformed(format!("operation {} is not a mapping", location))
        })?;

        let parameters = match details.get("parameters") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => {
                if let Some(position) = items.iter().position(|p| !p.is_object()) {
                    return Err(SearchError::malformed(format!(
                        "parameter #{} of {} is not a mapping",
                        position, location
                    )));
                }
                items.clone()
            }
            Some(_) => {
                return Err(SearchError::malformed(format!(
                    "`parameters` of {} is not a sequence",
                    location
                )))
            }
        };

        Ok(Self {
            summary: string_field(value, "summary"),
            description: string_field(value, "description"),
            parameters,
        })
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Renders an operation into the canonical text handed to the encoder.
pub struct DescriptionBuilder;

impl DescriptionBuilder {
    /// `"<METHOD> <path> <summary> <description> Parameter '<name>' (<in>): <description> ..."`,
    /// skipping empty parts.
    pub fn render(path: &str, method: &str, details: &OperationDetails) -> String {
        let mut parts = vec![format!("{} {}", method.to_uppercase(), path)];

        parts.extend(details.summary.iter().cloned());
        parts.extend(details.description.iter().cloned());
        parts.extend(details.parameters.iter().map(render_parameter));

        parts
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn render_parameter(parameter: &Value) -> String {
    let field = |key: &str| parameter.get(key).and_then(Value::as_str).unwrap_or("");
    format!(
        "Parameter '{}' ({}): {}",
        field("name"),
        field("in"),
        field("description")
    )
}
