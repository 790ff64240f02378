use crate::nav::{Node, StructuralError};
use crate::util::strip_control_chars;
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

/// Errors that prevent a navigation document from being used at all.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

/// A navigation document after lenient conversion.
///
/// Entries without the required shape are dropped with their subtree and
/// listed in `rejected`; their siblings are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub nodes: Vec<Node>,
    pub rejected: Vec<StructuralError>,
}

/// Parse a navigation document from JSON text.
///
/// # Errors
///
/// - [`DocumentError::Json`] - the text is not valid JSON
/// - [`DocumentError::Structural`] - the root value is not an array
pub fn parse_document(text: &str) -> Result<ParsedDocument, DocumentError> {
    let value: Value = serde_json::from_str(text)?;
    Ok(from_value(value)?)
}

/// Convert an already parsed JSON value.
pub fn from_value(value: Value) -> Result<ParsedDocument, StructuralError> {
    let Value::Array(items) = value else {
        return Err(StructuralError::NotAnArray(kind(&value)));
    };

    let mut rejected = Vec::new();
    let mut path = Vec::new();
    let nodes = convert_level(&items, &mut path, &mut rejected);

    for err in &rejected {
        tracing::warn!(error = %err, "Dropped navigation entry");
    }
    Ok(ParsedDocument { nodes, rejected })
}

/// Read and parse a navigation document from disk.
pub fn load_document_file(path: &Path) -> Result<ParsedDocument, DocumentError> {
    let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_document(&text)
}

fn convert_level(
    items: &[Value],
    path: &mut Vec<usize>,
    rejected: &mut Vec<StructuralError>,
) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        path.push(i);
        match convert_node(item, path, rejected) {
            Ok(node) => nodes.push(node),
            Err(err) => rejected.push(err),
        }
        path.pop();
    }
    nodes
}

fn convert_node(
    item: &Value,
    path: &mut Vec<usize>,
    rejected: &mut Vec<StructuralError>,
) -> Result<Node, StructuralError> {
    let Value::Object(obj) = item else {
        return Err(StructuralError::NotAnObject { path: path.clone() });
    };

    let id = scalar_field(obj, "id").ok_or_else(|| StructuralError::MissingField {
        path: path.clone(),
        field: "id",
    })?;
    let label = scalar_field(obj, "label").ok_or_else(|| StructuralError::MissingField {
        path: path.clone(),
        field: "label",
    })?;
    let url = obj
        .get("url")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let children = match obj.get("children") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => convert_level(items, path, rejected),
        Some(_) => return Err(StructuralError::ChildrenNotAnArray { id }),
    };

    Ok(Node {
        id,
        label: strip_control_chars(&label).into_owned(),
        url,
        children,
    })
}

/// A string field, or a number rendered as one. Blank strings count as
/// missing.
fn scalar_field(obj: &Map<String, Value>, name: &str) -> Option<String> {
    match obj.get(name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
