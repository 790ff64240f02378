use thiserror::Error;

/// A navigation document (or part of one) that does not have the required shape.
///
/// `path` fields locate the offending entry as child indices from the root,
/// e.g. `[2, 0]` is the first child of the third top-level node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("Navigation document must be a JSON array, found {0}")]
    NotAnArray(&'static str),

    #[error("Node at {path:?} is not an object")]
    NotAnObject { path: Vec<usize> },

    #[error("Node at {path:?} is missing required field '{field}'")]
    MissingField {
        path: Vec<usize>,
        field: &'static str,
    },

    #[error("Node '{id}' has a 'children' field that is not an array")]
    ChildrenNotAnArray { id: String },

    #[error("Duplicate node id '{id}'")]
    DuplicateId { id: String },
}
