use thiserror::Error;

/// Structural problems that make a chart impossible to lay out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("no root found: every node declares a parent")]
    NoRoot,
    #[error("ambiguous root: {} nodes have no parent ({})", ids.len(), ids.join(", "))]
    AmbiguousRoot { ids: Vec<String> },
    #[error("duplicate node id `{0}`")]
    DuplicateId(String),
}
