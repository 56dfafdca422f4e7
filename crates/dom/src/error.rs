//! Error types for DOM operations
//!
//! Flat hierarchy. Most of the nesting operations never produce these: a
//! target that cannot be resolved is a silent no-op there, and only the
//! operations that cannot proceed without their input return an error.

use crate::types::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No element matches: {0}")]
    NotFound(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
