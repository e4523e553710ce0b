//! Error types for requirement loading and evaluation.
//!
//! Evaluation inside a render cycle never propagates these; the lenient
//! entry points log them and degrade to "no requirements" or "unsatisfied".
//! The strict entry points (`try_load`, `check_requirement`) return them.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequirementError {
    /// A declared dependency is not present in the plugin inventory.
    #[error("Unknown dependency: {id}")]
    UnknownDependency { id: String },

    /// A constraint string does not match `<id>[:<version>]`.
    #[error("Invalid constraint '{constraint}' for {id}")]
    InvalidConstraint { id: String, constraint: String },

    /// The requirement file exists but is not a JSON object of strings.
    #[error("Malformed requirements file {path:?}: {message}")]
    MalformedRequirements { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RequirementError>;
