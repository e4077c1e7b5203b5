//! bs-context: simulation context model, updates and persistence.

pub mod naming;
pub mod schema;
pub mod store;
pub mod summary;
pub mod update;
pub mod validate;

pub use naming::pretty_artifact_name;
pub use schema::*;
pub use store::ContextStore;
pub use summary::SimulationSummary;
pub use update::{
    ArtifactsPatch, ConfigPatch, ContextPatch, ContextUpdate, InfrastructurePatch, MetaPatch,
    ResultsPatch, SearchState, UiStatePatch, apply,
};
pub use validate::{ValidationError, validate_context};

use std::path::Path;

pub type ContextResult<T> = Result<T, ContextError>;

#[derive(thiserror::Error, Debug)]
pub enum ContextError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Context not found: {run_id}")]
    NotFound { run_id: String },

    #[error("Invalid run id: {run_id:?} ({reason})")]
    InvalidRunId {
        run_id: String,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ContextResult<SimulationContext> {
    let content = std::fs::read_to_string(path)?;
    let context: SimulationContext = serde_yaml::from_str(&content)?;
    validate_context(&context)?;
    Ok(context)
}

pub fn save_yaml(path: &Path, context: &SimulationContext) -> ContextResult<()> {
    validate_context(context)?;
    let content = serde_yaml::to_string(context)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ContextResult<SimulationContext> {
    let content = std::fs::read_to_string(path)?;
    let context: SimulationContext = serde_json::from_str(&content)?;
    validate_context(&context)?;
    Ok(context)
}

pub fn save_json(path: &Path, context: &SimulationContext) -> ContextResult<()> {
    validate_context(context)?;
    let content = serde_json::to_string_pretty(context)?;
    std::fs::write(path, content)?;
    Ok(())
}
