// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::WorkflowFile;
use crate::config::validate::validate_workflow;
use crate::errors::WorkflowError;
use crate::graph::model::Workflow;

/// Load a workflow file from a given path without semantic validation.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to
/// also build and check the in-memory workflow.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<WorkflowFile, WorkflowError> {
    let contents = fs::read_to_string(path.as_ref())?;
    let file: WorkflowFile = toml::from_str(&contents)?;
    Ok(file)
}

/// Load a workflow file, build the in-memory graph and validate it.
///
/// This is the recommended entry point for the rest of the application. The
/// returned [`WorkflowFile`] keeps gateway settings and source image paths;
/// the [`Workflow`] is what actually runs.
pub fn load_and_validate(
    path: impl AsRef<Path>,
) -> Result<(WorkflowFile, Workflow), WorkflowError> {
    let file = load_from_path(path)?;
    let workflow = file.to_workflow()?;
    validate_workflow(&workflow)?;
    Ok((file, workflow))
}
