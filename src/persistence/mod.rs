use crate::job_validation::{JobValidationError, validate_workspace};
use crate::workspace::Workspace;
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

pub mod file;

pub use file::{
    load_workspace_from_json, load_workspace_from_reader, save_workspace_to_json,
    save_workspace_to_writer,
};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid data: {0}")]
    InvalidData(#[from] JobValidationError),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub(crate) fn validate_snapshot(workspace: &Workspace) -> PersistenceResult<()> {
    validate_workspace(workspace)?;
    Ok(())
}
