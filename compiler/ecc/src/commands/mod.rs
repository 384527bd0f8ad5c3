//! Command handlers for the `ec` CLI.
//!
//! Source loading lives in the module root; each submodule implements one
//! command.

use std::io;

use ec_diagnostic::{file_load_failure, EcResult};
use ec_ir::Program;
use thiserror::Error;

mod run;

pub use run::{run_file, RunOptions};

/// Why a script file could not be read.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No such file or directory")]
    NotFound,
    #[error("Permission denied")]
    PermissionDenied,
    #[error("File is not valid UTF-8")]
    InvalidUtf8,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Read a script from disk.
pub fn read_source(path: &str) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound,
        io::ErrorKind::PermissionDenied => LoadError::PermissionDenied,
        io::ErrorKind::InvalidData => LoadError::InvalidUtf8,
        _ => LoadError::Io(err),
    })
}

/// Read and split a script into its line table.
pub fn load_program(path: &str) -> EcResult<Program> {
    let source = read_source(path).map_err(|err| file_load_failure(path, err))?;
    let program = Program::parse(&source);
    tracing::debug!(path, lines = program.len(), "loaded script");
    Ok(program)
}
