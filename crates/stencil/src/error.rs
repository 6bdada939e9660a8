//! CLI error types.

use std::io;
use std::path::PathBuf;

use stencil_engine::ParseError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("failed to open input file [{}]: {source}", .path.display())]
    OpenInput { path: PathBuf, source: io::Error },

    #[error("failed to create output file [{}]: {source}", .path.display())]
    CreateOutput { path: PathBuf, source: io::Error },

    #[error("{0}")]
    Parse(#[from] ParseError),
}
