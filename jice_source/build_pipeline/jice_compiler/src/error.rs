use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use jice_project::DocError;

/// Failure that stops the whole compilation. Per-unit problems live in
/// the report instead; only the manifest stage, build-root IO and
/// dispatcher collisions take the run down.
#[derive(Debug)]
pub enum CompileError {
    ProjectRootMissing(PathBuf),
    Manifest(DocError),
    Io(io::Error),
    DispatcherCollision {
        symbol: String,
        first: String,
        second: String,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::ProjectRootMissing(path) => {
                write!(f, "project root '{}' does not exist", path.display())
            }
            CompileError::Manifest(err) => write!(f, "project manifest: {err}"),
            CompileError::Io(err) => write!(f, "io failure: {err}"),
            CompileError::DispatcherCollision {
                symbol,
                first,
                second,
            } => write!(
                f,
                "scripts '{first}' and '{second}' both produce dispatcher '{symbol}'"
            ),
        }
    }
}

impl Error for CompileError {}

impl From<io::Error> for CompileError {
    fn from(err: io::Error) -> Self {
        CompileError::Io(err)
    }
}

impl From<DocError> for CompileError {
    fn from(err: DocError) -> Self {
        CompileError::Manifest(err)
    }
}
