//! Request-level error type
//!
//! Errors that escape a request handler. hyper aborts the connection when a
//! service returns one, so no custom response is produced for them.

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ServeError {
    /// Reading a file for a typed-suffix request failed for a reason other
    /// than the file being absent
    Read { path: PathBuf, source: io::Error },
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
        }
    }
}
