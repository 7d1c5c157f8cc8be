//! Request handler module
//!
//! Routes requests to the suffix-typed file handler, which serves browser
//! build artifacts itself and delegates everything else to a directory server.

pub mod fallback;
pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry points
pub use fallback::{DirectoryServer, Fallback};
pub use router::{handle_request, RequestContext};
pub use static_files::StaticFileHandler;
