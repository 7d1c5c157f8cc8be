//! emserve - a small static file server for browser builds of native programs
//!
//! `.html`, `.js`, `.wasm` and `.data` files are served with a content type
//! chosen from the path suffix. Every other request goes to a plain directory
//! server rooted at the same base directory.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::ServeError;
