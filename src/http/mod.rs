//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! request handlers that use it.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use mime::{classify, ContentType};
pub use response::{
    build_304_response, build_error_response, build_file_response, build_html_response,
    build_redirect_response, build_typed_file_response,
};
