//! Static file serving module
//!
//! Serves the files of a browser build with a content type chosen from the
//! path suffix and hands every other path to the fallback directory server.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::error::ServeError;
use crate::handler::fallback::Fallback;
use crate::handler::router::RequestContext;
use crate::http;

/// Handler for `GET` requests
///
/// Request targets ending in `.html`, `.js`, `.wasm` or `.data` are read
/// from `root` directly. The suffix is checked on the target as sent, query
/// string included, so `/index.html?v=2` goes to the fallback. The target is
/// joined onto `root` with its leading `/` removed and nothing else; `..`
/// segments are not filtered here.
pub struct StaticFileHandler<F> {
    root: PathBuf,
    fallback: F,
}

impl<F: Fallback> StaticFileHandler<F> {
    pub const fn new(root: PathBuf, fallback: F) -> Self {
        Self { root, fallback }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve a request, classifying its target first
    pub async fn handle(
        &self,
        ctx: &RequestContext<'_>,
    ) -> Result<Response<Full<Bytes>>, ServeError> {
        let Some(content_type) = http::classify(ctx.target) else {
            return Ok(self.delegate(ctx).await);
        };

        let file_path = self.resolve(ctx.target);
        match read_file(&file_path).await {
            Ok(content) => Ok(http::build_typed_file_response(
                Bytes::from(content),
                content_type.header_value(),
                ctx.server_name,
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(http::build_error_response(
                StatusCode::NOT_FOUND,
                Some(&format!("File Not Found: {}", ctx.target)),
                ctx.server_name,
                ctx.is_head,
            )),
            Err(source) => Err(ServeError::Read {
                path: file_path,
                source,
            }),
        }
    }

    /// Pass a request to the fallback unchanged
    pub async fn delegate(&self, ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
        self.fallback.serve(ctx).await
    }

    /// Map a request path onto the base directory
    pub fn resolve(&self, request_path: &str) -> PathBuf {
        let relative = request_path.strip_prefix('/').unwrap_or(request_path);
        self.root.join(relative)
    }
}

/// Read a whole file; the handle is closed when this returns, on every path
async fn read_file(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path).await?;
    let mut content = Vec::new();
    file.read_to_end(&mut content).await?;
    Ok(content)
}
