//! Fallback directory server
//!
//! Default behaviour for every request the suffix handler does not take:
//! path translation, content type inference, index files, directory listings
//! and conditional `GET`.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode};
use percent_encoding::percent_decode_str;
use std::fs::Metadata;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;

/// Capability the suffix handler delegates to
pub trait Fallback: Send + Sync {
    fn serve(
        &self,
        ctx: &RequestContext<'_>,
    ) -> impl Future<Output = Response<Full<Bytes>>> + Send;
}

/// Plain directory server rooted at the base directory
pub struct DirectoryServer {
    root: PathBuf,
    index_files: Vec<String>,
}

impl DirectoryServer {
    pub const fn new(root: PathBuf, index_files: Vec<String>) -> Self {
        Self { root, index_files }
    }

    async fn serve_directory(&self, ctx: &RequestContext<'_>, dir: &Path) -> Response<Full<Bytes>> {
        if !ctx.path.ends_with('/') {
            let location = match ctx.query {
                Some(query) => format!("{}/?{query}", ctx.path),
                None => format!("{}/", ctx.path),
            };
            return http::build_redirect_response(&location, ctx.server_name);
        }

        for index_file in &self.index_files {
            let index_path = dir.join(index_file);
            if let Ok(metadata) = fs::metadata(&index_path).await {
                if metadata.is_file() {
                    return serve_file(ctx, &index_path).await;
                }
            }
        }

        let display_path = percent_decode_str(ctx.path).decode_utf8_lossy();
        match listing::render_listing(dir, &display_path).await {
            Ok(html) => http::build_html_response(html, ctx.server_name, ctx.is_head),
            Err(e) => {
                logger::log_warning(&format!(
                    "Failed to list directory '{}': {e}",
                    dir.display()
                ));
                http::build_error_response(
                    StatusCode::NOT_FOUND,
                    Some("No permission to list directory"),
                    ctx.server_name,
                    ctx.is_head,
                )
            }
        }
    }
}

impl Fallback for DirectoryServer {
    async fn serve(&self, ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
        if !matches!(ctx.method, Method::GET | Method::HEAD) {
            logger::log_warning(&format!("Unsupported method: {}", ctx.method));
            return http::build_error_response(
                StatusCode::NOT_IMPLEMENTED,
                Some(&format!("Unsupported method ('{}')", ctx.method)),
                ctx.server_name,
                ctx.is_head,
            );
        }

        let path = translate_path(&self.root, ctx.path);
        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_dir() => self.serve_directory(ctx, &path).await,
            // A trailing slash names a directory; a file there does not match
            Ok(_) if ctx.path.ends_with('/') => not_found(ctx),
            Ok(_) => serve_file(ctx, &path).await,
            Err(_) => not_found(ctx),
        }
    }
}

/// Serve a regular file with an inferred content type
async fn serve_file(ctx: &RequestContext<'_>, path: &Path) -> Response<Full<Bytes>> {
    let (content, metadata) = match read_with_metadata(path).await {
        Ok(found) => found,
        Err(e) => {
            logger::log_debug(&format!("Cannot open '{}': {e}", path.display()));
            return not_found(ctx);
        }
    };

    let modified = metadata.modified().unwrap_or_else(|_| SystemTime::now());
    if cache::is_not_modified(ctx.if_modified_since, ctx.has_if_none_match, modified) {
        return http::build_304_response(modified, ctx.server_name);
    }

    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    http::build_file_response(
        Bytes::from(content),
        content_type,
        modified,
        ctx.server_name,
        ctx.is_head,
    )
}

async fn read_with_metadata(path: &Path) -> std::io::Result<(Vec<u8>, Metadata)> {
    let content = fs::read(path).await?;
    let metadata = fs::metadata(path).await?;
    Ok((content, metadata))
}

fn not_found(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    http::build_error_response(
        StatusCode::NOT_FOUND,
        Some("File not found"),
        ctx.server_name,
        ctx.is_head,
    )
}

/// Translate a URI path into a filesystem path under `root`
///
/// The path is percent-decoded, empty and `.` segments are dropped and `..`
/// removes the previous segment but never climbs above `root`. Segments that
/// could smuggle in another separator are skipped.
pub fn translate_path(root: &Path, request_path: &str) -> PathBuf {
    let decoded = percent_decode_str(request_path).decode_utf8_lossy();

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if s.contains('\\') || (cfg!(windows) && s.contains(':')) => {}
            s => segments.push(s),
        }
    }

    let mut path = root.to_path_buf();
    path.extend(segments);
    path
}
