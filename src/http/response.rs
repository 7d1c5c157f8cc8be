//! HTTP response building module
//!
//! Builders for every response the server produces. Each response carries the
//! `Server` and `Date` headers; builders never panic and fall back to an empty
//! response if the builder rejects a header value.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use std::time::SystemTime;

use super::cache;

/// Start a response with the headers shared by every reply
fn base_builder(status: StatusCode, server_name: &str) -> Builder {
    Response::builder()
        .status(status)
        .header("Server", server_name)
        .header("Date", cache::http_date_now())
}

/// Build the response for a file whose type was chosen from its suffix
///
/// Only `Content-type` is set explicitly, and only when the suffix defines one.
pub fn build_typed_file_response(
    data: Bytes,
    content_type: Option<&str>,
    server_name: &str,
) -> Response<Full<Bytes>> {
    let mut builder = base_builder(StatusCode::OK, server_name);
    if let Some(content_type) = content_type {
        builder = builder.header("Content-type", content_type);
    }

    builder.body(Full::new(data)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build a full file response for the directory server
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    last_modified: SystemTime,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    base_builder(StatusCode::OK, server_name)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Last-Modified", cache::format_http_date(last_modified))
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: SystemTime, server_name: &str) -> Response<Full<Bytes>> {
    base_builder(StatusCode::NOT_MODIFIED, server_name)
        .header("Last-Modified", cache::format_http_date(last_modified))
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect response, used to add the trailing slash to directories
pub fn build_redirect_response(location: &str, server_name: &str) -> Response<Full<Bytes>> {
    base_builder(StatusCode::MOVED_PERMANENTLY, server_name)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build generic HTML response
pub fn build_html_response(
    content: String,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    base_builder(StatusCode::OK, server_name)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build an HTML error page
///
/// `message` defaults to the canonical reason phrase of `status`.
pub fn build_error_response(
    status: StatusCode,
    message: Option<&str>,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let page = format!(
        "<!DOCTYPE HTML>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Error response</title>\n\
         </head>\n\
         <body>\n\
         <h1>Error response</h1>\n\
         <p>Error code: {code}</p>\n\
         <p>Message: {message}.</p>\n\
         <p>Error code explanation: {code} - {explain}.</p>\n\
         </body>\n\
         </html>\n",
        code = status.as_u16(),
        message = escape_html(message.unwrap_or(reason)),
        explain = explain_status(status).unwrap_or(reason),
    );

    let content_length = page.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(page)
    };

    base_builder(status, server_name)
        .header("Content-Type", "text/html;charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Longer explanation shown on error pages
fn explain_status(status: StatusCode) -> Option<&'static str> {
    match status.as_u16() {
        400 => Some("Bad request syntax or unsupported method"),
        403 => Some("Request forbidden -- authorization will not help"),
        404 => Some("Nothing matches the given URI"),
        405 => Some("Specified method is invalid for this resource"),
        500 => Some("Server got itself in trouble"),
        501 => Some("Server does not support this operation"),
        _ => None,
    }
}

/// Escape text for inclusion in HTML element content
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
