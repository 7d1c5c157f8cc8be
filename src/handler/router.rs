//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: builds the request context,
//! dispatches by method and writes the access log.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, IF_MODIFIED_SINCE, IF_NONE_MATCH, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::error::ServeError;
use crate::logger::{self, AccessLogEntry};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: Method,
    /// Request target as sent, query string included
    pub target: &'a str,
    /// URI path, without the query string
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<&'a str>,
    pub has_if_none_match: bool,
    /// Value for the `Server` header
    pub server_name: &'a str,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>, server_name: &'a str) -> Self {
        let method = req.method().clone();
        let path = req.uri().path();
        Self {
            is_head: method == Method::HEAD,
            method,
            target: req.uri().path_and_query().map_or(path, |pq| pq.as_str()),
            path,
            query: req.uri().query(),
            if_modified_since: header_str(req.headers(), IF_MODIFIED_SINCE.as_str()),
            has_if_none_match: req.headers().contains_key(IF_NONE_MATCH),
            server_name,
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Main entry point for HTTP request handling
///
/// `GET` goes through the suffix handler; every other method is left to the
/// fallback directory server. An `Err` aborts the connection.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let started = Instant::now();
    let ctx = RequestContext::from_request(&req, state.server_name());

    let result = if ctx.method == Method::GET {
        state.handler.handle(&ctx).await
    } else {
        Ok(state.handler.delegate(&ctx).await)
    };

    match &result {
        Ok(response) => {
            if state.config.logging.access_log {
                let entry = build_access_entry(&req, &ctx, response, peer_addr, started);
                logger::log_access(&entry, &state.config.logging.access_log_format);
            }
        }
        Err(e) => logger::log_error(&format!("{} {}: {e}", ctx.method, ctx.target)),
    }

    result
}

fn build_access_entry<B>(
    req: &Request<B>,
    ctx: &RequestContext<'_>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        ctx.method.to_string(),
        ctx.path.to_string(),
    );
    entry.query = ctx.query.map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header_str(req.headers(), REFERER.as_str()).map(ToString::to_string);
    entry.user_agent = header_str(req.headers(), USER_AGENT.as_str()).map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn state_for(root: &std::path::Path) -> Arc<AppState> {
        let mut cfg = Config::load_from("does-not-exist/emserve").unwrap();
        cfg.site.root = root.to_string_lossy().into_owned();
        cfg.logging.access_log = false;
        cfg.http.server_name = "router-test".to_string();
        Arc::new(AppState::new(&cfg))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[test]
    fn test_context_from_request() {
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/game/index.html?v=3")
            .header("If-Modified-Since", "Sun, 06 Nov 1994 08:49:37 GMT")
            .header("If-None-Match", "\"x\"")
            .body(())
            .unwrap();
        let ctx = RequestContext::from_request(&req, "srv");
        assert!(ctx.is_head);
        assert_eq!(ctx.target, "/game/index.html?v=3");
        assert_eq!(ctx.path, "/game/index.html");
        assert_eq!(ctx.query, Some("v=3"));
        assert_eq!(ctx.if_modified_since, Some("Sun, 06 Nov 1994 08:49:37 GMT"));
        assert!(ctx.has_if_none_match);
        assert_eq!(ctx.server_name, "srv");
    }

    #[tokio::test]
    async fn test_get_uses_suffix_handler() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Hi</h1>").unwrap();
        let state = state_for(dir.path());

        let req = Request::builder().uri("/index.html").body(()).unwrap();
        let resp = handle_request(req, state, peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/html");
        assert_eq!(resp.headers()["server"], "router-test");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, "<h1>Hi</h1>");
    }

    #[tokio::test]
    async fn test_query_string_defeats_suffix_match() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Hi</h1>").unwrap();
        let state = state_for(dir.path());

        // Served by the directory server, which drops the query before lookup
        let req = Request::builder().uri("/index.html?v=2").body(()).unwrap();
        let resp = handle_request(req, Arc::clone(&state), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        assert!(resp.headers().contains_key("last-modified"));

        let req = Request::builder().uri("/missing.js?v=1").body(()).unwrap();
        let resp = handle_request(req, state, peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8_lossy(&body);
        assert!(body.contains("File not found"), "{body}");
        assert!(!body.contains("File Not Found"), "{body}");
    }

    #[tokio::test]
    async fn test_head_goes_to_directory_server() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Hi</h1>").unwrap();
        let state = state_for(dir.path());

        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/index.html")
            .body(())
            .unwrap();
        let resp = handle_request(req, state, peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        // Directory server infers its own type and sends a length
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        assert_eq!(resp.headers()["content-length"], "11");
    }

    #[tokio::test]
    async fn test_post_is_not_implemented() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        let req = Request::builder()
            .method(Method::POST)
            .uri("/index.html")
            .body(())
            .unwrap();
        let resp = handle_request(req, state, peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn test_version_label() {
        assert_eq!(version_label(Version::HTTP_10), "1.0");
        assert_eq!(version_label(Version::HTTP_11), "1.1");
        assert_eq!(version_label(Version::HTTP_2), "2");
    }
}
