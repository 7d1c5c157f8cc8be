//! MIME type detection module
//!
//! Two policies live here: the fixed suffix classification used for the files
//! of a browser build, and the general extension table used by the directory
//! server for everything else.

/// Content type assigned purely from the trailing characters of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Html,
    JavaScript,
    Wasm,
    /// Preloaded file package, served without a `Content-type` header
    Data,
}

impl ContentType {
    /// Header value to send, `None` for suffixes that only get a status line
    pub const fn header_value(self) -> Option<&'static str> {
        match self {
            Self::Html => Some("text/html"),
            Self::JavaScript => Some("application/javascript"),
            Self::Wasm => Some("application/wasm"),
            Self::Data => None,
        }
    }
}

/// Classify a request path by suffix
///
/// Matching is a case-sensitive `ends_with` on the raw path, so `/INDEX.HTML`
/// and `/app.js/` are not classified.
///
/// # Examples
/// ```
/// use emserve::http::mime::{classify, ContentType};
/// assert_eq!(classify("/index.html"), Some(ContentType::Html));
/// assert_eq!(classify("/game.data"), Some(ContentType::Data));
/// assert_eq!(classify("/style.css"), None);
/// ```
pub fn classify(path: &str) -> Option<ContentType> {
    if path.ends_with(".html") {
        Some(ContentType::Html)
    } else if path.ends_with(".js") {
        Some(ContentType::JavaScript)
    } else if path.ends_with(".wasm") {
        Some(ContentType::Wasm)
    } else if path.ends_with(".data") {
        Some(ContentType::Data)
    } else {
        None
    }
}

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use emserve::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), "text/html; charset=utf-8");
/// assert_eq!(get_content_type(Some("mp4")), "video/mp4");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("csv") => "text/csv",

        // JavaScript/WASM
        Some("js" | "mjs") => "application/javascript",
        Some("json" | "map") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",

        // Video
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogv") => "video/ogg",

        // Audio
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Archives
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",
        Some("tar") => "application/x-tar",

        // Default
        _ => "application/octet-stream",
    }
}
