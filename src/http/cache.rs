//! HTTP date and conditional request module
//!
//! Formats `Date`/`Last-Modified` values and evaluates `If-Modified-Since`.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// IMF-fixdate layout, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a timestamp as an HTTP date
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE_FORMAT).to_string()
}

/// Current time as an HTTP date, for the `Date` header
pub fn http_date_now() -> String {
    Utc::now().format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP date header value
///
/// Returns `None` for anything that is not a valid RFC 2822 style date,
/// in which case the header is ignored.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Check whether a conditional GET can be answered with 304
///
/// `If-None-Match` takes precedence over `If-Modified-Since`; since no entity
/// tags are produced, its presence always means a full response. Modification
/// times are compared in whole seconds.
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
    modified: SystemTime,
) -> bool {
    if has_if_none_match {
        return false;
    }

    if_modified_since
        .and_then(parse_http_date)
        .is_some_and(|since| DateTime::<Utc>::from(modified).timestamp() <= since.timestamp())
}
