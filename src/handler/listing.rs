//! Directory listing page

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::io;
use std::path::Path;
use tokio::fs;

use crate::http::response::escape_html;

/// Characters left as-is in listing links
const LINK_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

struct ListingEntry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

/// Render an HTML listing of `dir`, titled with the decoded request path
///
/// Directories get a trailing `/` and symbolic links a trailing `@`.
/// Entries are sorted case-insensitively.
pub async fn render_listing(dir: &Path, display_path: &str) -> io::Result<String> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let is_symlink = entry.file_type().await?.is_symlink();
        // Follows links, so a link to a directory is listed as one
        let is_dir = fs::metadata(entry.path())
            .await
            .is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }
    entries.sort_by_key(|e| e.name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = format!(
        "<!DOCTYPE HTML>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         <hr>\n\
         <ul>\n"
    );

    for entry in &entries {
        let (mut display_name, link_name) = if entry.is_dir {
            (format!("{}/", entry.name), format!("{}/", entry.name))
        } else {
            (entry.name.clone(), entry.name.clone())
        };
        if entry.is_symlink {
            display_name = format!("{}@", entry.name);
        }

        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            utf8_percent_encode(&link_name, LINK_ENCODE_SET),
            escape_html(&display_name)
        ));
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listing_sorted_and_marked() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("A.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();

        let html = render_listing(dir.path(), "/").await.unwrap();
        assert!(html.contains("<title>Directory listing for /</title>"));

        let a = html.find(">A.txt<").unwrap();
        let assets = html.find(">assets/<").unwrap();
        let b = html.find(">b.txt<").unwrap();
        assert!(a < assets && assets < b);
        assert!(html.contains(r#"<a href="assets/">assets/</a>"#));
    }

    #[tokio::test]
    async fn test_listing_escapes_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a b&c.txt"), "").unwrap();

        let html = render_listing(dir.path(), "/<x>/").await.unwrap();
        assert!(html.contains("Directory listing for /&lt;x&gt;/"));
        assert!(html.contains(r#"<a href="a%20b%26c.txt">a b&amp;c.txt</a>"#));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_listing_marks_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("target.txt"), "").unwrap();
        std::os::unix::fs::symlink(dir.path().join("target.txt"), dir.path().join("link")).unwrap();

        let html = render_listing(dir.path(), "/").await.unwrap();
        assert!(html.contains(r#"<a href="link">link@</a>"#));
    }

    #[tokio::test]
    async fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(render_listing(&dir.path().join("gone"), "/gone/").await.is_err());
    }
}
