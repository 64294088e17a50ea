// src/checker/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Lets us walk every element of the tree in document order
// - Is built on html5ever (Mozilla's HTML parser)
//
// Every element is checked for two attributes:
// - href: anchors, stylesheets (<a>, <link>, <area>)
// - src: embedded resources (<img>, <script>, <iframe>)
//
// Each raw value is resolved against the page's base origin with the `url`
// crate. Values that cannot become an absolute URL are dropped quietly.
// Duplicates are kept on purpose: every occurrence is probed and reported.
// =============================================================================

use scraper::{ElementRef, Html};
use url::{ParseError, Url};

// Attributes that reference another page or resource
static REFERENCE_ATTRIBUTES: [&str; 2] = ["href", "src"];

// Extracts all links from HTML content
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//   base: the page's base origin (for resolving relative links)
//
// Returns: Vec<String> containing all absolute URLs found, in document order
//
// Example:
//   html = "<a href='/docs'>Docs</a><img src='logo.png'>"
//   base = "https://example.com"
//   result = ["https://example.com/docs", "https://example.com/logo.png"]
pub fn extract_html_links(html: &str, base: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // descendants() is a pre-order walk starting at the document root
    let links: Vec<String> = document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .flat_map(|element| {
            REFERENCE_ATTRIBUTES
                .iter()
                .filter_map(move |attr| element.value().attr(attr))
        })
        .filter_map(|raw| resolve_url(raw, base))
        .collect();

    ::log::debug!("Extracted {} link(s) against base {}", links.len(), base);
    links
}

// Resolves a possibly-relative reference to an absolute URL
//
// Parameters:
//   raw: the attribute value (might be relative, might be absolute)
//   base: the base URL to resolve against
//
// Returns: Some(absolute_url) or None if the reference should be dropped
//
// Examples (base = "http://example.com/path/"):
//   "#top"                  -> None (fragment only, same page)
//   "http://other.com/page" -> Some("http://other.com/page") (unchanged)
//   "../another.html"       -> Some("http://example.com/another.html")
//   ":not_a_url"            -> None (unparsable)
pub fn resolve_url(raw: &str, base: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    match Url::parse(raw) {
        // Already absolute: keep exactly what the page wrote
        Ok(_) => Some(raw.to_string()),
        Err(ParseError::RelativeUrlWithoutBase) => {
            if !is_valid_relative_reference(raw) {
                return None;
            }
            let base = Url::parse(base).ok()?;
            base.join(raw).ok().map(String::from)
        }
        Err(_) => None,
    }
}

// A relative reference may not have ':' in its first path segment,
// otherwise it would be read as a scheme ("a:b", ":x")
fn is_valid_relative_reference(raw: &str) -> bool {
    let first_segment = raw.split(['/', '?', '#']).next().unwrap_or("");
    !first_segment.contains(':')
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does descendants() return?
//    - An iterator over a node and everything below it
//    - Pre-order: a parent always comes before its children
//    - Starting at root() means every element of the page is visited
//
// 2. What is ElementRef::wrap?
//    - The tree holds text, comments and elements
//    - wrap() returns Some(ElementRef) only for element nodes
//    - Combined with filter_map, non-elements simply disappear
//
// 3. Why `move` in the inner closure?
//    - The inner iterator outlives the outer closure call
//    - `move` copies the ElementRef (a cheap reference) into it
//
// 4. What does base.join(raw) do?
//    - Standard relative-reference resolution, like a browser
//    - "../x" climbs one directory, "/x" starts at the host root
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://example.com/path/";

    #[test]
    fn test_resolve_absolute_url_unchanged() {
        assert_eq!(
            resolve_url("http://othersite.com/page", BASE),
            Some("http://othersite.com/page".to_string())
        );
        assert_eq!(
            resolve_url("https://other.com", BASE),
            Some("https://other.com".to_string())
        );
    }

    #[test]
    fn test_scheme_without_host_is_absolute() {
        // No host, but a scheme: kept as written and probed like any link
        assert_eq!(
            resolve_url("mailto:someone@example.com", BASE),
            Some("mailto:someone@example.com".to_string())
        );
        assert_eq!(
            resolve_url("javascript:void(0)", BASE),
            Some("javascript:void(0)".to_string())
        );
    }

    #[test]
    fn test_resolve_relative_urls() {
        assert_eq!(
            resolve_url("subpage.html", BASE),
            Some("http://example.com/path/subpage.html".to_string())
        );
        assert_eq!(
            resolve_url("../another.html", BASE),
            Some("http://example.com/another.html".to_string())
        );
        assert_eq!(
            resolve_url("/root.html", BASE),
            Some("http://example.com/root.html".to_string())
        );
        assert_eq!(
            resolve_url("page.html", "http://example.com"),
            Some("http://example.com/page.html".to_string())
        );
        assert_eq!(
            resolve_url("just/a/path", "http://example.com/base/"),
            Some("http://example.com/base/just/a/path".to_string())
        );
    }

    #[test]
    fn test_rejected_references() {
        assert_eq!(resolve_url("#section1", BASE), None);
        assert_eq!(resolve_url("", BASE), None);
        assert_eq!(resolve_url("   ", BASE), None);
        assert_eq!(resolve_url(":not_a_url", BASE), None);
        assert_eq!(resolve_url("http://[broken", BASE), None);
    }

    #[test]
    fn test_invalid_base_rejects_relative() {
        assert_eq!(resolve_url("/page", "not a base"), None);
        // absolute references never need the base
        assert_eq!(
            resolve_url("https://example.org/", "not a base"),
            Some("https://example.org/".to_string())
        );
    }

    #[test]
    fn test_extract_href_and_src() {
        let html = r##"
            <html><head><link rel="stylesheet" href="/style.css"></head>
            <body>
              <a href="/docs">Docs</a>
              <a href="#top">Top</a>
              <img src="images/logo.png">
              <script src="https://cdn.example.net/app.js"></script>
            </body></html>
        "##;
        let links = extract_html_links(html, "https://example.com");
        assert_eq!(
            links,
            vec![
                "https://example.com/style.css",
                "https://example.com/docs",
                "https://example.com/images/logo.png",
                "https://cdn.example.net/app.js",
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let html = r#"<a href="/a">one</a><a href="/a">two</a>"#;
        let links = extract_html_links(html, "http://example.com");
        assert_eq!(links, vec!["http://example.com/a", "http://example.com/a"]);
    }
}
