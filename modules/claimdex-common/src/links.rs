//! Canonicalizing item and profile references against the host origin.

use url::Url;

/// Resolve a relative or attribute-based reference to an absolute URL.
///
/// Empty input resolves to `None` — the record is unresolvable and the
/// caller skips it rather than failing. References that already carry a URI
/// scheme pass through unchanged, which makes resolution idempotent.
pub fn absolutize(origin: &str, href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }
    let origin = origin.trim_end_matches('/');
    if href.starts_with('/') {
        Some(format!("{origin}{href}"))
    } else {
        Some(format!("{origin}/{href}"))
    }
}
