//! Slug derivation for names used in resource URIs.

/// Derive a URL-safe slug from a human readable name.
///
/// ASCII letters are lowercased and digits kept; every run of other
/// characters collapses into a single `-`. Leading and trailing separators
/// are dropped, so the result may be empty for names without any ASCII
/// alphanumerics.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}
