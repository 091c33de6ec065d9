//! Slash-delimited absolute path helpers.
//!
//! All functions are pure and total: malformed input collapses to the root.

/// Normalize a path: single leading slash, no empty segments, no trailing
/// slash except for the root.
pub fn normalize(path: &str) -> String {
    let segments = breadcrumbs(path);
    if segments.is_empty() {
        return "/".to_string();
    }
    format!("/{}", segments.join("/"))
}

/// Join a directory path and a leaf name.
pub fn join(base: &str, leaf: &str) -> String {
    if base == "/" {
        format!("/{}", leaf)
    } else {
        format!("{}/{}", base, leaf)
    }
}

/// Parent of a path; the root is its own parent.
pub fn parent(path: &str) -> String {
    let mut segments = breadcrumbs(path);
    segments.pop();
    if segments.is_empty() {
        return "/".to_string();
    }
    format!("/{}", segments.join("/"))
}

/// Non-empty path segments in order.
pub fn breadcrumbs(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// `(label, absolute path)` for every ancestor of `path`, root excluded.
pub fn breadcrumb_trail(path: &str) -> Vec<(String, String)> {
    let mut current = String::new();
    breadcrumbs(path)
        .into_iter()
        .map(|segment| {
            current.push('/');
            current.push_str(segment);
            (segment.to_string(), current.clone())
        })
        .collect()
}

/// Last non-empty segment, or `""` for the root.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or("")
}
