//! Canonical HTTP path construction
//!
//! Builds slash-delimited enforcement paths from mapping fragments. The
//! transform is idempotent: feeding a built path back in yields the same
//! path.

/// Builds a canonical path from ordered mapping fragments
///
/// Empty fragments contribute nothing. Every non-empty fragment gets a
/// leading slash before concatenation, as does the final result; a single
/// trailing slash is stripped when the result is longer than "/".
///
/// # Examples
///
/// ```
/// use pathguard_autoconf::path::build_path;
///
/// assert_eq!(build_path(["pets", "list"]), "/pets/list");
/// assert_eq!(build_path(["/pets/", ""]), "/pets");
/// assert_eq!(build_path::<[&str; 0], &str>([]), "/");
/// ```
pub fn build_path<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for fragment in fragments {
        let fragment = fragment.as_ref();
        if fragment.is_empty() {
            continue;
        }
        if !fragment.starts_with('/') {
            joined.push('/');
        }
        joined.push_str(fragment);
    }

    if !joined.starts_with('/') {
        joined.insert(0, '/');
    }
    if joined.len() > 1 && joined.ends_with('/') {
        joined.pop();
    }
    joined
}
