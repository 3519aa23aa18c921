//! Username extraction from `/users/{name}` and `/api/users/{name}` paths.

use super::ApiError;

/// Returns the username segment of `path`, if the path has one.
///
/// The identifier-present shape is two segments (`/users/{name}`), or three
/// when the path starts with `api`. Anything else, including an empty
/// trailing segment, yields `None`. The path is percent-decoded before it is
/// split, so an encoded `/` counts as a separator.
#[must_use]
pub fn resolve_username(path: &str) -> Option<String> {
    let decoded = urlencoding::decode(path).map_or_else(|_| path.to_string(), |s| s.into_owned());
    let trimmed = decoded.strip_prefix('/').unwrap_or(&decoded);
    let segments: Vec<&str> = trimmed.split('/').collect();

    let expected = if segments.first() == Some(&"api") { 3 } else { 2 };
    if segments.len() != expected {
        return None;
    }

    segments
        .last()
        .filter(|s| !s.is_empty())
        .map(|s| (*s).to_string())
}

/// Like [`resolve_username`], for operations that cannot proceed without one.
pub fn require_username(path: &str) -> Result<String, ApiError> {
    resolve_username(path).ok_or(ApiError::MissingUsername)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_paths_have_no_username() {
        assert_eq!(resolve_username("/users"), None);
        assert_eq!(resolve_username("/api/users"), None);
        assert_eq!(resolve_username("/users/"), None);
        assert_eq!(resolve_username("/api/users/"), None);
    }

    #[test]
    fn item_paths_yield_last_segment() {
        assert_eq!(resolve_username("/users/test").as_deref(), Some("test"));
        assert_eq!(resolve_username("/api/users/test").as_deref(), Some("test"));
    }

    #[test]
    fn wrong_segment_count_is_not_an_identifier() {
        assert_eq!(resolve_username("/api/users/a/b"), None);
        assert_eq!(resolve_username("/users/a/b"), None);
        assert_eq!(resolve_username("/"), None);
    }

    #[test]
    fn username_is_percent_decoded() {
        assert_eq!(
            resolve_username("/users/lou%20garwood").as_deref(),
            Some("lou garwood")
        );
    }

    #[test]
    fn encoded_slash_splits_the_path() {
        assert_eq!(resolve_username("/users/a%2Fb"), None);
        assert_eq!(resolve_username("/api/users/a%2Fb"), None);
        assert_eq!(resolve_username("/api%2Fusers%2Ftest").as_deref(), Some("test"));
    }

    #[test]
    fn require_username_reports_missing_identifier() {
        let err = require_username("/users").unwrap_err();
        assert!(matches!(err, ApiError::MissingUsername));
        assert_eq!(require_username("/users/test").unwrap(), "test");
    }
}
