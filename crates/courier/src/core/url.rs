/// Join `base_url` and `path` with exactly one slash.
///
/// An empty `base_url` returns `path` unchanged. Otherwise one trailing
/// slash is stripped from the base and one leading slash from the path.
/// Nothing is percent-encoded and query strings are left alone.
///
/// # Examples
///
/// ```
/// use courier::core::build_url;
///
/// assert_eq!(build_url("https://api.test/", "/users"), "https://api.test/users");
/// assert_eq!(build_url("https://api.test", "users"), "https://api.test/users");
/// assert_eq!(build_url("", "/users"), "/users");
/// ```
pub fn build_url(base_url: &str, path: &str) -> String {
    if base_url.is_empty() {
        return path.to_string();
    }
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_join_is_idempotent() {
        let expected = "https://api.test/users";
        assert_eq!(build_url("https://api.test/", "/users"), expected);
        assert_eq!(build_url("https://api.test", "users"), expected);
        assert_eq!(build_url("https://api.test/", "users"), expected);
        assert_eq!(build_url("https://api.test", "/users"), expected);
    }

    #[test]
    fn empty_base_keeps_path() {
        assert_eq!(build_url("", "/users"), "/users");
        assert_eq!(build_url("", "users?page=2"), "users?page=2");
    }

    #[test]
    fn strips_only_one_slash() {
        assert_eq!(build_url("https://api.test//", "//users"), "https://api.test///users");
    }

    #[test]
    fn empty_path_keeps_single_separator() {
        assert_eq!(build_url("https://api.test/v1/", ""), "https://api.test/v1/");
    }

    #[test]
    fn query_is_not_touched() {
        assert_eq!(
            build_url("https://api.test/v1", "/search?q=a b&x=1"),
            "https://api.test/v1/search?q=a b&x=1"
        );
    }
}
