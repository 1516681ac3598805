//! Joining the configured backend address with endpoint paths.
//!
//! Users write base URLs with or without a trailing slash (and sometimes with
//! a path prefix when the backend sits behind a proxy), so endpoints are
//! always joined through [`construct_api_url`].

/// Drop trailing slashes and surrounding whitespace.
///
/// ```
/// use parley::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
/// assert_eq!(normalize_base_url(" https://chat.example.org/api// "), "https://chat.example.org/api");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint with exactly one slash between them.
///
/// ```
/// use parley::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000/", "/chat"),
///     "http://localhost:8000/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        normalize_base_url(base_url),
        endpoint.trim_start_matches('/')
    )
}

/// Whether `url` looks like an absolute http(s) address. Used to reject
/// obviously wrong `api_base_url` values before any request is made.
pub fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    ["http://", "https://"].iter().any(|scheme| {
        url.len() > scheme.len()
            && url
                .get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
