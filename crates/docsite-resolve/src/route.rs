//! Route arithmetic.
//!
//! Routes are `/`-separated URL paths. Declared routes are relative to the
//! site's `baseUrl`; resolved routes contain the base exactly once.

/// Trailing slash policy applied to page permalinks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrailingSlash {
    /// Keep generated routes as they are.
    #[default]
    Preserve,
    /// Append `/`.
    Always,
    /// Strip `/` (except for the root route).
    Never,
}

impl From<Option<bool>> for TrailingSlash {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Preserve,
            Some(true) => Self::Always,
            Some(false) => Self::Never,
        }
    }
}

impl TrailingSlash {
    /// Apply the policy to a resolved route.
    #[must_use]
    pub fn apply(self, route: &str) -> String {
        match self {
            Self::Preserve => route.to_owned(),
            Self::Always if route.ends_with('/') => route.to_owned(),
            Self::Always => format!("{route}/"),
            Self::Never => match route.trim_end_matches('/') {
                "" => "/".to_owned(),
                trimmed => trimmed.to_owned(),
            },
        }
    }
}

/// Join a base path (`/spawn/`) and a base-relative route (`/v0.50/`).
///
/// ```
/// use docsite_resolve::route::join_route;
///
/// assert_eq!(join_route("/spawn/", "/v0.50/"), "/spawn/v0.50/");
/// assert_eq!(join_route("/spawn/", "/"), "/spawn/");
/// assert_eq!(join_route("/", "/docs"), "/docs");
/// ```
#[must_use]
pub fn join_route(base: &str, route: &str) -> String {
    let base = base.trim_end_matches('/');
    let route = route.trim_start_matches('/');
    format!("{base}/{route}")
}

/// Build a directory-style route from path pieces, dropping empty segments.
///
/// The result starts and ends with `/`.
#[must_use]
pub fn join_segments(pieces: &[&str]) -> String {
    let segments: Vec<&str> = pieces
        .iter()
        .flat_map(|piece| piece.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        "/".to_owned()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// Identity of a route for duplicate detection.
///
/// Ignores query, fragment and trailing slash.
#[must_use]
pub fn route_key(route: &str) -> &str {
    let path = route.split(['?', '#']).next().unwrap_or(route);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Check that a declared internal route is well formed.
///
/// # Errors
///
/// Returns a message describing the first problem found.
pub fn check_route(route: &str) -> Result<(), String> {
    if route.is_empty() {
        return Err("route is empty".to_owned());
    }
    if !route.starts_with('/') {
        return Err(format!("route {route:?} must start with '/'"));
    }
    if route.chars().any(char::is_whitespace) {
        return Err(format!("route {route:?} contains whitespace"));
    }
    let path = route.split(['?', '#']).next().unwrap_or(route);
    if path.contains("//") {
        return Err(format!("route {route:?} contains an empty segment"));
    }
    if path.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(format!("route {route:?} contains a relative segment"));
    }
    Ok(())
}

/// Check that an external URL uses `http(s)://` and names a host.
///
/// # Errors
///
/// Returns a message describing the problem.
pub fn check_url(url: &str) -> Result<(), String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| format!("URL {url:?} must use http:// or https://"))?;
    if url.chars().any(char::is_whitespace) {
        return Err(format!("URL {url:?} contains whitespace"));
    }
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(format!("URL {url:?} has no host"));
    }
    Ok(())
}

/// Check that a base path starts and ends with `/` and is well formed.
///
/// # Errors
///
/// Returns a message describing the problem.
pub fn check_base_url(base: &str) -> Result<(), String> {
    if !base.starts_with('/') || !base.ends_with('/') {
        return Err(format!("baseUrl {base:?} must start and end with '/'"));
    }
    check_route(base)
}

/// Best-effort base path used when the declared one is invalid, so the rest
/// of the site can still be checked.
#[must_use]
pub fn coerce_base_url(base: &str) -> String {
    join_segments(&[base])
}
