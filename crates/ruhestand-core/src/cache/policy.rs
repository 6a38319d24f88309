//! The pure fetch-or-cache decision function.
//!
//! Classification and planning are separated from I/O so the branching is
//! unit-testable without a network or a disk. The proxy executes the
//! returned [`Action`].

use reqwest::Method;

/// One request as seen at the interception layer.
#[derive(Debug, Clone)]
pub struct AssetRequest {
    pub method: Method,
    pub url: String,
    /// Whether this is a top-level navigation rather than a subresource.
    pub navigation: bool,
}

impl AssetRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            navigation: false,
        }
    }

    pub fn navigation(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            navigation: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Anything but GET; never intercepted.
    NonGet,
    /// Same-origin top-level navigation.
    Navigation,
    SameOriginAsset,
    CrossOriginAsset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup {
    Hit,
    Miss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Forward to the network untouched; never cached.
    Passthrough,
    /// Network first; a successful body refreshes the cached root
    /// document, a failure falls back to it.
    NetworkThenCacheRoot,
    /// Serve the stored response.
    ServeCached,
    /// Fetch, store the response, then return it.
    FetchThenStore,
    /// Fetch without storing; cross-origin bodies are not persisted.
    FetchOnly,
}

/// Origin (scheme + host + port) of a URL, or `None` when the URL is
/// unparseable or opaque. Opaque origins never compare equal.
pub fn origin_of(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let origin = parsed.origin().ascii_serialization();
    if origin == "null" {
        None
    } else {
        Some(origin)
    }
}

/// Sort a request into the branch the fetch policy will take.
///
/// Navigations are only network-first when same-origin; cross-origin
/// navigations go through the generic asset path.
pub fn classify(request: &AssetRequest, app_origin: &str) -> RequestKind {
    if request.method != Method::GET {
        return RequestKind::NonGet;
    }
    let same_origin = origin_of(&request.url).is_some_and(|origin| origin == app_origin);
    if request.navigation && same_origin {
        return RequestKind::Navigation;
    }
    if same_origin {
        RequestKind::SameOriginAsset
    } else {
        RequestKind::CrossOriginAsset
    }
}

/// The fetch-or-cache decision table.
pub fn plan(kind: RequestKind, lookup: CacheLookup) -> Action {
    match (kind, lookup) {
        (RequestKind::NonGet, _) => Action::Passthrough,
        (RequestKind::Navigation, _) => Action::NetworkThenCacheRoot,
        (_, CacheLookup::Hit) => Action::ServeCached,
        (RequestKind::SameOriginAsset, CacheLookup::Miss) => Action::FetchThenStore,
        (RequestKind::CrossOriginAsset, CacheLookup::Miss) => Action::FetchOnly,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://example.org";

    #[test]
    fn test_plan_covers_every_branch() {
        use Action::*;
        use CacheLookup::*;
        use RequestKind::*;

        assert_eq!(plan(NonGet, Hit), Passthrough);
        assert_eq!(plan(NonGet, Miss), Passthrough);
        assert_eq!(plan(Navigation, Hit), NetworkThenCacheRoot);
        assert_eq!(plan(Navigation, Miss), NetworkThenCacheRoot);
        assert_eq!(plan(SameOriginAsset, Hit), ServeCached);
        assert_eq!(plan(SameOriginAsset, Miss), FetchThenStore);
        assert_eq!(plan(CrossOriginAsset, Hit), ServeCached);
        assert_eq!(plan(CrossOriginAsset, Miss), FetchOnly);
    }

    #[test]
    fn test_classify_non_get_wins_over_everything() {
        let request = AssetRequest {
            method: Method::POST,
            url: format!("{ORIGIN}/api"),
            navigation: true,
        };
        assert_eq!(classify(&request, ORIGIN), RequestKind::NonGet);
    }

    #[test]
    fn test_classify_navigation_requires_same_origin() {
        let same = AssetRequest::navigation(format!("{ORIGIN}/index.html"));
        assert_eq!(classify(&same, ORIGIN), RequestKind::Navigation);

        let cross = AssetRequest::navigation("https://other.example/index.html");
        assert_eq!(classify(&cross, ORIGIN), RequestKind::CrossOriginAsset);
    }

    #[test]
    fn test_classify_assets_by_origin() {
        let same = AssetRequest::get(format!("{ORIGIN}/styles.css"));
        assert_eq!(classify(&same, ORIGIN), RequestKind::SameOriginAsset);

        let cross = AssetRequest::get("https://cdn.example/lib.js");
        assert_eq!(classify(&cross, ORIGIN), RequestKind::CrossOriginAsset);

        let junk = AssetRequest::get("not a url");
        assert_eq!(classify(&junk, ORIGIN), RequestKind::CrossOriginAsset);
    }

    #[test]
    fn test_origin_of_normalizes_ports_and_paths() {
        assert_eq!(origin_of("https://example.org/app/x.css").as_deref(), Some("https://example.org"));
        assert_eq!(
            origin_of("http://example.org:8080/x").as_deref(),
            Some("http://example.org:8080")
        );
        assert_eq!(origin_of("data:text/plain,hi"), None);
        assert_eq!(origin_of("nonsense"), None);
    }
}
