//! Inbound request descriptor.

use http::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use http::Method;
use rand::Rng;

/// Unique request identifier for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let id = format!(
            "{:x}-{:08x}-{:08x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos(),
            rng.gen::<u32>(),
            rng.gen::<u32>()
        );
        Self(id)
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request descriptor handed to the renderer.
///
/// Immutable for the duration of one render; the renderer only reads the
/// URL and the client identity header.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Unique request identifier.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// Request URL (path and query, or absolute).
    pub url: String,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl RenderRequest {
    /// Create a GET request for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::generate(),
            method: Method::GET,
            url: url.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Set the HTTP method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Use a known request ID instead of a generated one.
    pub fn with_request_id(mut self, id: RequestId) -> Self {
        self.request_id = id;
        self
    }

    /// Add a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Set the client identity header.
    pub fn with_user_agent(self, user_agent: &str) -> Self {
        self.with_header(USER_AGENT.as_str(), user_agent)
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The declared client identity, if any.
    pub fn user_agent(&self) -> Option<&str> {
        self.headers.get(USER_AGENT).and_then(|v| v.to_str().ok())
    }

    /// Path portion of the URL, without query or fragment.
    pub fn path(&self) -> &str {
        let rest = match self.url.split_once("://") {
            Some((_, rest)) => rest.find('/').map(|i| &rest[i..]).unwrap_or("/"),
            None => self.url.as_str(),
        };
        let end = rest.find(['?', '#']).unwrap_or(rest.len());
        &rest[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generate_uniqueness() {
        let id1 = RequestId::generate();
        let id2 = RequestId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::from_string("req-1");
        assert_eq!(format!("{}", id), "req-1");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = RenderRequest::new("/").with_header("X-Trace", "abc");
        assert_eq!(request.header("x-trace"), Some("abc"));
        assert_eq!(request.header("X-TRACE"), Some("abc"));
        assert_eq!(request.header("missing"), None);
    }

    #[test]
    fn test_user_agent() {
        let request = RenderRequest::new("/").with_user_agent("Googlebot/2.1");
        assert_eq!(request.user_agent(), Some("Googlebot/2.1"));
        assert_eq!(RenderRequest::new("/").user_agent(), None);
    }

    #[test]
    fn test_invalid_header_ignored() {
        let request = RenderRequest::new("/").with_header("bad header", "x");
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_path() {
        assert_eq!(RenderRequest::new("/products/1?x=2").path(), "/products/1");
        assert_eq!(
            RenderRequest::new("https://shop.example.com/cart#top").path(),
            "/cart"
        );
        assert_eq!(RenderRequest::new("https://shop.example.com").path(), "/");
    }

    #[test]
    fn test_method() {
        let request = RenderRequest::new("/").with_method(Method::HEAD);
        assert_eq!(request.method, Method::HEAD);
        assert_eq!(RenderRequest::new("/").method, Method::GET);
    }
}
