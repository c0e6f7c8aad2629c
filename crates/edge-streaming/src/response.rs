//! Finalized render response.

use futures::StreamExt;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};

use crate::engine::BodyStream;
use crate::strategy::RenderStrategy;

/// Response produced once the render reached its primary signal.
///
/// Status and headers are fixed; the body keeps streaming as the render
/// progresses.
pub struct RenderedResponse {
    /// Proposed status, or 500 if the render reported an error first.
    pub status: StatusCode,
    /// Caller headers with the content type forced.
    pub headers: HeaderMap,
    /// Style-augmented HTML body.
    pub body: BodyStream,
    /// Strategy that finalized this response.
    pub strategy: RenderStrategy,
}

impl RenderedResponse {
    /// The `Content-Type` header value.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Convert into an `http::Response` with a streaming body.
    pub fn into_http(self) -> http::Response<BodyStream> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }

    /// Drain the body into a byte buffer.
    pub async fn collect_body(self) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut body = self.body;
        while let Some(chunk) = body.next().await {
            bytes.extend_from_slice(&chunk);
        }
        bytes
    }

    /// Drain the body into a string, replacing invalid UTF-8.
    pub async fn into_string(self) -> String {
        String::from_utf8_lossy(&self.collect_body().await).into_owned()
    }
}

impl std::fmt::Debug for RenderedResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}
