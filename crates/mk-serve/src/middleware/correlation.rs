use axum::body::Body;
use axum::http::header::Entry;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use ulid::Ulid;

pub const HEADER_NAME: &str = "x-correlation-id";
const MAX_LEN: usize = 128;

/// Request-scoped id that ties log lines and error envelopes to one call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn generate() -> Self {
        Self(format!("corr_{}", Ulid::new()))
    }

    /// Takes the caller's id when it is short, printable ASCII; mints a new one otherwise.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(HEADER_NAME)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| is_acceptable(value))
            .map_or_else(Self::generate, |value| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn is_acceptable(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_LEN
        && value.bytes().all(|byte| byte.is_ascii_graphic())
}

/// Exposes the correlation id to handlers, runs the request inside a span
/// carrying it, and stamps it on the response. A mock that stores its own
/// `x-correlation-id` header keeps that value.
pub async fn correlation_middleware(mut request: Request<Body>, next: Next) -> Response {
    let id = CorrelationId::from_headers(request.headers());
    request.extensions_mut().insert(id.clone());

    let span = tracing::info_span!(
        "request",
        correlation_id = %id.as_str(),
        method = %request.method(),
        path = %request.uri().path(),
    );
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(id.as_str()) {
        if let Entry::Vacant(slot) = response
            .headers_mut()
            .entry(HeaderName::from_static(HEADER_NAME))
        {
            slot.insert(value);
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_NAME, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn reuses_caller_id() {
        let id = CorrelationId::from_headers(&headers_with(" corr_caller "));
        assert_eq!(id.as_str(), "corr_caller");
    }

    #[test]
    fn mints_id_when_missing_or_unusable() {
        let minted = CorrelationId::from_headers(&HeaderMap::new());
        assert!(minted.as_str().starts_with("corr_"));

        let spaced = CorrelationId::from_headers(&headers_with("two words"));
        assert!(spaced.as_str().starts_with("corr_"));

        let long = CorrelationId::from_headers(&headers_with(&"x".repeat(MAX_LEN + 1)));
        assert!(long.as_str().starts_with("corr_"));
    }
}
