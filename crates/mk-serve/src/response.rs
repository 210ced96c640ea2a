//! Turns a stored mock back into an HTTP response.

use crate::duration::parse_duration;
use crate::shutdown::Shutdown;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use mk_core::types::MockRecord;
use std::time::Duration;
use tracing::{debug, warn};

/// Absent or unparsable requests mean no delay; anything else is capped at `max`.
pub fn effective_delay(requested: Option<&str>, max: Duration) -> Duration {
    requested
        .and_then(parse_duration)
        .map_or(Duration::ZERO, |delay| delay.min(max))
}

/// Waits out the effective delay, then renders `record`. Nothing is written
/// before the wait completes. Shutdown cuts the wait short with a 503; a client
/// disconnect drops this future and the timer with it.
pub async fn render(
    record: &MockRecord,
    requested_delay: Option<&str>,
    max_delay: Duration,
    shutdown: &Shutdown,
) -> Response {
    let delay = effective_delay(requested_delay, max_delay);
    if !delay.is_zero() {
        debug!(mock_id = %record.id, ?delay, "delaying mock response");
        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            () = shutdown.wait() => {
                warn!(mock_id = %record.id, "delayed response interrupted by shutdown");
                return StatusCode::SERVICE_UNAVAILABLE.into_response();
            }
        }
    }
    build_response(record)
}

pub fn content_type_value(record: &MockRecord) -> String {
    format!("{}; charset={}", record.content_type, record.charset)
}

pub fn build_response(record: &MockRecord) -> Response {
    let mut response = Response::new(Body::from(record.body.clone()));
    *response.status_mut() =
        StatusCode::from_u16(record.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let headers = response.headers_mut();
    match HeaderValue::from_str(&content_type_value(record)) {
        Ok(value) => {
            headers.insert(CONTENT_TYPE, value);
        }
        Err(err) => warn!(mock_id = %record.id, error = %err, "invalid content type header"),
    }
    for (name, value) in &record.headers {
        // header names are lowercased by `HeaderName`
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(_)) if name == CONTENT_TYPE => {
                warn!(mock_id = %record.id, "ignoring stored Content-Type header");
            }
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!(mock_id = %record.id, header = %name, "skipping invalid header"),
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown;
    use axum::body::to_bytes;
    use mk_core::types::MockId;
    use mk_core::types::mock::creation_time;
    use std::collections::BTreeMap;
    use std::time::Instant;

    fn hello_world() -> MockRecord {
        MockRecord {
            id: MockId::generate(),
            created_at: creation_time(),
            status: 200,
            content_type: "text/plain".to_string(),
            charset: "UTF-8".to_string(),
            headers: BTreeMap::from([("x-language".to_string(), "rust".to_string())]),
            body: b"Hello World".to_vec(),
        }
    }

    #[test]
    fn delay_resolution() {
        let max = Duration::from_secs(60);
        assert_eq!(effective_delay(None, max), Duration::ZERO);
        assert_eq!(effective_delay(Some(""), max), Duration::ZERO);
        assert_eq!(effective_delay(Some("soon"), max), Duration::ZERO);
        assert_eq!(
            effective_delay(Some("1000ms"), max),
            Duration::from_millis(1000)
        );
        assert_eq!(effective_delay(Some("2h"), max), max);
    }

    #[tokio::test]
    async fn renders_record_without_delay() {
        let (_trigger, shutdown) = shutdown::channel();
        let record = hello_world();

        let started = Instant::now();
        let response = render(&record, None, Duration::from_secs(60), &shutdown).await;
        assert!(started.elapsed() < Duration::from_millis(100));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain; charset=UTF-8"
        );
        assert_eq!(response.headers().get("X-Language").unwrap(), "rust");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Hello World");
    }

    #[tokio::test]
    async fn honours_requested_delay() {
        let (_trigger, shutdown) = shutdown::channel();
        let record = hello_world();

        let started = Instant::now();
        let response = render(&record, Some("1000ms"), Duration::from_secs(60), &shutdown).await;
        let elapsed = started.elapsed();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(elapsed >= Duration::from_millis(1000), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(1100), "{elapsed:?}");
    }

    #[tokio::test]
    async fn caps_delay_at_server_maximum() {
        let (_trigger, shutdown) = shutdown::channel();
        let record = hello_world();

        let started = Instant::now();
        render(&record, Some("30s"), Duration::from_millis(1000), &shutdown).await;
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(1000), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(1100), "{elapsed:?}");
    }

    #[tokio::test]
    async fn shutdown_interrupts_delay() {
        let (trigger, shutdown) = shutdown::channel();
        let record = hello_world();

        let started = Instant::now();
        let pending = render(&record, Some("30s"), Duration::from_secs(60), &shutdown);
        let (response, ()) = tokio::join!(pending, async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.trigger();
        });

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn skips_invalid_headers() {
        let mut record = hello_world();
        record
            .headers
            .insert("bad header".to_string(), "value".to_string());
        record
            .headers
            .insert("x-newline".to_string(), "a\nb".to_string());

        let response = build_response(&record);
        assert_eq!(response.headers().len(), 2);
        assert!(response.headers().get("x-newline").is_none());
    }

    #[test]
    fn stored_content_type_header_does_not_override() {
        let mut record = hello_world();
        record
            .headers
            .insert("Content-Type".to_string(), "image/png".to_string());

        let response = build_response(&record);
        let values: Vec<_> = response.headers().get_all(CONTENT_TYPE).iter().collect();
        assert_eq!(values, vec!["text/plain; charset=UTF-8"]);
    }

    #[test]
    fn preserves_binary_body_and_status() {
        let mut record = hello_world();
        record.status = 418;
        record.content_type = "image/png".to_string();
        record.body = vec![0x89, b'P', b'N', b'G', 0, 255];

        let response = build_response(&record);
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "image/png; charset=UTF-8"
        );
    }
}
