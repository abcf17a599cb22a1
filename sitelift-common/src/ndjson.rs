//! Newline-delimited JSON streaming responses
//!
//! The conversion endpoint answers with a chunked body where every line is one
//! JSON-encoded event. The body ends when the event stream ends.

use axum::body::{Body, Bytes};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures::stream::{Stream, StreamExt};
use serde::Serialize;
use std::convert::Infallible;
use tracing::{debug, warn};

/// Content type for NDJSON bodies
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Encode one value as a JSON line (trailing `\n` included)
pub fn encode_line<T: Serialize>(value: &T) -> serde_json::Result<Bytes> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    Ok(Bytes::from(line))
}

/// Build a streaming NDJSON response from a stream of events
///
/// # Example
/// ```rust,ignore
/// let (reporter, events) = progress_channel();
/// tokio::spawn(run_job(reporter));
/// ndjson_response(events)
/// ```
pub fn ndjson_response<S, T>(events: S) -> Response
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize + Send + 'static,
{
    let body_stream = async_stream::stream! {
        let mut events = Box::pin(events);
        while let Some(event) = events.next().await {
            match encode_line(&event) {
                Ok(line) => {
                    debug!("NDJSON: sending {} bytes", line.len());
                    yield Ok::<Bytes, Infallible>(line);
                }
                Err(e) => {
                    warn!("NDJSON: failed to serialize event: {}", e);
                }
            }
        }
        debug!("NDJSON: event stream closed");
    };

    (
        [
            (header::CONTENT_TYPE, NDJSON_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(body_stream),
    )
        .into_response()
}
