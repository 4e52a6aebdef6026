//! W3C Trace Context propagation for calls to upstream services.
//!
//! See: https://www.w3.org/TR/trace-context/

use opentelemetry::trace::TraceContextExt;
use reqwest::header::HeaderMap;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub const TRACEPARENT_HEADER: &str = "traceparent";
pub const TRACESTATE_HEADER: &str = "tracestate";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Write the current span's context as `traceparent`/`tracestate` headers.
///
/// Leaves `headers` untouched when there is no valid OpenTelemetry span, e.g. when no
/// OTLP endpoint was configured.
pub fn inject_trace_context(headers: &mut HeaderMap) {
    let context = Span::current().context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if !span_context.is_valid() {
        return;
    }

    // version-trace_id-span_id-trace_flags
    let traceparent = format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    );
    if let Ok(value) = traceparent.parse() {
        headers.insert(TRACEPARENT_HEADER, value);
    }

    let tracestate = span_context.trace_state().header();
    if !tracestate.is_empty()
        && let Ok(value) = tracestate.parse()
    {
        headers.insert(TRACESTATE_HEADER, value);
    }
}

pub fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Attach trace context (and an optional correlation id) to an outgoing request.
pub trait TraceHeadersExt {
    fn with_trace_headers(self, request_id: Option<&str>) -> Self;
}

impl TraceHeadersExt for reqwest::RequestBuilder {
    fn with_trace_headers(self, request_id: Option<&str>) -> Self {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);

        if let Some(id) = request_id
            && let Ok(value) = id.parse()
        {
            headers.insert(REQUEST_ID_HEADER, value);
        }

        self.headers(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_active_span_injects_nothing() {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);
        assert!(headers.is_empty());
    }

    #[test]
    fn request_id_is_attached_to_outgoing_requests() {
        let request = reqwest::Client::new()
            .get("http://documents.internal/documents/d-1")
            .with_trace_headers(Some("req-42"))
            .build()
            .unwrap();

        assert_eq!(extract_request_id(request.headers()), Some("req-42".to_string()));
        assert!(request.headers().get(TRACEPARENT_HEADER).is_none());
    }
}
