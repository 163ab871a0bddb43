use tracing::{Level, Span};

use super::TraceId;

/// Create a root span for a feed load / pipeline run.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::span!(
        Level::INFO,
        "root",
        name = %name,
        trace_id = %trace_id.as_str()
    )
}

