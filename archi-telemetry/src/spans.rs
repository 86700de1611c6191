//! Span helpers for pipeline, model, and storage operations

use tracing::Span;

/// Span for one pipeline invocation
///
/// # Example
/// ```
/// use archi_telemetry::pipeline_span;
/// let span = pipeline_span("modify", "data_model");
/// let _enter = span.enter();
/// ```
pub fn pipeline_span(stage: &str, artifact: &str) -> Span {
    tracing::info_span!("pipeline", pipeline.stage = stage, artifact = artifact)
}

/// Span for a model API call
pub fn model_call_span(model_name: &str) -> Span {
    tracing::info_span!("model.call", model.name = model_name, otel.kind = "client")
}

/// Span for a slot read or write
pub fn store_span(operation: &str, artifact: &str, slot: &str) -> Span {
    tracing::debug_span!("store", store.op = operation, artifact = artifact, slot = slot)
}
