//! Request trace id, visible to anything running inside the request's task.
//!
//! `RequestTrace` opens the scope; Problem Details rendering reads it back so
//! the body and the `x-trace-id` header agree.

use std::future::Future;

use tokio::task_local;

const NO_TRACE: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

/// Trace id of the request being served, or `"unknown"` outside one
/// (background tasks, websocket actors).
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| NO_TRACE.to_string())
}

pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
