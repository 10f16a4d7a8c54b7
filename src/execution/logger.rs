//! Logger collaborator injected into the loader

/// Sink for loader diagnostics
pub trait ExecutionLogger {
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
}

/// Forwards diagnostics to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ExecutionLogger for TracingLogger {
    fn error(&self, message: &str) {
        tracing::error!(target: "andamio::execution", "{message}");
    }

    fn warning(&self, message: &str) {
        tracing::warn!(target: "andamio::execution", "{message}");
    }
}
