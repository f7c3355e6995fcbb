//! Injected diagnostics sink
//!
//! Adapters and extractors are pure and never log; problems they tolerate
//! come back as values, and the client reports them here. The engine depends
//! on this capability but does not own its destination.

use crate::extract::ExtractionWarning;
use crate::vendor::Vendor;

/// Receiver for non-fatal engine diagnostics
pub trait Diagnostics: Send + Sync {
    /// An SSE event payload failed to decode as JSON and was skipped
    fn decode_error(&self, vendor: Vendor, detail: &str);

    /// A tool call degraded during extraction (e.g. malformed arguments)
    fn extraction_warning(&self, vendor: Vendor, warning: &ExtractionWarning);
}

/// Default sink that forwards to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn decode_error(&self, vendor: Vendor, detail: &str) {
        tracing::debug!(vendor = %vendor, detail, "skipping undecodable stream event");
    }

    fn extraction_warning(&self, vendor: Vendor, warning: &ExtractionWarning) {
        tracing::warn!(vendor = %vendor, warning = %warning, "tool-call extraction degraded");
    }
}

/// Sink that drops everything; useful in tests
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn decode_error(&self, _vendor: Vendor, _detail: &str) {}

    fn extraction_warning(&self, _vendor: Vendor, _warning: &ExtractionWarning) {}
}
