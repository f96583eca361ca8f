use uuid::Uuid;

use crate::context::ErrorContext;
use crate::providers::TraceProvider;

/// Uses the trace id carried by the context, or mints a UUID v4.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTraceProvider;

impl UuidTraceProvider {
    pub fn new() -> Self {
        Self
    }

    fn generate() -> String {
        Uuid::new_v4().to_string()
    }
}

impl TraceProvider for UuidTraceProvider {
    fn trace_id(&self, ctx: &ErrorContext) -> String {
        ctx.trace_id()
            .map_or_else(Self::generate, ToString::to_string)
    }
}
