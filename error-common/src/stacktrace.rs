use backtrace::Backtrace;
use std::fmt::Write as _;

use crate::providers::StackTraceProvider;

/// Frames kept per snapshot unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Path prefixes of frames that belong to the runtime or to the error
/// handling crates themselves; those frames are left out of the snapshot.
const DEFAULT_ELIDED: &[&str] = &[
    "backtrace::",
    "std::",
    "core::",
    "alloc::",
    "__rust",
    "rust_begin_unwind",
    "error_common::",
    "error_logger::",
    "error_framework::",
    "database_adapter::",
    "validation_adapter::",
    "http_adapter::",
];

/// Stack capture backed by the `backtrace` crate.
#[derive(Debug, Clone)]
pub struct BacktraceProvider {
    max_depth: usize,
    elided: Vec<String>,
}

impl BacktraceProvider {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            elided: DEFAULT_ELIDED.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Adds a path prefix whose frames should be dropped, e.g. the
    /// crate hosting a custom logger.
    #[must_use]
    pub fn with_elided(mut self, prefix: impl Into<String>) -> Self {
        self.elided.push(prefix.into());
        self
    }

    /// Drops every elision rule, keeping all resolved frames.
    #[must_use]
    pub fn without_elision(mut self) -> Self {
        self.elided.clear();
        self
    }

    /// Matches the leading path of `function`; for trait impl frames such
    /// as `<alloc::boxed::Box<F> as core::ops::FnOnce>::call_once` that is
    /// the implementing type.
    fn is_elided(&self, function: &str) -> bool {
        let path = function.trim_start_matches('<');
        self.elided.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

impl Default for BacktraceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StackTraceProvider for BacktraceProvider {
    fn capture(&self) -> String {
        let backtrace = Backtrace::new();
        let mut out = String::new();
        let mut kept = 0usize;

        'frames: for frame in backtrace.frames() {
            for symbol in frame.symbols() {
                if kept >= self.max_depth {
                    break 'frames;
                }

                let Some(name) = symbol.name() else {
                    continue;
                };
                let function = format!("{name:#}");
                if self.is_elided(&function) {
                    continue;
                }

                let file = symbol
                    .filename()
                    .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
                let line = symbol.lineno().unwrap_or(0);

                // Writing to a String cannot fail.
                let _ = write!(out, "{function}\n\t{file}:{line}\n");
                kept += 1;
            }
        }

        out
    }
}
