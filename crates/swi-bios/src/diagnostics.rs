//! Diagnostic sink for firmware call logging
//!
//! Logging a diagnostic never fails and never changes what a call does.

use std::fmt;
use tracing::{error, trace, warn};

/// Severity of a firmware call diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagLevel {
    /// Per-call trace of the software interrupt and its arguments
    Swi,
    /// Call is recognized but not emulated
    Stub,
    /// Guest passed arguments the firmware would misbehave on
    GameError,
}

/// Receiver for firmware call diagnostics
pub trait DiagnosticSink {
    fn log(&mut self, level: DiagLevel, message: fmt::Arguments<'_>);
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&mut self, level: DiagLevel, message: fmt::Arguments<'_>) {
        match level {
            DiagLevel::Swi => trace!(target: "swi_bios::dispatcher", "{}", message),
            DiagLevel::Stub => warn!("{}", message),
            DiagLevel::GameError => error!("{}", message),
        }
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub entries: Vec<(DiagLevel, String)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages logged at a given level, in order
    pub fn messages(&self, level: DiagLevel) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    pub fn contains(&self, level: DiagLevel, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }
}

impl DiagnosticSink for RecordingSink {
    fn log(&mut self, level: DiagLevel, message: fmt::Arguments<'_>) {
        self.entries.push((level, message.to_string()));
    }
}
