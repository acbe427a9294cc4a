//! Validation failures and the channel they are reported through.
//!
//! Failures are per-occurrence: one malformed macro call is reported and
//! skipped without aborting the rest of the module. Parse failures are not
//! diagnostics at all; they silently disable the module's transform.

use serde::Serialize;
use thiserror::Error;

/// A macro occurrence that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MacroError {
    /// Recognized macro call with the wrong argument count.
    #[error("{helper}() should have exactly 2 arguments")]
    Arity { helper: &'static str },

    /// First argument is not a string literal.
    #[error("The first argument of {helper}() must be a string literal")]
    ArgumentShape { helper: &'static str },

    /// Import name not present in the import registry. Always a hard
    /// error; imports have no raw-path fallback.
    #[error("Cannot find import \"{name}\" to mock")]
    UnresolvedImport { name: String },
}

/// An error bound to the byte offset of the offending token, when one
/// exists. `Arity` points at the call start, `ArgumentShape` at the first
/// argument; unresolved imports carry no position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    #[serde(flatten)]
    pub error: MacroError,
    pub pos: Option<usize>,
}

impl Diagnostic {
    pub fn new(error: MacroError, pos: Option<usize>) -> Self {
        Self { error, pos }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// Host-supplied reporting facility. The transform never terminates the
/// build itself; it hands every failure to the sink and keeps going.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
