//! Source-to-source expansion of Nuxt test mocking macros.
//!
//! Scans a module's source text for `mockNuxtImport()` and `mockComponent()`
//! calls, validates them against registries fed by the host build pipeline,
//! removes the calls in place and splices grouped `vi.mock()` statements
//! after the module's `vi` import (synthesizing one when absent). Factory
//! arguments are carried as opaque text and re-emitted verbatim; they are
//! never evaluated here.
//!
//! ```ignore
//! let mut transform = MockMacroTransform::new();
//! transform.extend_imports([ImportBinding::new("useFoo", None, "#imports")]);
//!
//! let mut diagnostics: Vec<Diagnostic> = vec![];
//! if let Some(out) = transform.transform(code, "/src/foo.spec.ts", &mut diagnostics) {
//!     // out.code, out.map
//! }
//! ```
//!
//! Modules without either macro name are returned untouched (`None`), and a
//! module that fails to parse is silently skipped rather than failing the
//! build.

mod codegen;
mod diagnostics;
mod matcher;
mod plan;
mod registry;
mod splice;
mod transform;

pub use diagnostics::{Diagnostic, DiagnosticSink, MacroError};
pub use matcher::{MacroCollector, MockComponentRequest, MockImportRequest, ScanOutput};
pub use plan::RewritePlan;
pub use registry::{ComponentBinding, ImportBinding, MockRegistries};
pub use splice::{SpliceOutput, TextSplicer};
pub use transform::{MockMacroTransform, TransformOutput};

/// Macro that mocks an auto-imported symbol.
pub const HELPER_MOCK_IMPORT: &str = "mockNuxtImport";
/// Macro that mocks a registered (or raw-path) component.
pub const HELPER_MOCK_COMPONENT: &str = "mockComponent";

/// Module providing the mocking facility the generated code calls into.
pub(crate) const VITEST_MODULE: &str = "vitest";
/// The facility's named export.
pub(crate) const VI_HELPER: &str = "vi";
