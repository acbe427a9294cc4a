//! Single-pass recognition and validation of mock macro calls.
//!
//! Walks the parsed module once, pre-order, collecting three things without
//! mutating the tree: the first `import { vi } from "vitest"` declaration
//! (insertion point + "facility already imported" flag), validated
//! import-mock requests and validated component-mock requests, together
//! with the byte range of every matched call so the splicer can remove it.

use swc_core::common::{BytePos, Span, Spanned};
use swc_core::ecma::ast::{
    CallExpr, Callee, Expr, ImportDecl, ImportSpecifier, Lit, ModuleExportName,
};
use swc_core::ecma::visit::{Visit, VisitWith};

use crate::diagnostics::{Diagnostic, DiagnosticSink, MacroError};
use crate::registry::{ImportBinding, MockRegistries};
use crate::{HELPER_MOCK_COMPONENT, HELPER_MOCK_IMPORT, VITEST_MODULE, VI_HELPER};

/// One validated `mockNuxtImport()` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockImportRequest {
    /// The name as written in the macro call.
    pub name: String,
    pub binding: ImportBinding,
    /// Verbatim source text of the factory argument.
    pub factory: String,
}

/// One validated `mockComponent()` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockComponentRequest {
    /// Registry file path, or the literal itself when unregistered.
    pub path: String,
    pub factory: String,
}

/// Everything one traversal produces.
#[derive(Debug, Default)]
pub struct ScanOutput {
    /// Offset the generated block is spliced at: end of the `vi` import
    /// when one exists, else the start of the module.
    pub insertion_point: usize,
    pub has_vi_import: bool,
    pub import_mocks: Vec<MockImportRequest>,
    pub component_mocks: Vec<MockComponentRequest>,
    /// Byte ranges of matched calls, to be replaced with empty text.
    pub removals: Vec<(usize, usize)>,
}

#[derive(Clone, Copy)]
enum Helper {
    Import,
    Component,
}

impl Helper {
    fn name(self) -> &'static str {
        match self {
            Helper::Import => HELPER_MOCK_IMPORT,
            Helper::Component => HELPER_MOCK_COMPONENT,
        }
    }
}

pub struct MacroCollector<'a> {
    source: &'a str,
    /// Start position of the file inside the parser's source map; swc
    /// spans are global, so text offsets are relative to this.
    base: BytePos,
    registries: &'a MockRegistries,
    sink: &'a mut dyn DiagnosticSink,
    scan: ScanOutput,
}

impl<'a> MacroCollector<'a> {
    pub fn new(
        source: &'a str,
        base: BytePos,
        registries: &'a MockRegistries,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            source,
            base,
            registries,
            sink,
            scan: ScanOutput::default(),
        }
    }

    pub fn into_scan(self) -> ScanOutput {
        self.scan
    }

    fn offset(&self, pos: BytePos) -> usize {
        (pos.0 - self.base.0) as usize
    }

    fn slice(&self, span: Span) -> &'a str {
        &self.source[self.offset(span.lo)..self.offset(span.hi)]
    }

    fn fail(&mut self, error: MacroError, pos: Option<usize>) {
        self.sink.report(Diagnostic::new(error, pos));
    }

    fn expand_call(&mut self, call: &CallExpr, helper: Helper) {
        if call.args.len() != 2 {
            let pos = self.offset(call.span.lo);
            self.fail(MacroError::Arity { helper: helper.name() }, Some(pos));
            return;
        }

        let literal = match (&call.args[0].spread, &*call.args[0].expr) {
            (None, Expr::Lit(Lit::Str(s))) => s.value.to_string(),
            _ => {
                let pos = self.offset(call.args[0].span().lo);
                self.fail(
                    MacroError::ArgumentShape { helper: helper.name() },
                    Some(pos),
                );
                return;
            }
        };

        // Opaque text; re-emitted verbatim, never parsed again.
        let factory = self.slice(call.args[1].expr.span()).to_string();
        let range = (self.offset(call.span.lo), self.offset(call.span.hi));

        match helper {
            Helper::Import => {
                let Some(binding) = self.registries.find_import(&literal) else {
                    self.fail(MacroError::UnresolvedImport { name: literal }, None);
                    return;
                };
                let binding = binding.clone();
                self.scan.removals.push(range);
                self.scan.import_mocks.push(MockImportRequest {
                    name: literal,
                    binding,
                    factory,
                });
            }
            Helper::Component => {
                // Unregistered names fall back to the literal as a raw
                // import path; this is deliberately not an error.
                let path = self
                    .registries
                    .find_component(&literal)
                    .map(|c| c.file_path.clone())
                    .unwrap_or(literal);
                self.scan.removals.push(range);
                self.scan
                    .component_mocks
                    .push(MockComponentRequest { path, factory });
            }
        }
    }
}

impl Visit for MacroCollector<'_> {
    fn visit_import_decl(&mut self, import: &ImportDecl) {
        // First matching declaration wins.
        if self.scan.has_vi_import || import.src.value.as_ref() != VITEST_MODULE {
            return;
        }
        let has_vi = import.specifiers.iter().any(|spec| match spec {
            ImportSpecifier::Named(named) => match &named.imported {
                Some(ModuleExportName::Ident(ident)) => ident.sym.as_ref() == VI_HELPER,
                Some(ModuleExportName::Str(s)) => s.value.as_ref() == VI_HELPER,
                None => named.local.sym.as_ref() == VI_HELPER,
            },
            _ => false,
        });
        if has_vi {
            self.scan.insertion_point = self.offset(import.span.hi);
            self.scan.has_vi_import = true;
        }
    }

    fn visit_call_expr(&mut self, call: &CallExpr) {
        let helper = match &call.callee {
            Callee::Expr(expr) => match &**expr {
                Expr::Ident(ident) if ident.sym.as_ref() == HELPER_MOCK_IMPORT => Helper::Import,
                Expr::Ident(ident) if ident.sym.as_ref() == HELPER_MOCK_COMPONENT => {
                    Helper::Component
                }
                _ => {
                    call.visit_children_with(self);
                    return;
                }
            },
            _ => {
                call.visit_children_with(self);
                return;
            }
        };
        // A matched call is terminal: its factory argument is opaque text,
        // so anything nested inside it travels verbatim instead of being
        // matched again (which would nest removal ranges).
        self.expand_call(call, helper);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ComponentBinding;
    use crate::transform::parse_module;

    fn scan(code: &str, registries: &MockRegistries) -> (ScanOutput, Vec<Diagnostic>) {
        let (module, base) = parse_module(code, "/src/test.spec.ts").expect("fixture parses");
        let mut diagnostics: Vec<Diagnostic> = vec![];
        let mut collector = MacroCollector::new(code, base, registries, &mut diagnostics);
        module.visit_with(&mut collector);
        (collector.into_scan(), diagnostics)
    }

    #[test]
    fn records_vi_import_end_as_insertion_point() {
        let code = "import { vi } from \"vitest\"\nconst x = 1\n";
        let (scan, _) = scan(code, &MockRegistries::default());
        assert!(scan.has_vi_import);
        assert_eq!(scan.insertion_point, "import { vi } from \"vitest\"".len());
    }

    #[test]
    fn aliased_vi_specifier_counts() {
        let code = "import { vi as mocker } from 'vitest'\n";
        let (scan, _) = scan(code, &MockRegistries::default());
        assert!(scan.has_vi_import);
    }

    #[test]
    fn captures_factory_text_verbatim() {
        let mut registries = MockRegistries::default();
        registries.extend_imports([ImportBinding::new("useFoo", None, "#imports")]);
        let code = "mockNuxtImport('useFoo', () =>   () => 'mocked')\n";
        let (scan, diagnostics) = scan(code, &registries);
        assert!(diagnostics.is_empty());
        assert_eq!(scan.import_mocks.len(), 1);
        assert_eq!(scan.import_mocks[0].factory, "() =>   () => 'mocked'");
        assert_eq!(scan.removals, vec![(0, code.len() - 1)]);
    }

    #[test]
    fn arity_error_points_at_call_start() {
        let code = "const a = 1; mockNuxtImport('x')\n";
        let (scan, diagnostics) = scan(code, &MockRegistries::default());
        assert!(scan.import_mocks.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].pos, Some(13));
        assert_eq!(
            diagnostics[0].message(),
            "mockNuxtImport() should have exactly 2 arguments"
        );
    }

    #[test]
    fn non_literal_first_argument_is_shape_error() {
        let code = "mockComponent(someName, () => 1)\n";
        let (scan, diagnostics) = scan(code, &MockRegistries::default());
        assert!(scan.component_mocks.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].pos, Some("mockComponent(".len()));
        assert!(matches!(
            diagnostics[0].error,
            MacroError::ArgumentShape { .. }
        ));
    }

    #[test]
    fn unresolved_import_is_reported_without_position() {
        let code = "mockNuxtImport('missing', () => 1)\n";
        let (scan, diagnostics) = scan(code, &MockRegistries::default());
        assert!(scan.import_mocks.is_empty());
        assert!(scan.removals.is_empty());
        assert_eq!(
            diagnostics,
            vec![Diagnostic::new(
                MacroError::UnresolvedImport { name: "missing".into() },
                None
            )]
        );
    }

    #[test]
    fn unregistered_component_falls_back_to_literal_path() {
        let code = "mockComponent('./Other.vue', () => 1)\n";
        let (scan, diagnostics) = scan(code, &MockRegistries::default());
        assert!(diagnostics.is_empty());
        assert_eq!(scan.component_mocks[0].path, "./Other.vue");
    }

    #[test]
    fn registered_component_resolves_to_file_path() {
        let mut registries = MockRegistries::default();
        registries.set_components(vec![ComponentBinding::new(
            ["MyButton", "my-button"],
            "/src/components/MyButton.vue",
        )]);
        let code = "mockComponent('my-button', () => 1)\n";
        let (scan, _) = scan(code, &registries);
        assert_eq!(scan.component_mocks[0].path, "/src/components/MyButton.vue");
    }

    #[test]
    fn nested_macro_inside_factory_is_not_matched() {
        let code = "mockComponent('Outer', () => { mockComponent('Inner', () => 1); return 2 })\n";
        let (scan, diagnostics) = scan(code, &MockRegistries::default());
        assert!(diagnostics.is_empty());
        assert_eq!(scan.component_mocks.len(), 1);
        assert_eq!(scan.component_mocks[0].path, "Outer");
        assert!(scan.component_mocks[0].factory.contains("mockComponent('Inner'"));
        assert_eq!(scan.removals.len(), 1);
    }

    #[test]
    fn macro_nested_in_ordinary_call_is_still_visited() {
        let mut registries = MockRegistries::default();
        registries.extend_imports([ImportBinding::new("useFoo", None, "#imports")]);
        let code = "describe('suite', () => { mockNuxtImport('useFoo', () => 1) })\n";
        let (scan, diagnostics) = scan(code, &registries);
        assert!(diagnostics.is_empty());
        assert_eq!(scan.import_mocks.len(), 1);
    }

    #[test]
    fn one_bad_call_does_not_stop_the_others() {
        let mut registries = MockRegistries::default();
        registries.extend_imports([ImportBinding::new("useFoo", None, "#imports")]);
        let code = "mockNuxtImport('useFoo')\nmockNuxtImport('useFoo', () => 1)\n";
        let (scan, diagnostics) = scan(code, &registries);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(scan.import_mocks.len(), 1);
    }
}
