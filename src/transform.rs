//! The per-module transform entry point.
//!
//! Invoked once per module by the host build pipeline, synchronously and
//! with no shared mutable state beyond the registries, which the host must
//! finish populating before the first call.

use sourcemap::SourceMap;
use swc_core::common::sync::Lrc;
use swc_core::common::{BytePos, FileName, SourceMap as SwcSourceMap};
use swc_core::ecma::ast::{EsVersion, Module};
use swc_core::ecma::parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use swc_core::ecma::visit::VisitWith;
use tracing::{debug, trace};

use crate::codegen::render_mock_block;
use crate::diagnostics::DiagnosticSink;
use crate::matcher::MacroCollector;
use crate::plan::RewritePlan;
use crate::registry::{ComponentBinding, ImportBinding, MockRegistries};
use crate::splice::TextSplicer;
use crate::{HELPER_MOCK_COMPONENT, HELPER_MOCK_IMPORT};

/// Rewritten module text plus the map back to the original positions.
pub struct TransformOutput {
    pub code: String,
    pub map: SourceMap,
}

impl TransformOutput {
    /// The map serialized as JSON, the form build tools exchange.
    pub fn map_json(&self) -> String {
        let mut buf = Vec::new();
        if self.map.to_writer(&mut buf).is_err() {
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

/// The macro expander. Owns the registries; `transform` is read-only with
/// respect to them.
///
/// Precondition: all registry notifications for the current build
/// generation must have been applied before `transform` runs for a module
/// that uses the macros. The expander does not defer or snapshot.
#[derive(Debug, Default)]
pub struct MockMacroTransform {
    registries: MockRegistries,
}

impl MockMacroTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends import bindings, mirroring the host's `imports:extend`
    /// notification.
    pub fn extend_imports(&mut self, bindings: impl IntoIterator<Item = ImportBinding>) {
        self.registries.extend_imports(bindings);
    }

    /// Replaces the component set, mirroring the host's
    /// `components:extend` notification.
    pub fn set_components(&mut self, bindings: Vec<ComponentBinding>) {
        self.registries.set_components(bindings);
    }

    pub fn registries(&self) -> &MockRegistries {
        &self.registries
    }

    /// Expands mock macros in one module.
    ///
    /// Returns `None` when the module needs no change: no macro name in the
    /// text, a dependency-tree id, a parse failure, or no valid macro
    /// occurrence. Validation failures go to `sink` and never abort the
    /// rest of the module.
    pub fn transform(
        &self,
        code: &str,
        id: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<TransformOutput> {
        if !code.contains(HELPER_MOCK_IMPORT) && !code.contains(HELPER_MOCK_COMPONENT) {
            return None;
        }
        if id.contains("/node_modules/") {
            return None;
        }

        let Some((module, base)) = parse_module(code, id) else {
            // Speculative source that does not parse is expected; skip the
            // module instead of failing the build.
            trace!(module = id, "skipping unparseable module");
            return None;
        };

        let mut collector = MacroCollector::new(code, base, &self.registries, sink);
        module.visit_with(&mut collector);
        let plan = RewritePlan::from_scan(collector.into_scan());

        if plan.is_noop() {
            return None;
        }
        debug!(
            module = id,
            import_groups = plan.import_groups.len(),
            component_mocks = plan.component_mocks.len(),
            "expanding mock macros"
        );

        let block = render_mock_block(&plan);
        let mut splicer = TextSplicer::new(code);
        for &(start, end) in &plan.removals {
            splicer.remove(start, end);
        }
        splicer.insert_before(plan.insertion_point, block);

        let out = splicer.finish(id);
        Some(TransformOutput {
            code: out.code,
            map: out.map,
        })
    }
}

/// Parses one module, returning the tree and the file's base position for
/// span-to-offset translation. Any syntax error, including ones the parser
/// could recover from, counts as a parse failure.
pub(crate) fn parse_module(code: &str, id: &str) -> Option<(Module, BytePos)> {
    let cm: Lrc<SwcSourceMap> = Default::default();
    let fm = cm.new_source_file(Lrc::new(FileName::Custom(id.to_string())), code.to_string());
    let lexer = Lexer::new(
        syntax_for(id),
        EsVersion::latest(),
        StringInput::from(&*fm),
        None,
    );
    let mut parser = Parser::new_from(lexer);
    let module = parser.parse_module().ok()?;
    if !parser.take_errors().is_empty() {
        return None;
    }
    Some((module, fm.start_pos))
}

/// Picks parser syntax from the module id, ignoring build-tool query and
/// fragment suffixes like `?vue&type=script`.
fn syntax_for(id: &str) -> Syntax {
    let path = id.split(['?', '#']).next().unwrap_or(id);
    match path.rsplit('.').next().unwrap_or("") {
        "ts" | "mts" | "cts" => Syntax::Typescript(TsSyntax::default()),
        "tsx" => Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_strips_query_suffix() {
        assert!(matches!(
            syntax_for("/src/foo.spec.ts?import"),
            Syntax::Typescript(TsSyntax { tsx: false, .. })
        ));
        assert!(matches!(syntax_for("/src/foo.spec.tsx"), Syntax::Typescript(TsSyntax { tsx: true, .. })));
        assert!(matches!(syntax_for("/src/foo.spec.js"), Syntax::Es(_)));
    }

    #[test]
    fn parse_failure_is_none() {
        assert!(parse_module("const = ;;;(", "/src/bad.spec.js").is_none());
    }

    #[test]
    fn typescript_modules_parse() {
        assert!(parse_module("const x: number = 1\nexport {}\n", "/src/a.spec.ts").is_some());
    }
}
