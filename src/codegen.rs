//! Rendering of the generated `vi.mock()` block.
//!
//! The emitted statements are the crate's only wire format: they assume a
//! host mocking facility exposing `mock(moduleId, asyncFactory)` with
//! `importOriginal()` available inside the factory. Factory text from the
//! user is spliced in verbatim.

use crate::plan::RewritePlan;
use crate::VITEST_MODULE;

/// JSON-escapes a string for embedding in generated code, matching
/// `JSON.stringify` output.
fn json_str(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".into())
}

/// Renders the full insertion block: `\n` + statements + `;\n`.
///
/// Callers must only invoke this for non-noop plans.
pub(crate) fn render_mock_block(plan: &RewritePlan) -> String {
    let mut lines: Vec<String> = Vec::new();

    for (source_module, requests) in &plan.import_groups {
        lines.push(format!(
            "vi.mock({}, async (importOriginal) => {{",
            json_str(source_module)
        ));
        lines.push("  const mod = { ...await importOriginal() }".to_string());
        for request in requests {
            lines.push(format!(
                "  mod[{}] = await ({})()",
                json_str(&request.name),
                request.factory
            ));
        }
        lines.push("  return mod".to_string());
        lines.push("})".to_string());
    }

    for request in &plan.component_mocks {
        lines.push(format!("vi.mock({}, async () => {{", json_str(&request.path)));
        lines.push(format!("  const factory = ({});", request.factory));
        lines.push(
            "  const result = typeof factory === 'function' ? await factory() : await factory"
                .to_string(),
        );
        // Component modules conventionally have a default export; a factory
        // returning a bare value gets wrapped so callers need not know that.
        lines.push("  return 'default' in result ? result : { default: result }".to_string());
        lines.push("})".to_string());
    }

    if !plan.has_vi_import {
        lines.insert(0, format!("import {{vi}} from \"{VITEST_MODULE}\";"));
    }

    format!("\n{};\n", lines.join("\n"))
}
