//! Turns flat request lists into the minimal ordered set of mock statements.

use indexmap::IndexMap;

use crate::matcher::{MockComponentRequest, MockImportRequest, ScanOutput};

/// The rewrite decided for one module: import requests grouped per resolved
/// source module (first-occurrence group order, source order within a
/// group), component requests in source order, and where the generated
/// block goes.
#[derive(Debug)]
pub struct RewritePlan {
    pub import_groups: IndexMap<String, Vec<MockImportRequest>>,
    pub component_mocks: Vec<MockComponentRequest>,
    pub removals: Vec<(usize, usize)>,
    pub insertion_point: usize,
    /// When false, the block must start with a synthetic facility import.
    pub has_vi_import: bool,
}

impl RewritePlan {
    pub fn from_scan(scan: ScanOutput) -> Self {
        let mut import_groups: IndexMap<String, Vec<MockImportRequest>> = IndexMap::new();
        for request in scan.import_mocks {
            import_groups
                .entry(request.binding.source_module.clone())
                .or_default()
                .push(request);
        }
        Self {
            import_groups,
            component_mocks: scan.component_mocks,
            removals: scan.removals,
            insertion_point: scan.insertion_point,
            has_vi_import: scan.has_vi_import,
        }
    }

    /// A no-op plan must leave the module byte-for-byte untouched.
    pub fn is_noop(&self) -> bool {
        self.import_groups.is_empty() && self.component_mocks.is_empty()
    }
}
