//! Registries of auto-importable symbols and known components.
//!
//! Both collections are populated by the host build pipeline before any
//! module is transformed and are read-only for the duration of a transform.
//! Lookups return the first matching binding in registration order.

/// One symbol the host has determined is auto-available in scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// Canonical exported name.
    pub name: String,
    /// Name the symbol is exposed under locally, when it differs from `name`.
    pub alias: Option<String>,
    /// Module specifier the symbol really comes from (e.g. `#imports`).
    pub source_module: String,
}

impl ImportBinding {
    pub fn new(
        name: impl Into<String>,
        alias: Option<&str>,
        source_module: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            alias: alias.map(str::to_string),
            source_module: source_module.into(),
        }
    }

    /// The name the binding is addressable by: the alias when present,
    /// else the canonical name. Aliasing is exact, not either-or.
    pub fn lookup_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// One component the host knows about, addressable by any of its
/// equivalent names (typically a PascalCase and a kebab-case form).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentBinding {
    pub lookup_names: Vec<String>,
    pub file_path: String,
}

impl ComponentBinding {
    pub fn new<N: Into<String>>(
        lookup_names: impl IntoIterator<Item = N>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            lookup_names: lookup_names.into_iter().map(Into::into).collect(),
            file_path: file_path.into(),
        }
    }
}

/// The two read models consulted while expanding macros.
///
/// Imports grow append-only across host notifications; components are
/// replaced wholesale. The host must finish populating both before
/// transforming any module that depends on them.
#[derive(Debug, Default)]
pub struct MockRegistries {
    imports: Vec<ImportBinding>,
    components: Vec<ComponentBinding>,
}

impl MockRegistries {
    pub fn extend_imports(&mut self, bindings: impl IntoIterator<Item = ImportBinding>) {
        self.imports.extend(bindings);
    }

    pub fn set_components(&mut self, bindings: Vec<ComponentBinding>) {
        self.components = bindings;
    }

    /// First import binding whose alias-or-name equals `name`.
    pub fn find_import(&self, name: &str) -> Option<&ImportBinding> {
        self.imports.iter().find(|b| b.lookup_key() == name)
    }

    /// First component binding with `name` among its lookup names.
    pub fn find_component(&self, name: &str) -> Option<&ComponentBinding> {
        self.components
            .iter()
            .find(|b| b.lookup_names.iter().any(|n| n == name))
    }
}
