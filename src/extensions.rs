//! Extension and built-in processor catalogs.
//!
//! Namespaced extension artifacts (functions, stream processors, window
//! processors) are pushed once per session from server metadata as JSON and
//! are read-only during classification. The `system` table holds the built-in
//! artifacts offered without a namespace qualifier.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::MetadataResult;

/// One overload of an extension function or processor.
///
/// `arg_types` lists the alternative types accepted per argument position;
/// `return_type` lists the alternative return types.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverloadDescriptor {
    #[serde(alias = "Description")]
    pub description: Option<String>,
    pub arg_names: Vec<String>,
    pub arg_types: Vec<Vec<String>>,
    pub return_type: Vec<String>,
}

/// Artifact kinds an extension namespace may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Function,
    StreamProcessor,
    WindowProcessor,
}

/// The artifacts registered under one namespace.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamespaceEntry {
    pub functions: BTreeMap<String, Vec<OverloadDescriptor>>,
    pub stream_processors: BTreeMap<String, Vec<OverloadDescriptor>>,
    pub window_processors: BTreeMap<String, Vec<OverloadDescriptor>>,
}

impl NamespaceEntry {
    fn members(&self, kind: ArtifactKind) -> &BTreeMap<String, Vec<OverloadDescriptor>> {
        match kind {
            ArtifactKind::Function => &self.functions,
            ArtifactKind::StreamProcessor => &self.stream_processors,
            ArtifactKind::WindowProcessor => &self.window_processors,
        }
    }

    fn has(&self, kind: ArtifactKind) -> bool {
        !self.members(kind).is_empty()
    }
}

/// Extension namespaces plus the built-in (`system`) artifact table.
#[derive(Debug, Clone, Default)]
pub struct ExtensionCatalog {
    extensions: BTreeMap<String, NamespaceEntry>,
    system: NamespaceEntry,
}

impl ExtensionCatalog {
    pub fn new() -> Self {
        ExtensionCatalog::default()
    }

    /// Replace the extension namespaces wholesale.
    pub fn set_extensions(&mut self, extensions: BTreeMap<String, NamespaceEntry>) {
        self.extensions = extensions;
    }

    /// Load the extension namespaces from the JSON document the session
    /// metadata service publishes.
    pub fn load_extensions_json(&mut self, json: &str) -> MetadataResult<()> {
        self.extensions = serde_json::from_str(json)?;
        Ok(())
    }

    /// Replace the built-in artifact table.
    pub fn set_system(&mut self, system: NamespaceEntry) {
        self.system = system;
    }

    /// Namespaces owning at least one artifact of any of the given kinds.
    /// An empty kind list matches every namespace.
    pub fn namespaces_with(&self, kinds: &[ArtifactKind]) -> Vec<&str> {
        self.extensions
            .iter()
            .filter(|(_, entry)| kinds.is_empty() || kinds.iter().any(|k| entry.has(*k)))
            .map(|(ns, _)| ns.as_str())
            .collect()
    }

    /// Member names of the given kind in a namespace, empty when the
    /// namespace is unknown.
    pub fn members_of(&self, ns: &str, kind: ArtifactKind) -> Vec<&str> {
        self.extensions
            .get(ns)
            .map(|entry| entry.members(kind).keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Names of the built-in functions.
    pub fn system_function_names(&self) -> Vec<&str> {
        self.system.functions.keys().map(String::as_str).collect()
    }
}
