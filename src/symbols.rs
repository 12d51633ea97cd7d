//! Symbol tables for streams, tables and user-defined functions.
//!
//! These are pure data containers populated by the host whenever a statement
//! fully parses or a server validation response arrives. Every suggestion
//! handler reads them; lookups of unknown names return empty results so the
//! classifier can run over incomplete input without failing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{AttrType, Attribute};

/// A stream definition with an ordered attribute schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDef {
    pub id: String,
    pub attributes: Vec<Attribute>,
}

impl StreamDef {
    pub fn new(id: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        StreamDef {
            id: id.into(),
            attributes,
        }
    }

    /// Convenience constructor for fully typed schemas.
    pub fn with_attributes(id: impl Into<String>, attrs: &[(&str, AttrType)]) -> Self {
        StreamDef::new(
            id,
            attrs
                .iter()
                .map(|(name, ty)| Attribute::typed(*name, *ty))
                .collect(),
        )
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }
}

/// A table definition. Identical shape to [`StreamDef`] but registered in a
/// disjoint namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    pub id: String,
    pub attributes: Vec<Attribute>,
}

impl TableDef {
    pub fn new(id: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        TableDef {
            id: id.into(),
            attributes,
        }
    }

    pub fn with_attributes(id: impl Into<String>, attrs: &[(&str, AttrType)]) -> Self {
        TableDef::new(
            id,
            attrs
                .iter()
                .map(|(name, ty)| Attribute::typed(*name, *ty))
                .collect(),
        )
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }
}

/// A `define function` script definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub id: String,
    pub language: String,
    pub return_type: AttrType,
    pub body: String,
}

/// Registry of every named entity the classifier can resolve against.
#[derive(Debug, Clone, Default)]
pub struct SymbolTables {
    streams: BTreeMap<String, StreamDef>,
    tables: BTreeMap<String, TableDef>,
    functions: BTreeMap<String, FunctionDef>,
}

impl SymbolTables {
    pub fn new() -> Self {
        SymbolTables::default()
    }

    pub fn add_stream(&mut self, def: StreamDef) {
        self.streams.insert(def.id.clone(), def);
    }

    pub fn add_table(&mut self, def: TableDef) {
        self.tables.insert(def.id.clone(), def);
    }

    pub fn add_function(&mut self, def: FunctionDef) {
        self.functions.insert(def.id.clone(), def);
    }

    /// Register a stream inferred from an `insert into <target>` output
    /// clause. Only applies when the target is not already a known stream or
    /// table; the inferred attributes carry no type information.
    pub fn infer_stream(&mut self, target: &str, attribute_names: Vec<String>) {
        if self.streams.contains_key(target) || self.tables.contains_key(target) {
            return;
        }
        let attributes = attribute_names.into_iter().map(Attribute::untyped).collect();
        self.add_stream(StreamDef::new(target, attributes));
    }

    /// Drop every definition (new document load).
    pub fn clear(&mut self) {
        self.streams.clear();
        self.tables.clear();
        self.functions.clear();
    }

    pub fn has_stream(&self, id: &str) -> bool {
        self.streams.contains_key(id)
    }

    pub fn has_table(&self, id: &str) -> bool {
        self.tables.contains_key(id)
    }

    pub fn stream(&self, id: &str) -> Option<&StreamDef> {
        self.streams.get(id)
    }

    pub fn streams(&self) -> impl Iterator<Item = &StreamDef> {
        self.streams.values()
    }

    pub fn stream_ids(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }

    pub fn table_ids(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn function_ids(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Attribute names of a stream, empty when the stream is unknown.
    pub fn stream_attributes(&self, id: &str) -> Vec<&str> {
        self.streams
            .get(id)
            .map(|s| s.attribute_names().collect())
            .unwrap_or_default()
    }

    /// Attribute names of a table, empty when the table is unknown.
    pub fn table_attributes(&self, id: &str) -> Vec<&str> {
        self.tables
            .get(id)
            .map(|t| t.attribute_names().collect())
            .unwrap_or_default()
    }

    /// Streams that declare an attribute with the given name.
    pub fn streams_with_attribute(&self, name: &str) -> Vec<&str> {
        self.streams
            .values()
            .filter(|s| s.has_attribute(name))
            .map(|s| s.id.as_str())
            .collect()
    }
}
