//! # StreamQL Completion
//!
//! A context-aware completion engine for a streaming-query DSL.
//!
//! ## Architecture
//!
//! The engine never parses the document. It classifies the text before the
//! cursor against an ordered rule base and generates ranked suggestions from
//! session metadata:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            Text before cursor (maybe invalid)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [normalize: last statement, collapse whitespace]
//! ┌─────────────────────────────────────────────────────────┐
//! │      ScratchResolver (aliases + event references)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [rules: ordered, first match wins]
//! ┌─────────────────────────────────────────────────────────┐
//! │        ContextKind  or  static keyword list              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [handlers: symbols + extension catalog]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Classification (ranked suggestions + scratch maps)   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Hosts populate [`SymbolTables`] and [`ExtensionCatalog`] from whatever
//! metadata channel they have, then call [`CompletionEngine::classify`] on
//! each completion request.

pub mod engine;
pub mod error;
pub mod extensions;
mod handlers;
pub mod rules;
pub mod scratch;
pub mod symbols;
pub mod types;

pub use engine::{is_statement_beginning, resolves_symbol, Classification, CompletionEngine};
pub use error::{MetadataError, MetadataResult};
pub use extensions::{ArtifactKind, ExtensionCatalog, NamespaceEntry, OverloadDescriptor};
pub use rules::{has_open_filter_bracket, ContextKind};
pub use scratch::ScratchResolver;
pub use symbols::{FunctionDef, StreamDef, SymbolTables, TableDef};
pub use types::{AttrType, Attribute, Suggestion, SuggestionCategory};
