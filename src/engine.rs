//! The completion engine facade.
//!
//! Hosts own one [`CompletionEngine`] per editing session, push metadata into
//! its symbol tables and extension catalog, and call [`CompletionEngine::classify`]
//! with the text before the cursor on every completion request. Classification
//! is a pure read: the per-pass alias and event-reference maps are rebuilt on
//! each call and handed back inside the [`Classification`] instead of being
//! stored on the engine.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::extensions::ExtensionCatalog;
use crate::handlers::{self, GeneratorContext};
use crate::rules::{self, Action, IDENT};
use crate::scratch::ScratchResolver;
use crate::symbols::SymbolTables;
use crate::types::{make, Suggestion};

static WS_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// Prefix shapes after which a new statement may start.
static BEGINNING_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let name = format!(r"{IDENT}(\.{IDENT})*");
    let element = format!(r#"({name}\s*=\s*)?["'].+["']"#);
    let annotation_body = format!(r"{name}\s*\(\s*{element}(\s*,\s*{element})*\s*\)\s*\S*$");
    vec![
        Regex::new(r"(?i);\s+\S*$").unwrap(),
        Regex::new(&format!(r"(?i)@\s*{annotation_body}")).unwrap(),
        Regex::new(&format!(r"(?i)@\s*plan\s*:\s*{annotation_body}")).unwrap(),
        Regex::new(r"(?i)\*/\s*\S*$").unwrap(),
        Regex::new(r"(?i)--.*\s+\S*$").unwrap(),
        Regex::new(r"(?i)begin\s*\S*$").unwrap(),
        Regex::new(r"^\s*$").unwrap(),
        Regex::new(r"^\s*\S*$").unwrap(),
    ]
});

/// True when the cursor sits where a new statement may begin: the rest of the
/// cursor's line is blank and the preceding text ends a statement, an
/// annotation, a comment, a `begin`, or is a single half-typed word.
pub fn is_statement_beginning(text: &str, cursor: usize) -> bool {
    let cursor = cursor.min(text.len());
    if !text.is_char_boundary(cursor) {
        return false;
    }
    let (prefix, rest) = text.split_at(cursor);
    let line_rest = rest.split('\n').next().unwrap_or("");
    if !line_rest.trim().is_empty() {
        return false;
    }
    BEGINNING_RES.iter().any(|re| re.is_match(prefix))
}

/// True when the text before the cursor ends in a dot or namespace operator,
/// meaning only symbol-resolved suggestions make sense. Hosts use this to
/// suppress their generic keyword sources.
pub fn resolves_symbol(text: &str) -> bool {
    text.ends_with('.') || text.ends_with(':')
}

/// One classification result: ranked suggestions plus the scratch maps the
/// pass derived, returned by value so the engine stays stateless between
/// calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    pub suggestions: Vec<Suggestion>,
    pub aliases: BTreeMap<String, String>,
    pub event_refs: BTreeMap<String, String>,
}

/// Context-aware completion engine for one editing session.
#[derive(Debug, Clone, Default)]
pub struct CompletionEngine {
    pub symbols: SymbolTables,
    pub catalog: ExtensionCatalog,
}

impl CompletionEngine {
    pub fn new() -> Self {
        CompletionEngine::default()
    }

    /// Classify the context before the cursor and produce suggestions.
    ///
    /// `before_cursor` is everything from the start of the document to the
    /// cursor. Malformed or half-typed input never fails; it just narrows the
    /// suggestion list.
    pub fn classify(&self, before_cursor: &str) -> Classification {
        let statement = before_cursor.rsplit(';').next().unwrap_or(before_cursor);
        let normalized = WS_RUN.replace_all(statement, " ");
        debug!(input = %normalized, "classifying trailing statement");

        let scratch = ScratchResolver::rebuild(&normalized, &self.symbols);

        let mut suggestions = if is_statement_beginning(before_cursor, before_cursor.len()) {
            handlers::initial_list()
        } else {
            Vec::new()
        };

        if let Some((index, rule)) = rules::first_match(&normalized) {
            let ctx = GeneratorContext {
                text: &normalized,
                symbols: &self.symbols,
                catalog: &self.catalog,
                scratch: &scratch,
            };
            suggestions = match &rule.action {
                Action::Keywords { words, category } => make(*words, 1, *category),
                Action::Generate(kind) => handlers::generate(*kind, &ctx),
            };
            debug!(rule = index, count = suggestions.len(), "rule matched");
        } else {
            debug!(count = suggestions.len(), "no rule matched");
        }

        Classification {
            suggestions,
            aliases: scratch.aliases,
            event_refs: scratch.event_refs,
        }
    }

    /// Suggestions only, for hosts that do not need the scratch maps.
    pub fn suggest(&self, before_cursor: &str) -> Vec<Suggestion> {
        self.classify(before_cursor).suggestions
    }
}
