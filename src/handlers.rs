//! Suggestion generators for the metadata-driven contexts.
//!
//! Each [`ContextKind`] maps to one generator. Generators read the symbol
//! tables, the extension catalog and the per-pass scratch maps; they never
//! mutate anything. Ranks are handler-local grouping priorities carried over
//! to the host, and the emission order within a generator is part of the
//! contract.

use std::sync::LazyLock;

use regex::Regex;

use crate::extensions::{ArtifactKind, ExtensionCatalog};
use crate::rules::{ContextKind, IDENT, LOGICAL_OPERATORS};
use crate::scratch::{from_fragment, ScratchResolver};
use crate::symbols::SymbolTables;
use crate::types::{make, Suggestion, SuggestionCategory};

/// Built-in window signatures offered after `#window.`.
const WINDOW_SIGNATURES: &[&str] = &[
    "time(windowTime)",
    "timeBatch(windowTime)",
    "timeBatch(windowTime, startTime)",
    "length(windowLength)",
    "lengthBatch(windowLength)",
    "externalTime(timeStamp, windowTime)",
    "cron(cronExpression)",
    "firstUnique(attribute)",
    "unique(attribute)",
    "sort(windowLength)",
    "sort(windowLength, attribute, order)",
    "frequent(eventCount)",
    "frequent(eventCount, attribute)",
    "lossyFrequent(supportThreshold, errorBound)",
    "lossyFrequent(supportThreshold, errorBound, attribute)",
    "externalTimeBatch(timeStamp, windowTime, startTime, timeOut)",
    "timeLength(windowTime, windowLength)",
    "uniqueExternalTimeBatch(attribute, timeStamp, windowTime, startTime, timeout, replaceTimestampWithBatchEndTime)",
];

static FROM_SELECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)from(.*)select").unwrap());
static FROM_GROUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)from(.*)group").unwrap());
static FROM_HAVING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)from(.*)having").unwrap());
static FROM_UD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)from(.*)(update|delete)").unwrap());
static UD_ON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(update|delete)(.*)on").unwrap());
static TRAILING_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)$").unwrap());
static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)\.$").unwrap());
static INDEXED_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\w+)\[\s*(\d+|last|last-\d+)\s*\]\.$").unwrap());
static WINDOW_NS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)#window\.(\w+):$").unwrap());
static STREAM_NS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)#(\w+):$").unwrap());
static FUNCTION_NS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\w+):$").unwrap());
static PARTITION_OF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"({IDENT})\s+of\s+\w*$")).unwrap());

/// Read-only view handed to every generator.
pub(crate) struct GeneratorContext<'a> {
    /// Normalized trailing statement text before the cursor.
    pub text: &'a str,
    pub symbols: &'a SymbolTables,
    pub catalog: &'a ExtensionCatalog,
    pub scratch: &'a ScratchResolver,
}

/// Suggestions seeded when the cursor sits at a statement beginning.
pub(crate) fn initial_list() -> Vec<Suggestion> {
    make(["define", "from", "partition", "@"], 1, SuggestionCategory::Keyword)
}

pub(crate) fn generate(kind: ContextKind, ctx: &GeneratorContext) -> Vec<Suggestion> {
    match kind {
        ContextKind::TableIds => table_ids(ctx),
        ContextKind::WindowPhrase => window_phrase(ctx),
        ContextKind::NamespacePhrase => namespace_phrase(ctx),
        ContextKind::IndexedEventReference => indexed_event_reference(ctx),
        ContextKind::ResolveVariable => resolve_variable(ctx),
        ContextKind::ProcessorPhrase => processor_phrase(ctx),
        ContextKind::UpdateDeletePhrase => update_delete_phrase(ctx),
        ContextKind::UpdateDeleteCondition => update_delete_condition(ctx),
        ContextKind::PartitionAttributes => partition_attributes(ctx),
        ContextKind::PartitionStreams => partition_streams(ctx),
        ContextKind::Having => having(ctx),
        ContextKind::GroupBy => group_by(ctx),
        ContextKind::FilterPhrase => filter_phrase(ctx),
        ContextKind::FromStreamIds => from_stream_ids(ctx),
        ContextKind::SelectAttributes => select_attributes(ctx),
    }
}

/// Word-boundary-safe containment check for a stream or table id inside a
/// clause fragment. Case-sensitive on purpose: ids are case-sensitive even
/// though keywords are not.
fn mentions(fragment: &str, id: &str) -> bool {
    let pattern = format!("[^a-zA-Z]{}[^a-zA-Z0-9]", regex::escape(id));
    Regex::new(&pattern).map(|re| re.is_match(fragment)).unwrap_or(false)
}

/// Stream ids mentioned in the given clause fragment, in registration order.
fn referenced_stream_ids<'a>(fragment: &str, symbols: &'a SymbolTables) -> Vec<&'a str> {
    symbols
        .stream_ids()
        .filter(|id| mentions(fragment, id))
        .collect()
}

fn suffixed<'a, I>(items: I, suffix: &str, rank: u8, category: SuggestionCategory) -> Vec<Suggestion>
where
    I: IntoIterator<Item = &'a str>,
{
    items
        .into_iter()
        .map(|item| Suggestion::new(format!("{item}{suffix}"), rank, category))
        .collect()
}

fn table_ids(ctx: &GeneratorContext) -> Vec<Suggestion> {
    make(ctx.symbols.table_ids(), 1, SuggestionCategory::Table)
}

fn from_stream_ids(ctx: &GeneratorContext) -> Vec<Suggestion> {
    let keywords = [
        "output",
        "outer",
        "inner",
        "left",
        "unidirectional",
        "all",
        "events",
        "insert",
        "delete",
        "update",
        "select",
        "as",
        "join",
        "on",
        "every",
        "group by",
        "having",
        "within",
    ];

    let mut list = make(keywords, 2, SuggestionCategory::Keyword);
    list.extend(suffixed(
        ctx.scratch.aliases.keys().map(String::as_str),
        ".",
        5,
        SuggestionCategory::Alias,
    ));
    list.extend(make(ctx.symbols.stream_ids(), 3, SuggestionCategory::Stream));
    list.extend(suffixed(
        ctx.scratch.event_refs.keys().map(String::as_str),
        ".",
        4,
        SuggestionCategory::EventReference,
    ));
    list
}

fn select_attributes(ctx: &GeneratorContext) -> Vec<Suggestion> {
    let keywords = ["as", "insert", "group by", "having", "output", "update", "delete"];
    let from_phrase = FROM_SELECT_RE
        .captures(ctx.text)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str());
    let referenced = referenced_stream_ids(from_phrase, ctx.symbols);

    let mut list = make(keywords, 1, SuggestionCategory::Keyword);
    list.extend(suffixed(
        ctx.catalog.namespaces_with(&[ArtifactKind::Function]),
        ":",
        3,
        SuggestionCategory::Namespace,
    ));
    list.extend(suffixed(referenced.iter().copied(), ".", 5, SuggestionCategory::Stream));
    list.extend(suffixed(ctx.symbols.table_ids(), ".", 4, SuggestionCategory::Table));
    list.extend(suffixed(
        ctx.scratch.event_refs.keys().map(String::as_str),
        ".",
        7,
        SuggestionCategory::EventReference,
    ));
    list.extend(suffixed(
        ctx.scratch.aliases.keys().map(String::as_str),
        ".",
        6,
        SuggestionCategory::Alias,
    ));
    list.extend(suffixed(
        ctx.catalog.system_function_names(),
        "(args)",
        2,
        SuggestionCategory::Function,
    ));
    for id in referenced {
        list.extend(make(
            ctx.symbols.stream_attributes(id),
            8,
            SuggestionCategory::Attribute,
        ));
    }
    list
}

fn window_phrase(ctx: &GeneratorContext) -> Vec<Suggestion> {
    let mut list = make(WINDOW_SIGNATURES, 1, SuggestionCategory::Processor);
    list.extend(suffixed(
        ctx.catalog.namespaces_with(&[ArtifactKind::WindowProcessor]),
        ":",
        1,
        SuggestionCategory::Namespace,
    ));
    list
}

fn processor_phrase(ctx: &GeneratorContext) -> Vec<Suggestion> {
    let mut list = make(["window."], 2, SuggestionCategory::Keyword);
    list.extend(suffixed(
        ctx.catalog
            .namespaces_with(&[ArtifactKind::WindowProcessor, ArtifactKind::StreamProcessor]),
        ":",
        1,
        SuggestionCategory::Namespace,
    ));
    list
}

/// `#window.ns:` lists window processors, `#ns:` stream processors and a
/// bare `ns:` extension functions; the most specific prefix wins.
fn namespace_phrase(ctx: &GeneratorContext) -> Vec<Suggestion> {
    let (members, category) = if let Some(caps) = WINDOW_NS_RE.captures(ctx.text) {
        (
            ctx.catalog
                .members_of(caps.get(1).map_or("", |m| m.as_str()), ArtifactKind::WindowProcessor),
            SuggestionCategory::Processor,
        )
    } else if let Some(caps) = STREAM_NS_RE.captures(ctx.text) {
        (
            ctx.catalog
                .members_of(caps.get(1).map_or("", |m| m.as_str()), ArtifactKind::StreamProcessor),
            SuggestionCategory::Processor,
        )
    } else if let Some(caps) = FUNCTION_NS_RE.captures(ctx.text) {
        (
            ctx.catalog
                .members_of(caps.get(1).map_or("", |m| m.as_str()), ArtifactKind::Function),
            SuggestionCategory::Function,
        )
    } else {
        return Vec::new();
    };
    suffixed(members, "(argList)", 1, category)
}

fn indexed_event_reference(ctx: &GeneratorContext) -> Vec<Suggestion> {
    let Some(caps) = INDEXED_REF_RE.captures(ctx.text) else {
        return Vec::new();
    };
    let name = caps.get(1).map_or("", |m| m.as_str());
    let Some(stream) = ctx.scratch.event_refs.get(name) else {
        return Vec::new();
    };
    make(
        ctx.symbols.stream_attributes(stream),
        1,
        SuggestionCategory::Attribute,
    )
}

/// Attributes of whatever `x.` resolves to: tables shadow event references,
/// which shadow aliases, which shadow plain stream ids.
fn resolve_variable(ctx: &GeneratorContext) -> Vec<Suggestion> {
    let Some(caps) = VARIABLE_RE.captures(ctx.text) else {
        return Vec::new();
    };
    let name = caps.get(1).map_or("", |m| m.as_str());
    if ctx.symbols.has_table(name) {
        return make(ctx.symbols.table_attributes(name), 1, SuggestionCategory::Attribute);
    }
    let resolved = ctx.scratch.resolve(name);
    make(
        ctx.symbols.stream_attributes(resolved),
        1,
        SuggestionCategory::Attribute,
    )
}

fn filter_phrase(ctx: &GeneratorContext) -> Vec<Suggestion> {
    // A half-typed event reference directly under the cursor only needs the
    // `last` index keyword.
    if let Some(caps) = TRAILING_WORD_RE.captures(ctx.text) {
        let token = caps.get(1).map_or("", |m| m.as_str());
        if ctx.scratch.event_refs.contains_key(token) {
            return make(["last"], 2, SuggestionCategory::Keyword);
        }
    }

    let fragment = from_fragment(ctx.text).unwrap_or("");
    let owner = bracket_base_token(fragment);

    let mut list = make(LOGICAL_OPERATORS, 1, SuggestionCategory::Keyword);
    list.extend(make(
        ctx.scratch.event_refs.keys(),
        2,
        SuggestionCategory::EventReference,
    ));
    list.extend(make(
        ctx.symbols.stream_attributes(&owner),
        3,
        SuggestionCategory::Attribute,
    ));
    list
}

/// The identifier immediately left of the innermost unclosed `[`, found by a
/// right-to-left scan that skips balanced bracket pairs.
fn bracket_base_token(fragment: &str) -> String {
    let mut depth = -1i32;
    let mut collected = Vec::new();
    for c in fragment.chars().rev() {
        if depth == 0 {
            if c.is_alphanumeric() || c == '_' {
                collected.push(c);
            } else if !collected.is_empty() {
                break;
            }
        }
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            _ => {}
        }
    }
    collected.into_iter().rev().collect()
}

fn group_by(ctx: &GeneratorContext) -> Vec<Suggestion> {
    let keywords = ["output", "having", "insert", "delete", "update"];
    let from_phrase = FROM_GROUP_RE
        .captures(ctx.text)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str());

    let mut list = make(keywords, 1, SuggestionCategory::Keyword);
    list.extend(suffixed(ctx.symbols.stream_ids(), ".", 2, SuggestionCategory::Stream));
    for id in referenced_stream_ids(from_phrase, ctx.symbols) {
        list.extend(make(
            ctx.symbols.stream_attributes(id),
            3,
            SuggestionCategory::Attribute,
        ));
    }
    list
}

fn having(ctx: &GeneratorContext) -> Vec<Suggestion> {
    let keywords = ["output", "insert", "delete", "update"];
    let from_phrase = FROM_HAVING_RE
        .captures(ctx.text)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str());

    let mut list = make(
        keywords.iter().copied().chain(LOGICAL_OPERATORS.iter().copied()),
        2,
        SuggestionCategory::Keyword,
    );
    list.extend(suffixed(
        ctx.catalog.namespaces_with(&[ArtifactKind::Function]),
        ":",
        3,
        SuggestionCategory::Namespace,
    ));
    list.extend(suffixed(
        ctx.catalog.system_function_names(),
        "(args)",
        1,
        SuggestionCategory::Function,
    ));
    list.extend(suffixed(ctx.symbols.stream_ids(), ".", 4, SuggestionCategory::Stream));
    for id in referenced_stream_ids(from_phrase, ctx.symbols) {
        list.extend(make(
            ctx.symbols.stream_attributes(id),
            5,
            SuggestionCategory::Attribute,
        ));
    }
    list
}

fn update_delete_phrase(ctx: &GeneratorContext) -> Vec<Suggestion> {
    let mut list = make(["for", "on"], 1, SuggestionCategory::Keyword);
    list.extend(make(ctx.symbols.table_ids(), 2, SuggestionCategory::Table));
    list
}

fn update_delete_condition(ctx: &GeneratorContext) -> Vec<Suggestion> {
    let from_phrase = FROM_UD_RE
        .captures(ctx.text)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str());
    let ud_phrase = UD_ON_RE
        .captures(ctx.text)
        .and_then(|caps| caps.get(2))
        .map_or("", |m| m.as_str());

    let referenced = referenced_stream_ids(from_phrase, ctx.symbols);
    let tables: Vec<&str> = ctx
        .symbols
        .table_ids()
        .filter(|id| mentions(ud_phrase, id))
        .collect();

    let mut list = suffixed(tables, ".", 4, SuggestionCategory::Table);
    for id in &referenced {
        list.extend(make(
            ctx.symbols.stream_attributes(id),
            3,
            SuggestionCategory::Attribute,
        ));
    }
    list.extend(suffixed(referenced, ".", 2, SuggestionCategory::Stream));
    list.extend(make(
        ["IS NULL", "NOT", "AND", "OR"],
        1,
        SuggestionCategory::Keyword,
    ));
    list
}

/// Every stream's attributes, ranked by the stream's registration index so
/// each schema stays grouped.
fn partition_attributes(ctx: &GeneratorContext) -> Vec<Suggestion> {
    let mut list = Vec::new();
    for (index, stream) in ctx.symbols.streams().enumerate() {
        let rank = u8::try_from(index).unwrap_or(u8::MAX);
        list.extend(make(
            stream.attribute_names(),
            rank,
            SuggestionCategory::Attribute,
        ));
    }
    list
}

fn partition_streams(ctx: &GeneratorContext) -> Vec<Suggestion> {
    let Some(caps) = PARTITION_OF_RE.captures(ctx.text) else {
        return Vec::new();
    };
    let attribute = caps.get(1).map_or("", |m| m.as_str());
    make(
        ctx.symbols.streams_with_attribute(attribute),
        1,
        SuggestionCategory::Stream,
    )
}
