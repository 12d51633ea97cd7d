//! The ordered context-identification rule base.
//!
//! Each rule pairs a matcher with the action taken when it fires. Rules are
//! evaluated top to bottom over the normalized trailing statement and the
//! first match wins, so declaration order is load-bearing: narrow contexts
//! (annotations, namespaces, filters) sit above the broad FROM/SELECT rules.
//!
//! Several contexts are "section" shaped: an anchor keyword followed by a
//! stretch of text that must not contain any later clause keyword. Those are
//! expressed as a shape regex with a named `sec` capture plus a guard regex
//! that must not match inside the capture. A leading greedy `.*` in the shape
//! binds the anchor to its rightmost occurrence, which minimizes the captured
//! section; a clean minimal section is equivalent to a clean section existing
//! at any anchor occurrence.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::SuggestionCategory;

/// Identifier syntax of the DSL.
pub(crate) const IDENT: &str = "[a-zA-Z_][a-zA-Z_0-9]*";

/// Operators offered inside filters and HAVING conditions.
pub(crate) const LOGICAL_OPERATORS: &[&str] =
    &["IN", "AND", "OR", "NOT", "isNull(arg)", "IS NULL", "CONTAINS"];

/// Schema type keywords offered in definition statements.
pub(crate) const DATA_TYPES: &[&str] =
    &["int", "float", "double", "bool", "time", "object", "string", "long"];

const PLAN_ANNOTATIONS: &[&str] = &[
    "Plan:name('Name of the plan')",
    "Plan:description('Description of the plan')",
    "Plan:trace('true|false')",
    "Plan:statistics('true|false')",
    "Import('StreamName')",
    "Export('StreamName')",
];

const GENERAL_ANNOTATIONS: &[&str] = &[
    "Config(async=true)",
    "info(name='stream_id')",
    "Plan:name('Name of the plan')",
    "Plan:description('Description of the plan')",
    "Plan:trace('true|false')",
    "Plan:statistics('true|false')",
    "Import('StreamName')",
    "Export('StreamName')",
];

// Clause keywords that terminate each section kind.
const INPUT_GUARD: &str = r"(?i)select|output|insert|delete|update|having|group\s+by";
const SECTION_GUARD: &str = r"(?i)output|insert|delete|update";
const RATE_GUARD: &str = r"(?i)every|insert|delete|update";
const RATE_EVERY_GUARD: &str = r"(?i)insert|delete|update";

/// Contexts whose suggestions depend on the registered metadata. Each kind
/// has one generator in the handlers module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    TableIds,
    WindowPhrase,
    NamespacePhrase,
    IndexedEventReference,
    ResolveVariable,
    ProcessorPhrase,
    UpdateDeletePhrase,
    UpdateDeleteCondition,
    PartitionAttributes,
    PartitionStreams,
    Having,
    GroupBy,
    FilterPhrase,
    FromStreamIds,
    SelectAttributes,
}

/// How a rule recognizes its context.
#[derive(Debug)]
pub enum Matcher {
    /// `shape` must match; when a guard is present, the `sec` capture of the
    /// shape must not contain a guard match.
    Pattern { shape: Regex, guard: Option<Regex> },
    /// Cursor sits inside an unclosed `[` of the trailing FROM clause.
    /// Nested brackets put this out of reach of a single regex.
    OpenFilterBracket,
}

/// What a matching rule produces.
#[derive(Debug)]
pub enum Action {
    /// A fixed word list, all at rank 1.
    Keywords {
        words: &'static [&'static str],
        category: SuggestionCategory,
    },
    /// A metadata-driven generator.
    Generate(ContextKind),
}

#[derive(Debug)]
pub struct Rule {
    pub matcher: Matcher,
    pub action: Action,
}

impl Rule {
    pub fn matches(&self, text: &str) -> bool {
        match &self.matcher {
            Matcher::Pattern { shape, guard: None } => shape.is_match(text),
            Matcher::Pattern {
                shape,
                guard: Some(guard),
            } => match shape.captures(text) {
                Some(caps) => caps
                    .name("sec")
                    .map_or(true, |sec| !guard.is_match(sec.as_str())),
                None => false,
            },
            Matcher::OpenFilterBracket => has_open_filter_bracket(text),
        }
    }
}

/// True when the trailing FROM clause has a `[` that is still unclosed at the
/// cursor, scanning right to left so that an orphan `]` never cancels a later
/// `[`.
pub fn has_open_filter_bracket(text: &str) -> bool {
    let Some(fragment) = crate::scratch::from_fragment(text) else {
        return false;
    };
    let mut depth = 0i32;
    for c in fragment.chars().rev() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            _ => {}
        }
        if depth > 0 {
            return true;
        }
    }
    false
}

fn keywords(
    shape: &str,
    guard: Option<&str>,
    words: &'static [&'static str],
    category: SuggestionCategory,
) -> Rule {
    Rule {
        matcher: pattern(shape, guard),
        action: Action::Keywords { words, category },
    }
}

fn generate(shape: &str, guard: Option<&str>, kind: ContextKind) -> Rule {
    Rule {
        matcher: pattern(shape, guard),
        action: Action::Generate(kind),
    }
}

fn pattern(shape: &str, guard: Option<&str>) -> Matcher {
    Matcher::Pattern {
        shape: Regex::new(shape).unwrap(),
        guard: guard.map(|g| Regex::new(g).unwrap()),
    }
}

/// The rule base, in evaluation order.
pub static RULE_BASE: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    use ContextKind::*;
    use SuggestionCategory::{Annotation, Keyword, Type};

    vec![
        keywords(
            r"(?i)@(p(l(a(n)?)?)?)[^)]*$",
            None,
            PLAN_ANNOTATIONS,
            Annotation,
        ),
        keywords(r"(?i)@\w*[^)]*$", None, GENERAL_ANNOTATIONS, Annotation),
        generate(r"(?i)\s+in\s+$", None, TableIds),
        generate(
            r"(?i).*from\s+(?P<sec>.*)#window\.$",
            Some(INPUT_GUARD),
            WindowPhrase,
        ),
        generate(
            r"(?i).*from\s+(?P<sec>.*?)#.+:$",
            Some(INPUT_GUARD),
            NamespacePhrase,
        ),
        generate(r"(?i)(\w+):$", None, NamespacePhrase),
        generate(
            r"(?i)(\w+)\[\s*(\d+|last|last-\d+)\s*\]\.$",
            None,
            IndexedEventReference,
        ),
        generate(r"(?i)(\w+)\.$", None, ResolveVariable),
        generate(
            r"(?i).*from\s+(?P<sec>.*?)#\w*$",
            Some(INPUT_GUARD),
            ProcessorPhrase,
        ),
        keywords(
            r"(?i).*insert\s+(?P<sec>.*)$",
            Some("(?i)into|;"),
            &["into", "events", "all", "current", "expired"],
            Keyword,
        ),
        generate(r"(?i)insert.*into[^;]*$", None, TableIds),
        generate(
            r"(?i).*from.*(delete|update)(?P<sec>.*)$",
            Some("(?i)on|for"),
            UpdateDeletePhrase,
        ),
        keywords(
            &format!(r"(?i).*from.*(delete|update)\s+{IDENT}\s+for(?P<sec>.*)$"),
            Some("(?i)on"),
            &["all", "current", "expired", "events", "on"],
            Keyword,
        ),
        generate(
            &format!(r"(?i)from.*(delete|update)\s+({IDENT}).*on.*$"),
            None,
            UpdateDeleteCondition,
        ),
        keywords(r"(?i)partition\s+$", None, &["with"], Keyword),
        generate(
            &format!(r"(?i)partition\s+with\s+\((\s*{IDENT}\s+of\s+{IDENT}\s*,)*\s*$"),
            None,
            PartitionAttributes,
        ),
        keywords(
            &format!(r"(?i)partition\s+with\s+\((\s*{IDENT}\s+of\s+{IDENT}\s*,)*\s*{IDENT}\s+$"),
            None,
            &["of"],
            Keyword,
        ),
        generate(
            &format!(
                r"(?i)partition\s+with\s+\((\s*{IDENT}\s+of\s+{IDENT}\s*,)*\s*{IDENT}\s+of\s+$"
            ),
            None,
            PartitionStreams,
        ),
        keywords(
            r"(?i).*define\s*(?P<sec>.*)$",
            Some("(?i)stream|table|function"),
            &["stream", "table", "function"],
            Keyword,
        ),
        keywords(
            &format!(r"(?i)define\s+function\s+{IDENT}\s+$"),
            None,
            &["[language_name]"],
            Keyword,
        ),
        keywords(
            &format!(r"(?i)define\s+function\s+{IDENT}\s+\[\s*\w+\s*\]\s+$"),
            None,
            &["return"],
            Keyword,
        ),
        keywords(
            &format!(r"(?i)define\s+function\s+{IDENT}\s+\[\s*\w+\s*\]\s+return\s+$"),
            None,
            DATA_TYPES,
            Type,
        ),
        keywords(
            &format!(
                r"(?i)define\s+function\s+{IDENT}\s+\[\s*\w+\s*\]\s+return\s+(int|long|double|bool|object|string|time)\s+$"
            ),
            None,
            &["{ \"Function Body\" }"],
            Keyword,
        ),
        keywords(
            &format!(
                r"(?i)define\s+(stream|table)\s+{IDENT}\s*\((\s*{IDENT}\s+\w+\s*,)*\s*{IDENT}\s+(?P<sec>.*)$"
            ),
            Some("(?i)int|string|float|object|time|bool|,|;"),
            DATA_TYPES,
            Type,
        ),
        generate(
            r"(?i).*from.*having(?P<sec>.*)$",
            Some(SECTION_GUARD),
            Having,
        ),
        generate(
            r"(?i).*from.*group\s+by\s+(?P<sec>.*)$",
            Some(SECTION_GUARD),
            GroupBy,
        ),
        generate(r"(?i)from.*\[[^\]]*$", None, FilterPhrase),
        Rule {
            matcher: Matcher::OpenFilterBracket,
            action: Action::Generate(FilterPhrase),
        },
        generate(
            r"(?i).*from\s+(?P<sec>.*)$",
            Some(INPUT_GUARD),
            FromStreamIds,
        ),
        generate(
            r"(?i).*from.*select\s+(?P<sec>.*)$",
            Some(SECTION_GUARD),
            SelectAttributes,
        ),
        keywords(
            r"(?i).*from.*output\s+(?P<sec>.*)$",
            Some(RATE_GUARD),
            &["snapshot", "all", "last", "first", "every"],
            Keyword,
        ),
        keywords(
            r"(?i).*from.*output.*every(?P<sec>.*)$",
            Some(RATE_EVERY_GUARD),
            &[
                "events", "min", "hours", "weeks", "days", "months", "years", "insert", "delete",
                "update",
            ],
            Keyword,
        ),
    ]
});

/// The first rule matching the normalized text, with its index for logging.
pub fn first_match(text: &str) -> Option<(usize, &'static Rule)> {
    RULE_BASE
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.matches(text))
}
