//! Per-pass alias and event-reference resolution.
//!
//! Aliases (`stream as s`) and event references (`e1=stream`) are local to
//! one statement's FROM clause, so these maps are rebuilt from the raw text
//! on every classification pass and returned by value, never stored on the
//! engine. The input is usually incomplete or invalid code; both scans are
//! tolerant text scans, not parses.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::symbols::SymbolTables;

static FROM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("(?i)from").unwrap());
static ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+as\s+(\w+)\s+").unwrap());
// `(\w+)\s*=\s*(\w+)` cannot match the `==`, `<=` or `>=` operator forms,
// so comparisons inside filters never register as event references.
static EVENT_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*=\s*(\w+)").unwrap());

/// The trailing FROM fragment: everything after the last `from` keyword.
/// Join chains stay inside one fragment because only the last `from` starts
/// a new scan region.
pub(crate) fn from_fragment(text: &str) -> Option<&str> {
    let last = FROM_RE.find_iter(text).last()?;
    let rest = &text[last.end()..];
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

/// Alias and event-reference maps derived from the current FROM fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScratchResolver {
    /// alias name -> canonical stream id
    pub aliases: BTreeMap<String, String>,
    /// event reference name -> canonical stream id
    pub event_refs: BTreeMap<String, String>,
}

impl ScratchResolver {
    /// Rebuild both maps from scratch for the given trailing statement text.
    pub fn rebuild(text: &str, symbols: &SymbolTables) -> Self {
        let mut resolver = ScratchResolver::default();
        if let Some(fragment) = from_fragment(text) {
            resolver.scan_aliases(fragment, symbols);
            resolver.scan_event_refs(fragment);
        }
        resolver
    }

    /// Resolve a name through the event-reference map, then the alias map.
    /// Unresolvable names pass through unchanged.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        let mut current = name;
        if let Some(id) = self.event_refs.get(current) {
            current = id;
        }
        if let Some(id) = self.aliases.get(current) {
            current = id;
        }
        current
    }

    /// Split the fragment on ` as <alias> ` occurrences; for each alias the
    /// target is the stream id with the rightmost occurrence in the segment
    /// preceding it. The rightmost-match heuristic picks the nearest
    /// preceding stream name in join chains.
    fn scan_aliases(&mut self, fragment: &str, symbols: &SymbolTables) {
        let mut prev_end = 0;
        for caps in ALIAS_RE.captures_iter(fragment) {
            let whole = caps.get(0).expect("whole match");
            let preceding = &fragment[prev_end..whole.start()];
            prev_end = whole.end();

            let mut best: Option<(usize, &str)> = None;
            for id in symbols.stream_ids() {
                if let Some(pos) = preceding.rfind(id) {
                    if best.map_or(true, |(p, _)| pos >= p) {
                        best = Some((pos, id));
                    }
                }
            }
            if let Some((_, id)) = best {
                self.aliases.insert(caps[1].to_string(), id.to_string());
            }
        }
    }

    fn scan_event_refs(&mut self, fragment: &str) {
        for caps in EVENT_REF_RE.captures_iter(fragment) {
            self.event_refs
                .insert(caps[1].to_string(), caps[2].to_string());
        }
    }
}
