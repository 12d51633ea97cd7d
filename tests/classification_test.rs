//! End-to-end classification tests over a populated engine.
//!
//! These drive the public API exactly the way an editor host would: register
//! session metadata once, then classify incomplete statement prefixes.

use streamql_completion::{
    AttrType, CompletionEngine, NamespaceEntry, OverloadDescriptor, StreamDef, Suggestion,
    SuggestionCategory, TableDef,
};

const EXTENSIONS_JSON: &str = r#"{
    "math": {
        "functions": {
            "sin": [{
                "argNames": ["angle"],
                "argTypes": [["float", "double"]],
                "returnType": ["double"]
            }]
        }
    },
    "timeseries": {
        "windowProcessors": {
            "regress": [{
                "argNames": ["duration"],
                "argTypes": [["long"]],
                "returnType": ["object"]
            }]
        }
    }
}"#;

fn engine() -> CompletionEngine {
    let mut engine = CompletionEngine::new();
    engine.symbols.add_stream(StreamDef::with_attributes(
        "TempStream",
        &[("temp", AttrType::Double), ("deviceID", AttrType::String)],
    ));
    engine.symbols.add_stream(StreamDef::with_attributes(
        "RegulatorStream",
        &[("deviceID", AttrType::String), ("isOn", AttrType::Bool)],
    ));
    engine.symbols.add_table(TableDef::with_attributes(
        "DeviceTable",
        &[("deviceID", AttrType::String), ("owner", AttrType::String)],
    ));
    engine.catalog.load_extensions_json(EXTENSIONS_JSON).unwrap();

    let mut system = NamespaceEntry::default();
    system
        .functions
        .insert("avg".to_string(), vec![OverloadDescriptor::default()]);
    engine.catalog.set_system(system);
    engine
}

fn labels(list: &[Suggestion]) -> Vec<&str> {
    list.iter().map(|s| s.label.as_str()).collect()
}

// ============================================================================
// Statement progression
// ============================================================================

#[test]
fn test_definition_statement_progression() {
    let engine = engine();
    assert_eq!(
        labels(&engine.suggest("define ")),
        vec!["stream", "table", "function"]
    );
    assert!(labels(&engine.suggest("define stream SensorStream ( id ")).contains(&"string"));
    assert_eq!(
        labels(&engine.suggest("define function concatFn [JavaScript] ")),
        vec!["return"]
    );
    assert!(
        labels(&engine.suggest("define function concatFn [JavaScript] return "))
            .contains(&"string")
    );
}

#[test]
fn test_from_clause_offers_streams_keywords_and_references() {
    let engine = engine();
    let list = engine.suggest("from e1=TempStream -> ");
    let names = labels(&list);
    assert!(names.contains(&"TempStream"));
    assert!(names.contains(&"RegulatorStream"));
    assert!(names.contains(&"join"));
    assert!(names.contains(&"select"));
    assert!(names.contains(&"e1."), "Event references gain a dot suffix");
}

#[test]
fn test_select_unions_attributes_of_referenced_streams() {
    let engine = engine();
    let list = engine.suggest("from TempStream join RegulatorStream select ");
    let names = labels(&list);
    assert!(names.contains(&"temp"));
    assert!(names.contains(&"isOn"));
    assert!(names.contains(&"avg(args)"));
    assert!(names.contains(&"math:"));
    assert!(names.contains(&"DeviceTable."));
}

#[test]
fn test_filter_contexts() {
    let engine = engine();

    let list = engine.suggest("from TempStream[");
    let names = labels(&list);
    assert!(names.contains(&"AND"));
    assert!(names.contains(&"CONTAINS"));
    assert!(names.contains(&"temp"));
    assert!(!names.contains(&"isOn"));

    // Balanced inner brackets keep the cursor inside the outer filter.
    let list = engine.suggest("from TempStream[fn(arr[2]) and ");
    let names = labels(&list);
    assert!(names.contains(&"OR"));
    assert!(names.contains(&"deviceID"));

    // A known event reference under the cursor only takes an index keyword.
    assert_eq!(labels(&engine.suggest("from e1=TempStream[e1")), vec!["last"]);
}

#[test]
fn test_window_and_namespace_contexts() {
    let engine = engine();

    let list = engine.suggest("from TempStream#window.");
    let names = labels(&list);
    assert!(names.contains(&"time(windowTime)"));
    assert!(names.contains(&"timeseries:"));
    assert!(
        !names.contains(&"math:"),
        "Namespaces without window processors stay out of the window phrase"
    );

    assert_eq!(
        labels(&engine.suggest("from TempStream#window.timeseries:")),
        vec!["regress(argList)"]
    );

    let list = engine.suggest("from TempStream#");
    let names = labels(&list);
    assert!(names.contains(&"window."));
    assert!(names.contains(&"timeseries:"));
}

#[test]
fn test_variable_resolution_contexts() {
    let engine = engine();
    assert_eq!(
        labels(&engine.suggest("from TempStream as t join RegulatorStream select t.")),
        vec!["temp", "deviceID"]
    );
    assert_eq!(
        labels(&engine.suggest("from DeviceTable.")),
        vec!["deviceID", "owner"]
    );
    assert_eq!(
        labels(&engine.suggest("from e1=RegulatorStream select e1[last].")),
        vec!["deviceID", "isOn"]
    );
}

#[test]
fn test_output_and_action_contexts() {
    let engine = engine();
    assert_eq!(
        labels(&engine.suggest("from TempStream select temp output ")),
        vec!["snapshot", "all", "last", "first", "every"]
    );
    assert!(labels(&engine.suggest("from TempStream select temp output every "))
        .contains(&"months"));
    assert!(labels(&engine.suggest("from TempStream select temp insert ")).contains(&"into"));
    assert_eq!(
        labels(&engine.suggest("from TempStream select temp insert into ")),
        vec!["DeviceTable"]
    );

    let list = engine.suggest("from TempStream select deviceID update ");
    let names = labels(&list);
    assert!(names.contains(&"for"));
    assert!(names.contains(&"DeviceTable"));

    let list = engine.suggest("from TempStream select deviceID update DeviceTable on ");
    let names = labels(&list);
    assert!(names.contains(&"DeviceTable."));
    assert!(names.contains(&"TempStream."));
    assert!(names.contains(&"IS NULL"));
}

#[test]
fn test_partition_contexts() {
    let engine = engine();
    assert_eq!(labels(&engine.suggest("partition ")), vec!["with"]);
    assert_eq!(
        labels(&engine.suggest("partition with ( temp of ")),
        vec!["TempStream"]
    );
    assert_eq!(
        labels(&engine.suggest("partition with ( deviceID of ")),
        vec!["RegulatorStream", "TempStream"]
    );
}

#[test]
fn test_group_by_and_having_contexts() {
    let engine = engine();
    let list = engine.suggest("from TempStream select temp group by ");
    let names = labels(&list);
    assert!(names.contains(&"temp"));
    assert!(names.contains(&"TempStream."));
    assert!(names.contains(&"having"));

    let list = engine.suggest("from TempStream select temp group by deviceID having ");
    let names = labels(&list);
    assert!(names.contains(&"avg(args)"));
    assert!(names.contains(&"AND"));
    assert!(names.contains(&"temp"));
}

// ============================================================================
// Cross-cutting properties
// ============================================================================

#[test]
fn test_unknown_names_degrade_to_fewer_suggestions() {
    let engine = engine();
    let list = engine.suggest("from MysteryStream[");
    let names = labels(&list);
    assert!(names.contains(&"AND"), "Operators survive unknown streams");
    assert!(!names.contains(&"temp"));

    assert!(engine.suggest("from nothing.").is_empty());
}

#[test]
fn test_classification_returns_scratch_maps_by_value() {
    let engine = engine();
    let text = "from e1=TempStream as t join RegulatorStream as r select ";
    let result = engine.classify(text);
    assert_eq!(result.event_refs.get("e1").map(String::as_str), Some("TempStream"));
    assert_eq!(result.aliases.get("t").map(String::as_str), Some("TempStream"));
    assert_eq!(
        result.aliases.get("r").map(String::as_str),
        Some("RegulatorStream")
    );

    // A later pass over a different statement must not see stale maps.
    let result = engine.classify("from TempStream select ");
    assert!(result.event_refs.is_empty());
    assert!(result.aliases.is_empty());
}

#[test]
fn test_repeated_classification_is_stable() {
    let engine = engine();
    for text in [
        "from ",
        "from TempStream select ",
        "from e1=TempStream[e1",
        "define ",
    ] {
        assert_eq!(engine.classify(text), engine.classify(text), "input: {text}");
    }
}

#[test]
fn test_from_suggestions_cover_every_stream() {
    let engine = engine();
    let list = engine.suggest("from ");
    let names = labels(&list);
    for id in ["TempStream", "RegulatorStream"] {
        assert!(names.contains(&id), "missing stream {id}");
    }
}

#[test]
fn test_multiline_and_multistatement_input() {
    let engine = engine();
    let text = "define stream Extra (x int);\n\n@info(name = 'q1')\nfrom TempStream\n    select ";
    let list = engine.suggest(text);
    let names = labels(&list);
    assert!(names.contains(&"temp"));
    assert!(
        !names.contains(&"x"),
        "Earlier statements must not leak into the current one"
    );
}

#[test]
fn test_suggestions_carry_categories_and_ranks() {
    let engine = engine();
    let list = engine.suggest("from TempStream select ");
    let attr = list
        .iter()
        .find(|s| s.label == "temp")
        .expect("attribute suggestion");
    assert_eq!(attr.category, SuggestionCategory::Attribute);
    let keyword = list.iter().find(|s| s.label == "as").expect("keyword suggestion");
    assert!(keyword.rank < attr.rank, "Keywords group before attributes");
}
