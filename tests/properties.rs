use std::collections::HashSet;

use genform::interpret::{interpret, leaf_paths};
use genform::{FieldPath, FormData, SchemaLoader};
use proptest::prelude::*;
use serde_json::{json, Value};

fn node() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just("text"),
        Just("email"),
        Just("password"),
        Just("number"),
        Just("select"),
        Just("textarea"),
        Just("rating"),
    ]
    .prop_map(|kind| json!({"type": kind, "name": "", "label": kind}));
    leaf.prop_recursive(5, 48, 5, |inner| {
        prop::collection::vec(inner, 0..5)
            .prop_map(|fields| json!({"type": "section", "name": "", "label": "S", "fields": fields}))
    })
}

/// Give every node a name unique among its siblings.
fn name_siblings(nodes: &mut [Value]) {
    for (i, node) in nodes.iter_mut().enumerate() {
        node["name"] = Value::String(format!("f{i}"));
        if let Some(Value::Array(fields)) = node.get_mut("fields") {
            name_siblings(fields);
        }
    }
}

fn schema() -> impl Strategy<Value = Value> {
    prop::collection::vec(node(), 0..6).prop_map(|mut nodes| {
        name_siblings(&mut nodes);
        Value::Array(nodes)
    })
}

fn path() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-c]{1,2}", 1..4).prop_map(|segments| segments.join("."))
}

fn form_data() -> impl Strategy<Value = FormData> {
    prop::collection::vec((path(), "[a-z]{0,3}"), 0..8).prop_map(|writes| {
        writes
            .into_iter()
            .fold(FormData::new(), |data, (p, v)| data.merge(&p, v).unwrap())
    })
}

proptest! {
    #[test]
    fn interpretation_is_idempotent(doc in schema()) {
        let loader = SchemaLoader::new();
        let a = loader.load_value(doc.clone()).unwrap();
        let b = loader.load_value(doc).unwrap();
        prop_assert_eq!(interpret(&a), interpret(&b));
        prop_assert_eq!(interpret(&a), interpret(&a));
    }

    #[test]
    fn unique_sibling_names_give_unique_paths(doc in schema()) {
        let schema = SchemaLoader::new().load_value(doc).unwrap();
        let paths = leaf_paths(&interpret(&schema));
        let unique: HashSet<&FieldPath> = paths.iter().collect();
        prop_assert_eq!(unique.len(), paths.len());
        prop_assert!(paths.iter().all(FieldPath::is_addressable));
    }

    #[test]
    fn merge_leaves_its_input_untouched(data in form_data(), p in path(), v in "[a-z]{0,3}") {
        let before = data.to_json();
        let after = data.merge(&p, v.clone()).unwrap();
        prop_assert_eq!(data.to_json(), before);
        prop_assert_eq!(after.get(&p.parse().unwrap()), Some(v.as_str()));
    }

    #[test]
    fn remerging_the_same_value_is_a_noop(data in form_data(), p in path(), v in "[a-z]{0,3}") {
        let once = data.merge(&p, v.clone()).unwrap();
        let twice = once.merge(&p, v).unwrap();
        prop_assert_eq!(once, twice);
    }
}
