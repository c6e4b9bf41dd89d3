use serde_json::json;
use sigill::engine::IssueKind;
use sigill::seal::Validator;
use sigill::shape::{record, recursive, sequence};

sigill::brand!(TreeNode);

fn setup() -> Validator<TreeNode> {
    Validator::new(recursive(|node| {
        record([("children", sequence(node))]).into()
    }))
}

#[test]
fn empty_node_is_valid() {
    let validator = setup();
    let sealed = validator.validate(json!({ "children": [] })).expect("valid");
    assert_eq!(*sealed, json!({ "children": [] }));
}

#[test]
fn nested_nodes_are_valid() {
    let validator = setup();
    let tree = json!({
        "children": [
            { "children": [] },
            { "children": [{ "children": [] }] },
        ]
    });
    let sealed = validator.validate(tree.clone()).expect("valid");
    assert_eq!(*sealed, tree);
    assert_eq!(sealed["children"].as_array().unwrap().len(), 2);
}

#[test]
fn non_array_children_is_located() {
    let validator = setup();
    let rejection = validator
        .validate(json!({ "children": [{ "children": "not an array" }] }))
        .unwrap_err();
    assert_eq!(rejection.len(), 1);
    let issue = &rejection.issues()[0];
    assert_eq!(issue.trail.to_string(), "children[0].children");
    assert_eq!(issue.kind, IssueKind::ShapeMismatch);
    assert!(issue.message.contains("expected array, found string"));
}

#[test]
fn deeply_nested_failure_is_located() {
    let validator = setup();
    let tree = json!({
        "children": [
            { "children": [] },
            { "children": [{ "children": "not an array" }] },
        ]
    });
    let rejection = validator.validate(tree).unwrap_err();
    assert_eq!(rejection.len(), 1);
    assert_eq!(
        rejection.issues()[0].trail.to_string(),
        "children[1].children[0].children"
    );
}

#[test]
fn missing_children_field_is_reported() {
    let validator = setup();
    let rejection = validator.validate(json!({})).unwrap_err();
    assert_eq!(rejection.len(), 1);
    let issue = &rejection.issues()[0];
    assert_eq!(issue.trail.to_string(), "children");
    assert_eq!(issue.message, "missing field");
}

#[test]
fn sibling_failures_are_all_reported_in_one_pass() {
    let validator = setup();
    let tree = json!({
        "children": [
            { "children": "a" },
            { "children": [] },
            { "children": "b" },
        ]
    });
    let rejection = validator.validate(tree).unwrap_err();
    let trails: Vec<String> = rejection
        .issues()
        .iter()
        .map(|issue| issue.trail.to_string())
        .collect();
    assert_eq!(trails, vec!["children[0].children", "children[2].children"]);
}

#[test]
fn deep_trees_validate() {
    let validator = setup();
    let mut tree = json!({ "children": [] });
    for _ in 0..128 {
        tree = json!({ "children": [tree] });
    }
    validator.validate(tree).expect("valid");
}

#[test]
fn non_object_root_fails_at_the_root() {
    let validator = setup();
    let rejection = validator.validate(json!([1, 2, 3])).unwrap_err();
    let issue = &rejection.issues()[0];
    assert!(issue.trail.is_root());
    assert_eq!(issue.trail.to_string(), "$");
    assert!(issue.message.contains("expected object, found array"));
}
