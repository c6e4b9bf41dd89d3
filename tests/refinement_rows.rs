use regex::Regex;
use serde_json::{Value, json};
use sigill::engine::IssueKind;
use sigill::seal::Validator;
use sigill::shape::{Shape, number, record, row, sequence, text};

sigill::brand!(OddEvens);
sigill::brand!(PersonRow);
sigill::brand!(Table);
sigill::brand!(Strict);

fn odd_evens() -> Validator<OddEvens> {
    Validator::new(
        sequence(number().multiple_of(2.0)).refine(
            |value| value.as_array().is_some_and(|items| items.len() % 2 == 1),
            "array length must be odd",
        ),
    )
}

#[test]
fn even_numbers_of_odd_length_pass() {
    let sealed = odd_evens().validate(json!([2, 4, 6])).expect("valid");
    assert_eq!(*sealed, json!([2, 4, 6]));
}

#[test]
fn even_length_fails_at_the_root() {
    let rejection = odd_evens().validate(json!([2, 4])).unwrap_err();
    assert_eq!(rejection.len(), 1);
    let issue = &rejection.issues()[0];
    assert_eq!(issue.kind, IssueKind::RefinementFailed);
    assert!(issue.trail.is_root());
    assert_eq!(issue.message, "array length must be odd");
}

#[test]
fn odd_members_fail_with_their_index() {
    let rejection = odd_evens().validate(json!([2, 3, 6])).unwrap_err();
    assert_eq!(rejection.len(), 1);
    let issue = &rejection.issues()[0];
    assert_eq!(issue.trail.to_string(), "[1]");
    assert_eq!(issue.kind, IssueKind::RefinementFailed);
    assert!(issue.message.contains("not a multiple of 2"));
}

#[test]
fn refinement_is_skipped_when_members_fail() {
    // [2, "x"] has even length, but only the member issue is reported:
    // the length refinement never runs on a structurally broken array
    let rejection = odd_evens().validate(json!([2, "x"])).unwrap_err();
    assert_eq!(rejection.len(), 1);
    assert_eq!(rejection.issues()[0].trail.to_string(), "[1]");
    assert_eq!(rejection.issues()[0].kind, IssueKind::ShapeMismatch);
}

fn person_row() -> Validator<PersonRow> {
    Validator::new(
        row([
            Shape::from(text().min_len(2).max_len(100)),
            number().min(0.0).into(),
            text().min_len(2).max_len(100).into(),
        ])
        .map(|strip| {
            let Value::Array(cells) = strip else {
                return Err("row is not an array".to_string());
            };
            let [name, age, pet] =
                <[Value; 3]>::try_from(cells).map_err(|_| "row arity changed".to_string())?;
            Ok(json!({ "name": name, "age": age, "pet": pet }))
        }),
    )
}

#[test]
fn rows_map_into_records() {
    let sealed = person_row().validate(json!(["Bob", 10, "cat"])).expect("valid");
    assert_eq!(*sealed, json!({ "name": "Bob", "age": 10, "pet": "cat" }));
}

#[test]
fn mistyped_cells_are_located() {
    let rejection = person_row().validate(json!(["Alice", "15", "dog"])).unwrap_err();
    assert_eq!(rejection.len(), 1);
    let issue = &rejection.issues()[0];
    assert_eq!(issue.trail.to_string(), "[1]");
    assert!(issue.message.contains("expected number, found string"));
}

#[test]
fn arity_and_cell_failures_are_both_reported() {
    let rejection = person_row().validate(json!(["B", 10])).unwrap_err();
    let messages: Vec<&str> = rejection
        .issues()
        .iter()
        .map(|issue| issue.message.as_str())
        .collect();
    assert_eq!(rejection.len(), 2);
    assert!(messages[0].contains("expected 3 elements, found 2"));
    assert!(messages[1].contains("shorter than 2"));
}

#[test]
fn every_independent_failure_is_reported_in_one_pass() {
    let rejection = person_row().validate(json!(["B", -1, "x"])).unwrap_err();
    let trails: Vec<String> = rejection
        .issues()
        .iter()
        .map(|issue| issue.trail.to_string())
        .collect();
    assert_eq!(trails, vec!["[0]", "[1]", "[2]"]);
}

#[test]
fn text_patterns_refine() {
    sigill::brand!(Code);
    let validator: Validator<Code> =
        Validator::new(text().pattern(Regex::new("^[0-9]+$").unwrap()));
    validator.validate(json!("044")).expect("valid");
    let rejection = validator.validate(json!("4a")).unwrap_err();
    assert_eq!(rejection.issues()[0].kind, IssueKind::RefinementFailed);
}

#[test]
fn number_bounds_accumulate() {
    sigill::brand!(Bounded);
    // below the minimum and off the step at once: two refinements, one pass
    let validator: Validator<Bounded> =
        Validator::new(number().min(10.0).multiple_of(2.0));
    let rejection = validator.validate(json!(3)).unwrap_err();
    assert_eq!(rejection.len(), 2);
}

#[test]
fn tabular_header_refinement() {
    let header = ["NAME", "S2802_C03_022E", "state", "county"];
    let table_shape = sequence(sequence(text()).refine(
        |strip| strip.as_array().is_some_and(|cells| cells.len() == 4),
        "a row must have exactly 4 cells",
    ))
    .refine(
        move |table| {
            table.as_array().is_some_and(|rows| {
                rows.first().and_then(Value::as_array).is_some_and(|cells| {
                    cells.iter().zip(header).all(|(cell, name)| cell.as_str() == Some(name))
                })
            })
        },
        "first row must be the correct header",
    );
    let validator: Validator<Table> = Validator::new(table_shape);
    let good = json!([
        ["NAME", "S2802_C03_022E", "state", "county"],
        ["Bristol County, Rhode Island", "85.3", "44", "001"],
    ]);
    validator.validate(good).expect("valid");
    let reordered = json!([
        ["state", "NAME", "S2802_C03_022E", "county"],
        ["44", "Bristol County, Rhode Island", "85.3", "001"],
    ]);
    let rejection = validator.validate(reordered).unwrap_err();
    assert_eq!(rejection.issues()[0].message, "first row must be the correct header");
}

#[test]
fn records_can_deny_unknown_fields() {
    let validator: Validator<Strict> = Validator::new(
        record([("name", text().into())]).deny_unknown_fields(),
    );
    validator.validate(json!({ "name": "ok" })).expect("valid");
    let rejection = validator
        .validate(json!({ "name": "ok", "extra": 1 }))
        .unwrap_err();
    assert_eq!(rejection.len(), 1);
    assert_eq!(rejection.issues()[0].trail.to_string(), "extra");
    assert_eq!(rejection.issues()[0].message, "unknown field");
}

#[test]
fn records_pass_unknown_fields_through_by_default() {
    sigill::brand!(Loose);
    let validator: Validator<Loose> = Validator::new(record([("name", text().into())]));
    let sealed = validator
        .validate(json!({ "name": "ok", "extra": 1 }))
        .expect("valid");
    assert_eq!(*sealed, json!({ "name": "ok", "extra": 1 }));
}
