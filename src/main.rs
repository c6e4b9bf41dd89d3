//! Demo binary: fetch a tabular dataset over HTTP, validate it against a
//! flat tabular shape, then run a row-by-row validation loop over
//! deliberately malformed in-memory rows. Everything here is a caller of
//! the library; no behavior of the core depends on it.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Value, json};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use sigill::error::{Result, SigillError};
use sigill::seal::Validator;
use sigill::settings::Settings;
use sigill::shape::{Shape, number, row, sequence, text};

sigill::brand!(CensusTable);
sigill::brand!(CensusRows);
sigill::brand!(PersonRow);

lazy_static! {
    static ref VALUE_PATTERN: Regex = Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").unwrap();
    static ref CODE_PATTERN: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

/// The whole table as fetched: every row is a strip of text cells of the
/// expected width, and the first row must be the header itself.
fn table_shape(expected_header: &[String]) -> Shape {
    let width = expected_header.len();
    let expected: Vec<String> = expected_header.to_vec();
    sequence(sequence(text()).refine(
        move |strip| {
            strip
                .as_array()
                .is_some_and(|cells| cells.len() == width)
        },
        format!("a row must have exactly {} cells", width),
    ))
    .refine(
        move |table| {
            table.as_array().is_some_and(|rows| {
                rows.first().and_then(Value::as_array).is_some_and(|cells| {
                    cells.len() == expected.len()
                        && cells
                            .iter()
                            .zip(&expected)
                            .all(|(cell, name)| cell.as_str() == Some(name.as_str()))
                })
            })
        },
        "first row must be the correct header",
    )
}

/// A data row below the header: a name, a numeric measurement (parsed into
/// an actual number), and geography codes for the remaining cells.
fn data_row_shape(width: usize) -> Shape {
    let mut items: Vec<Shape> = Vec::new();
    items.push(text().min_len(1).into());
    items.push(text().pattern(VALUE_PATTERN.clone()).into());
    for _ in 2..width {
        items.push(text().pattern(CODE_PATTERN.clone()).into());
    }
    row(items).map(|strip| {
        let Value::Array(mut cells) = strip else {
            return Err("row is not an array".to_string());
        };
        let raw = cells[1].as_str().unwrap_or_default().to_owned();
        let measurement: f64 = raw
            .parse()
            .map_err(|_| format!("measurement {:?} is not numeric", raw))?;
        cells[1] = Value::from(measurement);
        Ok(Value::Array(cells))
    })
}

/// A `(name, age, pet)` row mapped into a record, as the row loop expects.
fn person_row_shape() -> Shape {
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
    })
}

fn fetch_table(endpoint: &str) -> Result<Value> {
    let response = reqwest::blocking::get(endpoint)?;
    Ok(response.error_for_status()?.json::<Value>()?)
}

fn dataset_demo(payload: Value, settings: &Settings) {
    let table: Validator<CensusTable> = Validator::new(table_shape(&settings.expected_header));
    let sealed = match table.validate(payload) {
        Ok(sealed) => sealed,
        Err(rejection) => {
            for issue in rejection.issues() {
                error!(%issue, "dataset rejected");
            }
            return;
        }
    };
    // the table is sound; split off the header and parse the data rows
    let Value::Array(mut rows) = sealed.into_inner() else {
        return;
    };
    let data = rows.split_off(1);
    let parsed: Validator<CensusRows> =
        Validator::new(sequence(data_row_shape(settings.expected_header.len())));
    match parsed.validate(Value::Array(data)) {
        Ok(sealed_rows) => {
            info!(
                rows = sealed_rows.as_array().map_or(0, |r| r.len()),
                "dataset is valid"
            );
        }
        Err(rejection) => {
            for issue in rejection.issues() {
                error!(%issue, "data row rejected");
            }
        }
    }
}

fn row_loop_demo() {
    let malformed = json!([
        ["Bob", 10, "cat"],
        ["Alice", "15", "dog"],
        ["Eve", 20, "mouse"],
    ]);
    let person: Validator<PersonRow> = Validator::new(person_row_shape());
    for (i, entry) in malformed.as_array().unwrap().iter().enumerate() {
        match person.validate(entry.clone()) {
            Ok(sealed) => info!(row = i, person = %sealed, "row accepted"),
            Err(rejection) => warn!(row = i, %rejection, "row rejected"),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let settings = Settings::load()?;
    if settings.expected_header.len() < 2 {
        return Err(SigillError::Config(
            "expected_header must have at least two columns".to_string(),
        ));
    }
    info!(endpoint = %settings.endpoint, "fetching dataset");
    match fetch_table(&settings.endpoint) {
        Ok(payload) => dataset_demo(payload, &settings),
        Err(e) => warn!(error = %e, "fetch failed, skipping the dataset demo"),
    }
    row_loop_demo();
    Ok(())
}
