//! Recursive-descent checking of values against shapes.
//!
//! The checker walks a [`Shape`](crate::shape::Shape) and a
//! `serde_json::Value` together, collecting every violation it finds into a
//! single [`Rejection`] rather than stopping at the first one. Sibling
//! fields and sibling elements are each descended into even after earlier
//! ones have failed, so one pass yields a complete failure report.
//!
//! The value is taken by value and handed back on success: nothing is
//! cloned, record maps and sequence buffers keep their allocations, and
//! only an explicit mapping step rewrites anything.

use std::fmt;

use serde_json::Value;

use crate::shape::{DeferredShape, NumberShape, RecordShape, RowShape, Shape, TextShape, UnknownFields};

// ------------- Trail -------------
/// One step on the way down to a value: a record field or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Index(usize),
}

/// The location of an issue, from the root of the checked value down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trail(Vec<Segment>);

impl Trail {
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Trail {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "$");
        }
        let mut first = true;
        for segment in &self.0 {
            match segment {
                Segment::Field(name) => {
                    if !first {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                Segment::Index(i) => write!(f, "[{}]", i)?,
            }
            first = false;
        }
        Ok(())
    }
}

// ------------- Issue -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// The value's type or structure does not match the declared shape.
    ShapeMismatch,
    /// The value is structurally correct but fails a semantic predicate.
    RefinementFailed,
}

#[derive(Debug, Clone)]
pub struct Issue {
    pub trail: Trail,
    pub kind: IssueKind,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "at {}: {}", self.trail, self.message)
    }
}

// ------------- Rejection -------------
/// The aggregate failure of one validation pass: every issue found,
/// in discovery order.
#[derive(Debug, Clone)]
pub struct Rejection {
    issues: Vec<Issue>,
}

impl Rejection {
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
    pub fn len(&self) -> usize {
        self.issues.len()
    }
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = String::new();
        for issue in &self.issues {
            s += &(issue.to_string() + "; ");
        }
        s.pop();
        s.pop();
        write!(f, "{}", s)
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ------------- Checker -------------
pub(crate) struct Checker {
    trail: Vec<Segment>,
    issues: Vec<Issue>,
}

impl Checker {
    /// Check `value` against `shape` in a single pass.
    pub(crate) fn run(shape: &Shape, value: Value) -> Result<Value, Rejection> {
        let mut checker = Checker {
            trail: Vec::new(),
            issues: Vec::new(),
        };
        match checker.apply(shape, value) {
            Some(checked) if checker.issues.is_empty() => Ok(checked),
            _ => Err(Rejection {
                issues: checker.issues,
            }),
        }
    }

    fn mismatch(&mut self, message: String) {
        self.issues.push(Issue {
            trail: Trail(self.trail.clone()),
            kind: IssueKind::ShapeMismatch,
            message,
        });
    }

    fn refinement(&mut self, message: String) {
        self.issues.push(Issue {
            trail: Trail(self.trail.clone()),
            kind: IssueKind::RefinementFailed,
            message,
        });
    }

    /// Returns the (possibly mapped) value on success, or records issues
    /// and returns `None`. The caller keeps descending into siblings either
    /// way.
    fn apply(&mut self, shape: &Shape, value: Value) -> Option<Value> {
        match shape {
            Shape::Boolean => match value {
                Value::Bool(_) => Some(value),
                other => {
                    self.mismatch(format!("expected boolean, found {}", kind_name(&other)));
                    None
                }
            },
            Shape::Number(spec) => self.apply_number(spec, value),
            Shape::Text(spec) => self.apply_text(spec, value),
            Shape::Sequence(spec) => self.apply_sequence(&spec.element, value),
            Shape::Record(spec) => self.apply_record(spec, value),
            Shape::Row(spec) => self.apply_row(spec, value),
            Shape::Refined(spec) => {
                let checked = self.apply(&spec.inner, value)?;
                if (spec.accepts)(&checked) {
                    Some(checked)
                } else {
                    self.refinement(spec.message.clone());
                    None
                }
            }
            Shape::Mapped(spec) => {
                let checked = self.apply(&spec.inner, value)?;
                match (spec.apply)(checked) {
                    Ok(mapped) => Some(mapped),
                    Err(message) => {
                        self.refinement(message);
                        None
                    }
                }
            }
            // the memoized resolution is shared by every nested occurrence
            Shape::Deferred(cell) => {
                let resolved = DeferredShape::force(cell);
                self.apply(resolved, value)
            }
        }
    }

    fn apply_number(&mut self, spec: &NumberShape, value: Value) -> Option<Value> {
        let parsed = match &value {
            Value::Number(n) => n.as_f64(),
            _ => None,
        };
        let Some(n) = parsed else {
            self.mismatch(format!("expected number, found {}", kind_name(&value)));
            return None;
        };
        let mut accepted = true;
        if let Some(min) = spec.min {
            if n < min {
                self.refinement(format!("number {} is below the minimum {}", n, min));
                accepted = false;
            }
        }
        if let Some(max) = spec.max {
            if n > max {
                self.refinement(format!("number {} is above the maximum {}", n, max));
                accepted = false;
            }
        }
        if let Some(step) = spec.multiple_of {
            if n % step != 0.0 {
                self.refinement(format!("number {} is not a multiple of {}", n, step));
                accepted = false;
            }
        }
        accepted.then_some(value)
    }

    fn apply_text(&mut self, spec: &TextShape, value: Value) -> Option<Value> {
        let accepted = match &value {
            Value::String(s) => {
                let mut accepted = true;
                let length = s.chars().count();
                if let Some(min_len) = spec.min_len {
                    if length < min_len {
                        self.refinement(format!(
                            "string of {} characters is shorter than {}",
                            length, min_len
                        ));
                        accepted = false;
                    }
                }
                if let Some(max_len) = spec.max_len {
                    if length > max_len {
                        self.refinement(format!(
                            "string of {} characters is longer than {}",
                            length, max_len
                        ));
                        accepted = false;
                    }
                }
                if let Some(pattern) = &spec.pattern {
                    if !pattern.is_match(s) {
                        self.refinement(format!("string does not match the pattern {}", pattern));
                        accepted = false;
                    }
                }
                accepted
            }
            other => {
                self.mismatch(format!("expected string, found {}", kind_name(other)));
                false
            }
        };
        accepted.then_some(value)
    }

    fn apply_sequence(&mut self, element: &Shape, value: Value) -> Option<Value> {
        let mut items = match value {
            Value::Array(items) => items,
            other => {
                self.mismatch(format!("expected array, found {}", kind_name(&other)));
                return None;
            }
        };
        let mut failed = false;
        for (i, slot) in items.iter_mut().enumerate() {
            let taken = std::mem::take(slot);
            self.trail.push(Segment::Index(i));
            match self.apply(element, taken) {
                Some(checked) => *slot = checked,
                None => failed = true,
            }
            self.trail.pop();
        }
        (!failed).then(|| Value::Array(items))
    }

    fn apply_record(&mut self, spec: &RecordShape, value: Value) -> Option<Value> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                self.mismatch(format!("expected object, found {}", kind_name(&other)));
                return None;
            }
        };
        let mut failed = false;
        for (name, field_shape) in &spec.fields {
            self.trail.push(Segment::Field(name.clone()));
            match map.get_mut(name) {
                Some(slot) => {
                    let taken = std::mem::take(slot);
                    match self.apply(field_shape, taken) {
                        Some(checked) => *slot = checked,
                        None => failed = true,
                    }
                }
                None => {
                    self.mismatch("missing field".to_string());
                    failed = true;
                }
            }
            self.trail.pop();
        }
        if spec.unknown == UnknownFields::Deny {
            for name in map.keys() {
                if !spec.declared.contains(name) {
                    self.trail.push(Segment::Field(name.clone()));
                    self.mismatch("unknown field".to_string());
                    self.trail.pop();
                    failed = true;
                }
            }
        }
        (!failed).then(|| Value::Object(map))
    }

    fn apply_row(&mut self, spec: &RowShape, value: Value) -> Option<Value> {
        let mut items = match value {
            Value::Array(items) => items,
            other => {
                self.mismatch(format!("expected array, found {}", kind_name(&other)));
                return None;
            }
        };
        let mut failed = false;
        if items.len() != spec.items.len() {
            self.mismatch(format!(
                "expected {} elements, found {}",
                spec.items.len(),
                items.len()
            ));
            failed = true;
        }
        // still check the overlapping elements so the report is complete
        for (i, (slot, item_shape)) in items.iter_mut().zip(&spec.items).enumerate() {
            let taken = std::mem::take(slot);
            self.trail.push(Segment::Index(i));
            match self.apply(item_shape, taken) {
                Some(checked) => *slot = checked,
                None => failed = true,
            }
            self.trail.pop();
        }
        (!failed).then(|| Value::Array(items))
    }
}
