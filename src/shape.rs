use std::sync::{Arc, Mutex, OnceLock};

// other keepers use HashSet or HashMap
use core::hash::BuildHasherDefault;
use std::collections::HashSet;
use seahash::SeaHasher;

// used to print out readable forms of a shape
use std::fmt;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

pub type FieldHasher = BuildHasherDefault<SeaHasher>;

/// A predicate checked against a value once its structure has been accepted.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
/// A rewriting step applied to a value once its structure has been accepted.
/// Returning `Err` rejects the value with the given message.
pub type Mapping = Arc<dyn Fn(Value) -> std::result::Result<Value, String> + Send + Sync>;

type Builder = Box<dyn FnOnce(Shape) -> Shape + Send>;

/// A declarative description of valid structure for a JSON value.
///
/// Shapes are built with the constructor functions in this module
/// ([`boolean`], [`number`], [`text`], [`sequence`], [`record`], [`row`],
/// [`recursive`]) and composed with [`Shape::refine`] and [`Shape::map`].
/// A shape does nothing on its own; couple it with a brand through
/// [`crate::seal::Validator`] to check values against it.
#[derive(Clone)]
pub enum Shape {
    Boolean,
    Number(NumberShape),
    Text(TextShape),
    Sequence(SequenceShape),
    Record(RecordShape),
    Row(RowShape),
    Refined(RefinedShape),
    Mapped(MappedShape),
    Deferred(Arc<DeferredShape>),
}

// ------------- Number -------------
#[derive(Clone, Default)]
pub struct NumberShape {
    pub(crate) min: Option<f64>,
    pub(crate) max: Option<f64>,
    pub(crate) multiple_of: Option<f64>,
}

impl NumberShape {
    pub fn min(mut self, bound: f64) -> Self {
        self.min = Some(bound);
        self
    }
    pub fn max(mut self, bound: f64) -> Self {
        self.max = Some(bound);
        self
    }
    /// Accept only exact multiples of `step` (exact float remainder).
    pub fn multiple_of(mut self, step: f64) -> Self {
        self.multiple_of = Some(step);
        self
    }
}

// ------------- Text -------------
#[derive(Clone, Default)]
pub struct TextShape {
    pub(crate) min_len: Option<usize>,
    pub(crate) max_len: Option<usize>,
    pub(crate) pattern: Option<Arc<Regex>>,
}

impl TextShape {
    pub fn min_len(mut self, bound: usize) -> Self {
        self.min_len = Some(bound);
        self
    }
    pub fn max_len(mut self, bound: usize) -> Self {
        self.max_len = Some(bound);
        self
    }
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(Arc::new(pattern));
        self
    }
}

// ------------- Sequence -------------
#[derive(Clone)]
pub struct SequenceShape {
    pub(crate) element: Box<Shape>,
}

// ------------- Record -------------
/// What to do with fields present in the input but absent from the shape.
/// `Allow` passes them through untouched, `Deny` rejects each of them.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnknownFields {
    Allow,
    Deny,
}

#[derive(Clone)]
pub struct RecordShape {
    pub(crate) fields: Vec<(String, Shape)>,
    pub(crate) declared: HashSet<String, FieldHasher>,
    pub(crate) unknown: UnknownFields,
}

impl RecordShape {
    pub fn deny_unknown_fields(mut self) -> Self {
        self.unknown = UnknownFields::Deny;
        self
    }
}

// ------------- Row -------------
#[derive(Clone)]
pub struct RowShape {
    pub(crate) items: Vec<Shape>,
}

// ------------- Refined / Mapped -------------
#[derive(Clone)]
pub struct RefinedShape {
    pub(crate) inner: Box<Shape>,
    pub(crate) accepts: Predicate,
    pub(crate) message: String,
}

#[derive(Clone)]
pub struct MappedShape {
    pub(crate) inner: Box<Shape>,
    pub(crate) apply: Mapping,
}

// ------------- Deferred -------------
/// A shape whose definition refers to itself.
///
/// The builder is stored until the shape is first used, is invoked at most
/// once, and its result is kept for the lifetime of the cell. Every nested
/// occurrence of the self-reference resolves to the same kept shape, which
/// is what makes the self-reference tractable: resolution is deferred to
/// first use and then frozen. Clones of a deferred shape share the cell.
pub struct DeferredShape {
    resolved: OnceLock<Shape>,
    builder: Mutex<Option<Builder>>,
}

impl DeferredShape {
    /// Resolve the cell, running the builder if this is the first use.
    ///
    /// The builder receives the self-reference as its argument. It must only
    /// construct shapes with it; validating through the shape being defined
    /// from inside the builder would deadlock the cell.
    pub(crate) fn force(cell: &Arc<DeferredShape>) -> &Shape {
        cell.resolved.get_or_init(|| {
            let build = cell
                .builder
                .lock()
                .unwrap()
                .take()
                .expect("builder is present until the first resolution");
            debug!("resolving deferred shape");
            build(Shape::Deferred(Arc::clone(cell)))
        })
    }
}

// ------------- Constructors -------------
pub fn boolean() -> Shape {
    Shape::Boolean
}

pub fn number() -> NumberShape {
    NumberShape::default()
}

pub fn text() -> TextShape {
    TextShape::default()
}

pub fn sequence(element: impl Into<Shape>) -> Shape {
    Shape::Sequence(SequenceShape {
        element: Box::new(element.into()),
    })
}

/// A record with the given fields, in declaration order. Unknown fields
/// are passed through untouched; see [`RecordShape::deny_unknown_fields`].
pub fn record<S: Into<String>>(fields: impl IntoIterator<Item = (S, Shape)>) -> RecordShape {
    let fields: Vec<(String, Shape)> = fields
        .into_iter()
        .map(|(name, shape)| (name.into(), shape))
        .collect();
    let mut declared = HashSet::default();
    for (name, _) in &fields {
        declared.insert(name.clone());
    }
    RecordShape {
        fields,
        declared,
        unknown: UnknownFields::Allow,
    }
}

/// A fixed-arity sequence whose elements each have their own shape.
pub fn row(items: impl IntoIterator<Item = Shape>) -> Shape {
    Shape::Row(RowShape {
        items: items.into_iter().collect(),
    })
}

/// A shape defined in terms of itself.
///
/// The builder receives the shape being defined and returns its body. It is
/// deferred until the first validation, runs at most once, and must be
/// idempotent apart from one-time diagnostics.
///
/// ```
/// use sigill::shape::{record, recursive, sequence};
/// let tree = recursive(|node| record([("children", sequence(node))]).into());
/// ```
pub fn recursive<F>(build: F) -> Shape
where
    F: FnOnce(Shape) -> Shape + Send + 'static,
{
    Shape::Deferred(Arc::new(DeferredShape {
        resolved: OnceLock::new(),
        builder: Mutex::new(Some(Box::new(build))),
    }))
}

impl Shape {
    /// Attach a predicate checked after the structure has been accepted.
    pub fn refine<F>(self, accepts: F, message: impl Into<String>) -> Shape
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Shape::Refined(RefinedShape {
            inner: Box::new(self),
            accepts: Arc::new(accepts),
            message: message.into(),
        })
    }

    /// Attach a rewriting step applied after the structure has been accepted.
    /// This is the only place a validated value changes form.
    pub fn map<F>(self, apply: F) -> Shape
    where
        F: Fn(Value) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        Shape::Mapped(MappedShape {
            inner: Box::new(self),
            apply: Arc::new(apply),
        })
    }
}

impl From<NumberShape> for Shape {
    fn from(shape: NumberShape) -> Shape {
        Shape::Number(shape)
    }
}
impl From<TextShape> for Shape {
    fn from(shape: TextShape) -> Shape {
        Shape::Text(shape)
    }
}
impl From<RecordShape> for Shape {
    fn from(shape: RecordShape) -> Shape {
        Shape::Record(shape)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Shape::Boolean => write!(f, "boolean"),
            Shape::Number(_) => write!(f, "number"),
            Shape::Text(_) => write!(f, "string"),
            Shape::Sequence(s) => write!(f, "array of {}", s.element),
            Shape::Record(r) => {
                let mut names = String::new();
                for (name, _) in &r.fields {
                    names += &(name.to_string() + ", ");
                }
                names.pop();
                names.pop();
                write!(f, "object {{{}}}", names)
            }
            Shape::Row(r) => write!(f, "array of {} elements", r.items.len()),
            Shape::Refined(r) => write!(f, "{}", r.inner),
            Shape::Mapped(m) => write!(f, "{}", m.inner),
            // do not force the cell just to print it
            Shape::Deferred(_) => write!(f, "recursive"),
        }
    }
}
