//! Nominal tagging of validated values.
//!
//! A [`Sealed`] value is a plain `serde_json::Value` that has passed through
//! a [`Validator`]. The brand is a type-level marker with no runtime
//! representation, so a sealed value and a raw value of identical structure
//! cost the same but do not mix: a consumer declaring `Sealed<B>` cannot be
//! handed raw input that skipped validation.

// used to attach the brand without storing it
use std::marker::PhantomData;

// used to print out readable forms of a sealed value
use std::fmt;
use std::ops;

use serde_json::Value;

use crate::engine::{Checker, Rejection};
use crate::error::SigillError;
use crate::shape::Shape;

/// A nominal marker for validated values.
///
/// Implemented by uninhabited enums declared with [`brand!`](crate::brand);
/// the marker only ever appears in type position.
pub trait Brand: 'static {
    const NAME: &'static str;
}

/// Declares a brand: an uninhabited marker enum and its [`Brand`] impl.
///
/// ```
/// sigill::brand!(TreeNode);
/// assert_eq!(<TreeNode as sigill::seal::Brand>::NAME, "TreeNode");
/// ```
#[macro_export]
macro_rules! brand {
    ($(#[$meta:meta])* $vis:vis $name:ident) => {
        $(#[$meta])*
        $vis enum $name {}
        impl $crate::seal::Brand for $name {
            const NAME: &'static str = stringify!($name);
        }
    };
}

// ------------- Sealed -------------
/// A value that has passed validation, carrying the brand `B`.
///
/// The wrapped value is the validated input itself, structurally unchanged
/// unless a mapping step was composed into the shape. Nothing is stored for
/// the brand.
///
/// The brand is what keeps raw values out of sealed positions:
///
/// ```compile_fail
/// use sigill::seal::Sealed;
/// sigill::brand!(TreeNode);
///
/// fn fanout(node: &Sealed<TreeNode>) -> usize {
///     node["children"].as_array().map_or(0, |children| children.len())
/// }
///
/// let raw = serde_json::json!({ "children": [] });
/// fanout(&raw); // raw values of the same structure are not sealed
/// ```
pub struct Sealed<B: Brand> {
    value: Value,
    brand: PhantomData<fn() -> B>,
}

impl<B: Brand> Sealed<B> {
    fn new(value: Value) -> Self {
        Self {
            value,
            brand: PhantomData,
        }
    }
    pub fn brand(&self) -> &'static str {
        B::NAME
    }
    pub fn into_inner(self) -> Value {
        self.value
    }
}

impl<B: Brand> ops::Deref for Sealed<B> {
    type Target = Value;
    fn deref(&self) -> &Value {
        &self.value
    }
}
// sealed values are immutable; revalidate to change one

impl<B: Brand> Clone for Sealed<B> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}
impl<B: Brand> PartialEq for Sealed<B> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
impl<B: Brand> Eq for Sealed<B> {}
impl<B: Brand> fmt::Display for Sealed<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
impl<B: Brand> fmt::Debug for Sealed<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::<{}>", self.value, B::NAME)
    }
}

// ------------- Validator -------------
/// Couples a [`Shape`] with a brand and checks values against it.
pub struct Validator<B: Brand> {
    shape: Shape,
    brand: PhantomData<fn() -> B>,
}

impl<B: Brand> Validator<B> {
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            brand: PhantomData,
        }
    }
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Check a value of unknown structure in a single pass.
    ///
    /// On success the value comes back sealed and structurally unchanged
    /// (no clone, no mutation) unless a mapping step was composed. On
    /// failure the [`Rejection`] enumerates every issue found, not merely
    /// the first one.
    pub fn validate(&self, value: Value) -> Result<Sealed<B>, Rejection> {
        Checker::run(&self.shape, value).map(Sealed::new)
    }

    /// All-or-nothing variant of [`validate`](Validator::validate): the
    /// aggregate failure is converted into the crate error so callers can
    /// propagate it with `?` instead of branching on a result.
    pub fn enforce(&self, value: Value) -> crate::error::Result<Sealed<B>> {
        self.validate(value).map_err(SigillError::from)
    }
}

impl<B: Brand> Clone for Validator<B> {
    fn clone(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            brand: PhantomData,
        }
    }
}

impl<B: Brand> fmt::Display for Validator<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} sealed as {}", self.shape, B::NAME)
    }
}
