//! Sigill – validation of self-referential data with sealed results.
//!
//! Sigill centers on the *shape* concept: a declarative description of valid
//! structure for a JSON value, where:
//! * A [`shape::Shape`] describes booleans, numbers, strings, arrays,
//!   objects and fixed-arity rows, with optional constraints.
//! * A [`shape::recursive`] shape is defined in terms of itself; the
//!   self-reference is resolved lazily, exactly once, on first use.
//! * A refinement ([`shape::Shape::refine`]) is a semantic predicate checked
//!   after the structure has been accepted, and a mapping
//!   ([`shape::Shape::map`]) is the one place a validated value changes form.
//! * A [`seal::Validator`] couples a shape with a [`seal::Brand`] and turns
//!   raw values into [`seal::Sealed`] ones.
//!
//! Checking collects every violation of one pass into an
//! [`engine::Rejection`] with a path to each offending descendant, instead
//! of stopping at the first failure.
//!
//! ## Modules
//! * [`shape`] – Shape constructors, constraints and the deferred cell
//!   behind self-referential definitions.
//! * [`engine`] – The recursive-descent checker, issue trails and the
//!   aggregate rejection.
//! * [`seal`] – Brands, sealed values and the validator front door.
//! * [`settings`] – Configuration for the demo binary.
//! * [`error`] – The crate error and `Result` alias.
//!
//! ## Sealing
//! A sealed value carries its brand only at the type level: the runtime
//! representation is the validated value itself, structurally untouched.
//! Downstream code that declares `Sealed<B>` arguments can therefore not be
//! fed look-alike raw values, at zero runtime cost.
//!
//! ## Quick Start
//! ```
//! use serde_json::json;
//! use sigill::seal::Validator;
//! use sigill::shape::{record, recursive, sequence};
//!
//! sigill::brand!(TreeNode);
//!
//! let tree = recursive(|node| record([("children", sequence(node))]).into());
//! let validator: Validator<TreeNode> = Validator::new(tree);
//! let sealed = validator
//!     .validate(json!({ "children": [{ "children": [] }, { "children": [] }] }))
//!     .unwrap();
//! assert_eq!(sealed["children"].as_array().unwrap().len(), 2);
//! ```
//!
//! ## Status & Roadmap
//! The checker descends recursively, so validation depth is bounded by the
//! native stack; pathologically deep input will exhaust it before the
//! checker gives up. Converting the walk to an explicit work list is the
//! known follow-up. The deferred cell assumes resolution happens on one
//! thread at a time; concurrent first use from many threads will block on
//! the cell, which is harmless but unmeasured.
//!
//! ## License
//! Dual licensed under Apache-2.0 and MIT.

pub mod engine;
pub mod error;
pub mod seal;
pub mod settings;
pub mod shape;
