//! # capmix
//!
//! Runtime capability composition: named bundles of behavior applied onto
//! mutable targets, with last-writer-wins override semantics.
//!
//! A [`Target`] is a behavior-holder — an operation table plus a field table
//! behind a cheap handle. A [`BehaviorBundle`] is an immutable mixin: a named
//! set of operations. [`compose`] copies every operation of every bundle onto
//! a target in order, later bundles silently overriding earlier ones on name
//! collision; nothing else on the target is touched. Composition is a flat,
//! one-time copy — no hierarchy is recorded and no delegation chain exists.
//!
//! ```
//! use capmix::{compose, BehaviorBundle, Slot, Target};
//! use serde_json::json;
//!
//! let greeter = BehaviorBundle::builder("demo:greeter")
//!     .operation("greet", |receiver, _| {
//!         let name = receiver
//!             .field("name")
//!             .and_then(|s| s.as_value().and_then(|v| v.as_str().map(String::from)))
//!             .unwrap_or_default();
//!         Ok(Slot::Value(json!(format!("hello, {name}"))))
//!     })
//!     .build();
//!
//! let target = Target::new();
//! target.set_field("name", json!("alice"));
//! compose(&target, [&greeter]).unwrap();
//!
//! assert_eq!(
//!     target.invoke("greet", &[]).unwrap(),
//!     Slot::Value(json!("hello, alice"))
//! );
//! ```
//!
//! Bundles can also be resolved by namespaced id through a
//! [`BundleRegistry`], optionally constrained by YAML [`BundleManifest`]
//! contracts.
//!
//! Everything is synchronous and non-suspending. Target internals are behind
//! locks, so concurrent use is memory-safe, but callers who compose onto a
//! target from several threads get no ordering guarantee: compose before
//! publishing the target, or serialize compositions externally.

pub mod bundle;
pub mod composer;
pub mod errors;
pub mod target;

pub use bundle::{
    default_registry, BehaviorBundle, BundleBuilder, BundleManifest, BundleRegistry, Operation,
    OperationSpec,
};
pub use composer::compose;
pub use errors::{ComposeError, InvokeError, ManifestError};
pub use target::{Slot, Target};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
