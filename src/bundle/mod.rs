//! # Behavior Bundles
//!
//! A bundle is a named, immutable set of operations intended to be copied
//! onto any number of unrelated targets — the runtime analogue of a mixin.
//!
//! ## Architecture
//!
//! Bundles carry runtime closures, so they are defined in code through
//! [`BundleBuilder`] and registered programmatically. The declarative layer
//! is the [`BundleManifest`]: a YAML descriptor naming the operations a
//! bundle must provide, which the registry enforces at registration time.
//!
//! ```yaml
//! bundle:
//!   id: "org:managed"
//!   version: "1.0.0"
//!   description: "Report-side management relationship"
//!   tags: ["org"]
//!   operations:
//!     - name: "set_manager"
//!       arity: 1
//!     - name: "remove_manager"
//! ```
//!
//! ## Resolution flow
//!
//! 1. Code builds a `BehaviorBundle` and registers it under `"org:managed"`.
//! 2. `BundleRegistry::resolve("org:managed")` returns the bundle (aliases
//!    applied first).
//! 3. `compose` (or `BundleRegistry::compose_by_id`) copies its operations
//!    onto a target, last bundle winning on name collisions.

pub mod behavior;
pub mod manifest;
pub mod registry;

pub use behavior::{BehaviorBundle, BundleBuilder, Operation};
pub use manifest::{BundleManifest, OperationSpec};
pub use registry::{default_registry, BundleRegistry};
