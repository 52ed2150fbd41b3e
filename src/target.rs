//! Behavior-holders — the objects bundles are composed onto.
//!
//! A [`Target`] is a cheaply cloneable handle over two tables: an operation
//! table (`name -> Operation`) consulted by [`Target::invoke`], and a field
//! table (`name -> Slot`) that operations read and write through their
//! receiver. Cloning a handle never copies the tables; all clones observe the
//! same object, and [`Target::same`] tells two handles to one object apart
//! from handles to two objects.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::bundle::Operation;
use crate::errors::InvokeError;

/// The payload a field or operation argument can hold.
///
/// Plain data travels as [`serde_json::Value`]; the `Object` variant lets an
/// operation hold and mutate a counterpart target (for example a manager
/// keeping a handle to its last-added report).
#[derive(Clone)]
pub enum Slot {
    /// A plain JSON value.
    Value(Value),
    /// A handle to another target.
    Object(Target),
}

impl Slot {
    /// The null value slot.
    pub fn null() -> Self {
        Slot::Value(Value::Null)
    }

    /// Borrow the JSON payload, if this slot holds plain data.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Slot::Value(v) => Some(v),
            Slot::Object(_) => None,
        }
    }

    /// Borrow the target handle, if this slot holds an object.
    pub fn as_object(&self) -> Option<&Target> {
        match self {
            Slot::Object(t) => Some(t),
            Slot::Value(_) => None,
        }
    }
}

impl From<Value> for Slot {
    fn from(value: Value) -> Self {
        Slot::Value(value)
    }
}

impl From<Target> for Slot {
    fn from(target: Target) -> Self {
        Slot::Object(target)
    }
}

impl PartialEq for Slot {
    /// Values compare structurally; objects compare by handle identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Slot::Value(a), Slot::Value(b)) => a == b,
            (Slot::Object(a), Slot::Object(b)) => a.same(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Value(v) => write!(f, "Value({v})"),
            Slot::Object(t) => write!(f, "Object({t:?})"),
        }
    }
}

struct TargetInner {
    operations: RwLock<HashMap<String, Operation>>,
    fields: RwLock<HashMap<String, Slot>>,
    frozen: AtomicBool,
}

/// A behavior-holder: an operation table plus a field table behind a shared
/// handle.
///
/// Targets start out open; [`Target::freeze`] permanently closes the
/// operation table, after which composition fails with
/// `ComposeError::InvalidTarget`.
#[derive(Clone)]
pub struct Target {
    inner: Arc<TargetInner>,
}

impl Target {
    /// Create a new empty, unfrozen target.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TargetInner {
                operations: RwLock::new(HashMap::new()),
                fields: RwLock::new(HashMap::new()),
                frozen: AtomicBool::new(false),
            }),
        }
    }

    /// Whether two handles refer to the same underlying object.
    pub fn same(&self, other: &Target) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Permanently close the operation table to new bindings.
    ///
    /// Fields stay writable; only composition is refused from here on.
    pub fn freeze(&self) {
        self.inner.frozen.store(true, Ordering::SeqCst);
    }

    /// Whether the operation table is closed to new bindings.
    pub fn is_frozen(&self) -> bool {
        self.inner.frozen.load(Ordering::SeqCst)
    }

    /// Set a named field, replacing any previous value.
    pub fn set_field(&self, name: impl Into<String>, value: impl Into<Slot>) {
        self.inner.fields.write().insert(name.into(), value.into());
    }

    /// Read a named field.
    pub fn field(&self, name: &str) -> Option<Slot> {
        self.inner.fields.read().get(name).cloned()
    }

    /// Remove a named field, returning its previous value.
    pub fn remove_field(&self, name: &str) -> Option<Slot> {
        self.inner.fields.write().remove(name)
    }

    /// Whether an operation with this name is bound.
    pub fn has_operation(&self, name: &str) -> bool {
        self.inner.operations.read().contains_key(name)
    }

    /// Names of all bound operations, sorted.
    pub fn operation_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.operations.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Dispatch a bound operation with this target as the receiver.
    ///
    /// The operation table lock is released before the operation body runs,
    /// so operations may freely invoke on their own receiver.
    pub fn invoke(&self, name: &str, args: &[Slot]) -> Result<Slot, InvokeError> {
        let op = {
            let ops = self.inner.operations.read();
            ops.get(name).cloned()
        };
        match op {
            Some(op) => op(self, args),
            None => Err(InvokeError::UnknownOperation {
                name: name.to_string(),
            }),
        }
    }

    /// Write an operation binding, overwriting any previous one.
    ///
    /// Callers are expected to have checked `is_frozen` first; the composer
    /// validates once up front rather than per entry.
    pub(crate) fn bind_operation(&self, name: &str, op: Operation) {
        self.inner.operations.write().insert(name.to_string(), op);
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("operations", &self.operation_names())
            .field("frozen", &self.is_frozen())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_set_get_remove() {
        let target = Target::new();
        target.set_field("name", json!("alice"));

        assert_eq!(target.field("name"), Some(Slot::Value(json!("alice"))));
        assert_eq!(target.field("missing"), None);

        let removed = target.remove_field("name");
        assert_eq!(removed, Some(Slot::Value(json!("alice"))));
        assert_eq!(target.field("name"), None);
    }

    #[test]
    fn test_handle_identity() {
        let a = Target::new();
        let b = a.clone();
        let c = Target::new();

        assert!(a.same(&b));
        assert!(!a.same(&c));

        // Clones observe the same field table
        b.set_field("x", json!(1));
        assert_eq!(a.field("x"), Some(Slot::Value(json!(1))));
    }

    #[test]
    fn test_invoke_unknown_operation() {
        let target = Target::new();
        let err = target.invoke("nope", &[]).unwrap_err();
        assert!(matches!(err, InvokeError::UnknownOperation { name } if name == "nope"));
    }

    #[test]
    fn test_freeze_keeps_fields_writable() {
        let target = Target::new();
        target.freeze();
        assert!(target.is_frozen());

        target.set_field("still", json!("writable"));
        assert_eq!(target.field("still"), Some(Slot::Value(json!("writable"))));
    }

    #[test]
    fn test_slot_equality() {
        let t = Target::new();
        assert_eq!(Slot::Value(json!(42)), Slot::Value(json!(42)));
        assert_ne!(Slot::Value(json!(42)), Slot::null());
        assert_eq!(Slot::Object(t.clone()), Slot::Object(t.clone()));
        assert_ne!(Slot::Object(t), Slot::Object(Target::new()));
    }
}
