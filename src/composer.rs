//! The composer — copies bundle operations onto a target.
//!
//! Composition is a flat, one-time copy: no hierarchy is recorded, no
//! delegation chain is consulted afterwards. For every operation name touched
//! by the given bundles, the target ends up holding the operation from the
//! last bundle (in argument order) that defines it; names not present in any
//! bundle are untouched.

use crate::bundle::BehaviorBundle;
use crate::errors::ComposeError;
use crate::target::Target;

/// Compose the given bundles onto `target`, in order.
///
/// Returns the same target handle for chaining. An empty bundle sequence is a
/// no-op. Name collisions — within the sequence or against operations already
/// on the target — are resolved silently, last writer wins.
///
/// Fails with [`ComposeError::InvalidTarget`] if the target is frozen; the
/// check happens before any bundle is applied, so a failed composition leaves
/// the target exactly as it was.
pub fn compose<'a, I>(target: &Target, bundles: I) -> Result<Target, ComposeError>
where
    I: IntoIterator<Item = &'a BehaviorBundle>,
{
    if target.is_frozen() {
        return Err(ComposeError::InvalidTarget {
            reason: "target is frozen".to_string(),
        });
    }

    for bundle in bundles {
        log::debug!(
            "composing bundle {} ({} operations) onto target",
            bundle.id(),
            bundle.len()
        );
        for (name, op) in bundle.entries() {
            target.bind_operation(name, op.clone());
        }
    }

    Ok(target.clone())
}
