use std::any::{Any, TypeId};

use crate::{Dep, Updater};

/// `(state dependencies, compute dependencies)`.
pub type ComputeDeps = (Vec<TypeId>, Vec<TypeId>);

/// A derived or command-fed cached value.
///
/// Derived computes declare their dependencies and recalculate whenever one of them is
/// marked dirty. Command-fed caches declare no dependencies and keep `compute` a no-op;
/// their value only changes through [`Updater::set`].
pub trait Compute: Any {
    fn deps(&self) -> ComputeDeps;

    fn compute(&self, deps: Dep<'_>, updater: Updater);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Shorthand for computes without dependencies.
pub const NO_DEPS: ComputeDeps = (Vec::new(), Vec::new());

pub fn assign_impl<T: Any>(target: &mut T, new_self: Box<dyn Any + Send>) {
    crate::state_assign_impl(target, new_self);
}
