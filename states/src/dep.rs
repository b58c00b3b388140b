use std::any::{TypeId, type_name};
use std::collections::BTreeMap;

use crate::{Compute, Error, State};

/// Read-only view of the context handed to `Compute::compute`.
pub struct Dep<'a> {
    states: &'a BTreeMap<TypeId, Box<dyn State>>,
    computes: &'a BTreeMap<TypeId, Box<dyn Compute>>,
}

impl<'a> Dep<'a> {
    pub(crate) fn new(
        states: &'a BTreeMap<TypeId, Box<dyn State>>,
        computes: &'a BTreeMap<TypeId, Box<dyn Compute>>,
    ) -> Self {
        Self { states, computes }
    }

    pub fn try_state<T: State>(&self) -> Result<&'a T, Error> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.as_any().downcast_ref::<T>())
            .ok_or_else(|| Error::state_not_found::<T>("Dep::try_state"))
    }

    /// # Panics
    /// Panics if `T` was never registered with `StateCtx::add_state`.
    pub fn state<T: State>(&self) -> &'a T {
        self.try_state::<T>()
            .unwrap_or_else(|_| panic!("State {} is not registered", type_name::<T>()))
    }

    pub fn try_compute<T: Compute>(&self) -> Result<&'a T, Error> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.as_any().downcast_ref::<T>())
            .ok_or_else(|| Error::compute_not_found::<T>("Dep::try_compute"))
    }

    /// # Panics
    /// Panics if `T` was never registered with `StateCtx::record_compute`.
    pub fn compute<T: Compute>(&self) -> &'a T {
        self.try_compute::<T>()
            .unwrap_or_else(|_| panic!("Compute {} is not registered", type_name::<T>()))
    }
}
