use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;

use crate::Error;

/// Cloned states and computes captured when a command is flushed.
///
/// Commands run asynchronously, so they never borrow the live context.
#[derive(Default)]
pub struct CommandSnapshot {
    states: BTreeMap<TypeId, Box<dyn Any + Send>>,
    computes: BTreeMap<TypeId, Box<dyn Any + Send>>,
}

impl CommandSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_state(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.states.insert(id, value);
    }

    pub(crate) fn insert_compute(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.computes.insert(id, value);
    }

    /// Builder used by tests that run a command without a context.
    pub fn with_state<T: Any + Send>(mut self, value: T) -> Self {
        self.states.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    pub fn with_compute<T: Any + Send>(mut self, value: T) -> Self {
        self.computes.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    pub fn try_state<T: Any>(&self) -> Result<&T, Error> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .ok_or_else(|| Error::state_not_found::<T>("CommandSnapshot::try_state"))
    }

    /// # Panics
    /// Panics when the state is not registered or does not provide a snapshot.
    pub fn state<T: Any>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|_| panic!("State snapshot for {} is missing", type_name::<T>()))
    }

    pub fn try_compute<T: Any>(&self) -> Result<&T, Error> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .ok_or_else(|| Error::compute_not_found::<T>("CommandSnapshot::try_compute"))
    }

    /// # Panics
    /// Panics when the compute is not registered or does not provide a snapshot.
    pub fn compute<T: Any>(&self) -> &T {
        self.try_compute::<T>()
            .unwrap_or_else(|_| panic!("Compute snapshot for {} is missing", type_name::<T>()))
    }
}
