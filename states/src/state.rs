use std::any::{Any, type_name};

use log::error;

/// A value stored once per type inside [`crate::StateCtx`].
///
/// Inputs (form fields, edit buffers, navigation) are states. They are mutated on the
/// event-processing thread through `StateCtx::state_mut` / `StateCtx::update`, or from
/// async commands through [`crate::Updater`].
pub trait State: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Cloned copy handed to commands at flush time.
    ///
    /// Returning `None` keeps the state out of command snapshots (e.g. values holding
    /// GPU textures).
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Replace `target` with `new_self` if the boxed value has the same type.
pub fn state_assign_impl<T: Any>(target: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(value) => *target = *value,
        Err(_) => error!("assign_box: type mismatch for {}", type_name::<T>()),
    }
}
