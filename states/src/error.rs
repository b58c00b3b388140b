use std::any::TypeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("State not found: {name} ({id:?}), context: {context}")]
    StateNotFound {
        id: TypeId,
        name: &'static str,
        context: String,
    },
    #[error("Compute not found: {name} ({id:?}), context: {context}")]
    ComputeNotFound {
        id: TypeId,
        name: &'static str,
        context: String,
    },
    #[error("Command not registered: {name}")]
    CommandNotFound { name: &'static str },
}

impl Error {
    pub fn state_not_found<T: 'static>(context: impl Into<String>) -> Self {
        Self::StateNotFound {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            context: context.into(),
        }
    }

    pub fn compute_not_found<T: 'static>(context: impl Into<String>) -> Self {
        Self::ComputeNotFound {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            context: context.into(),
        }
    }

    pub fn command_not_found<T: 'static>() -> Self {
        Self::CommandNotFound {
            name: std::any::type_name::<T>(),
        }
    }
}
