use std::any::{Any, TypeId, type_name};
use std::fmt::{Debug, Formatter};

use flume::{Receiver, Sender};
use log::warn;

type Mutation = Box<dyn FnOnce(&mut dyn Any) + Send>;

/// A queued change, applied by `StateCtx::sync_computes`.
pub(crate) enum Update {
    Replace(TypeId, &'static str, Box<dyn Any + Send>),
    Mutate(TypeId, &'static str, Mutation),
}

impl Update {
    pub(crate) fn target(&self) -> TypeId {
        match self {
            Self::Replace(id, ..) | Self::Mutate(id, ..) => *id,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Replace(_, name, _) | Self::Mutate(_, name, _) => name,
        }
    }
}

/// Cloneable handle used by commands and computes to publish changes.
///
/// Nothing is applied until the owning context drains the queue, so every mutation
/// happens on the event-processing thread.
#[derive(Clone)]
pub struct Updater {
    send: Sender<Update>,
}

impl Debug for Updater {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Updater")
            .field("queued", &self.send.len())
            .finish()
    }
}

impl Updater {
    pub(crate) fn channel() -> (Self, Receiver<Update>) {
        let (send, recv) = flume::unbounded();
        (Self { send }, recv)
    }

    /// Replace the registered state or compute of type `T`.
    pub fn set<T: Any + Send>(&self, value: T) {
        self.push(Update::Replace(
            TypeId::of::<T>(),
            type_name::<T>(),
            Box::new(value),
        ));
    }

    /// Apply `f` to the registered state or compute of type `T`.
    pub fn update<T: Any>(&self, f: impl FnOnce(&mut T) + Send + 'static) {
        let mutation: Mutation = Box::new(move |any: &mut dyn Any| {
            if let Some(target) = any.downcast_mut::<T>() {
                f(target);
            }
        });
        self.push(Update::Mutate(TypeId::of::<T>(), type_name::<T>(), mutation));
    }

    fn push(&self, update: Update) {
        let name = update.name();
        if self.send.send(update).is_err() {
            warn!("Updater: context dropped, discarding update for {name}");
        }
    }
}
