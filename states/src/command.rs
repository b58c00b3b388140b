use std::any::Any;
use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::{CommandSnapshot, Updater};

pub type CommandFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A manual-only side effect (network IO, timers).
///
/// Commands never run implicitly: they are queued with `StateCtx::enqueue_command` and
/// started by `StateCtx::flush_commands`. Results flow back through the [`Updater`].
pub trait Command: Any + Send + Sync {
    fn run(&self, snap: CommandSnapshot, updater: Updater, cancel: CancellationToken)
    -> CommandFuture;
}
