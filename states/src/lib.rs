//! State runtime for the taskflow client.
//!
//! UI events mutate [`State`]s, derived values live in [`Compute`]s, and side effects run
//! as [`Command`]s whose results come back through an [`Updater`] queue. Everything is
//! applied on the thread owning the [`StateCtx`].

mod basic_state;
mod command;
mod compute;
mod ctx;
mod dep;
mod error;
mod graph;
mod snapshot;
mod state;
mod state_sync_status;
mod updater;

pub use basic_state::Time;
pub use command::{Command, CommandFuture};
pub use compute::{Compute, ComputeDeps, NO_DEPS, assign_impl};
pub use ctx::StateCtx;
pub use dep::Dep;
pub use error::Error;
pub use graph::{DepRoute, Graph, TopologyError};
pub use snapshot::CommandSnapshot;
pub use state::{State, state_assign_impl};
pub use state_sync_status::StateSyncStatus;
pub use updater::Updater;

pub use tokio_util::sync::CancellationToken;
