use std::any::{TypeId, type_name};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

use flume::Receiver;
use log::{debug, error, warn};
use tokio_util::sync::CancellationToken;

use crate::updater::Update;
use crate::{
    Command, CommandSnapshot, Compute, Dep, Error, Graph, State, StateSyncStatus, TopologyError,
    Updater,
};

/// Owner of every state, compute and command of the client.
///
/// All mutation happens on the thread that owns the context. Async commands publish
/// their results through an [`Updater`]; the queue is drained by
/// [`StateCtx::sync_computes`], typically once per frame.
pub struct StateCtx {
    states: BTreeMap<TypeId, Box<dyn State>>,
    computes: BTreeMap<TypeId, Box<dyn Compute>>,
    status: BTreeMap<TypeId, StateSyncStatus>,
    graph: Graph<TypeId>,

    commands: BTreeMap<TypeId, Arc<dyn Command>>,
    queued: VecDeque<(TypeId, &'static str)>,

    updater: Updater,
    recv: Receiver<Update>,

    cancel: CancellationToken,
    #[cfg(not(target_arch = "wasm32"))]
    tasks: tokio::task::JoinSet<()>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCtx")
            .field("states", &self.states.len())
            .field("computes", &self.computes.len())
            .field("commands", &self.commands.len())
            .field("queued", &self.queued.len())
            .finish_non_exhaustive()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (updater, recv) = Updater::channel();

        Self {
            states: BTreeMap::new(),
            computes: BTreeMap::new(),
            status: BTreeMap::new(),
            graph: Graph::new(),
            commands: BTreeMap::new(),
            queued: VecDeque::new(),
            updater,
            recv,
            cancel: CancellationToken::new(),
            #[cfg(not(target_arch = "wasm32"))]
            tasks: tokio::task::JoinSet::new(),
        }
    }

    // =====================
    // States
    // =====================

    pub fn add_state<T: State>(&mut self, state: T) {
        let id = TypeId::of::<T>();
        self.graph.add_node(id);
        self.states.insert(id, Box::new(state));
        self.mark_dependents_dirty(id);
    }

    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.as_any().downcast_ref::<T>())
            .ok_or_else(|| Error::state_not_found::<T>("StateCtx::state"))
    }

    /// # Panics
    /// Panics if `T` was never registered.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|_| panic!("State {} is not registered", type_name::<T>()))
    }

    /// Mutable access. Computes reading `T` are marked dirty.
    ///
    /// # Panics
    /// Panics if `T` was never registered.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        let id = TypeId::of::<T>();
        self.mark_dependents_dirty(id);
        self.states
            .get_mut(&id)
            .and_then(|boxed| boxed.as_any_mut().downcast_mut::<T>())
            .unwrap_or_else(|| panic!("State {} is not registered", type_name::<T>()))
    }

    pub fn update<T: State, R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        f(self.state_mut::<T>())
    }

    // =====================
    // Computes
    // =====================

    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        let id = TypeId::of::<T>();
        let (state_deps, compute_deps) = compute.deps();

        self.graph.add_node(id);
        for dep in state_deps.iter().chain(compute_deps.iter()) {
            self.graph.route_to(*dep, id);
        }

        let status = if state_deps.is_empty() && compute_deps.is_empty() {
            StateSyncStatus::Clean
        } else {
            StateSyncStatus::BeforeInit
        };

        self.computes.insert(id, Box::new(compute));
        self.status.insert(id, status);
    }

    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.as_any().downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if `T` was never recorded.
    pub fn compute<T: Compute>(&self) -> &T {
        self.cached::<T>()
            .unwrap_or_else(|| panic!("Compute {} is not registered", type_name::<T>()))
    }

    pub fn compute_status<T: Compute>(&self) -> Option<StateSyncStatus> {
        self.status.get(&TypeId::of::<T>()).copied()
    }

    pub fn verify_deps(&self) -> Result<(), TopologyError<TypeId>> {
        self.graph.topology_sort().map(|_| ())
    }

    /// Recalculate every dirty compute, dependencies first.
    pub fn run_computed(&mut self) {
        let order = match self.graph.topology_sort() {
            Ok(order) => order,
            Err(err) => {
                error!("run_computed: {err}");
                return;
            }
        };

        for id in order {
            let needs_run = matches!(
                self.status.get(&id),
                Some(StateSyncStatus::Dirty | StateSyncStatus::BeforeInit)
            );
            if !needs_run {
                continue;
            }

            if let Some(compute) = self.computes.get(&id) {
                compute.compute(Dep::new(&self.states, &self.computes), self.updater.clone());
            }
            self.status.insert(id, StateSyncStatus::Clean);

            // Downstream computes must observe the fresh value.
            self.sync_computes();
        }
    }

    // =====================
    // Updates
    // =====================

    pub fn updater(&self) -> Updater {
        self.updater.clone()
    }

    /// Apply every queued update. Returns the number applied.
    pub fn sync_computes(&mut self) -> usize {
        let pending: Vec<Update> = self.recv.try_iter().collect();
        let mut touched = BTreeSet::new();

        for update in pending {
            let id = update.target();
            let name = update.name();

            let applied = if let Some(state) = self.states.get_mut(&id) {
                match update {
                    Update::Replace(_, _, value) => state.assign_box(value),
                    Update::Mutate(_, _, f) => f(state.as_any_mut()),
                }
                true
            } else if let Some(compute) = self.computes.get_mut(&id) {
                match update {
                    Update::Replace(_, _, value) => compute.assign_box(value),
                    Update::Mutate(_, _, f) => f(compute.as_any_mut()),
                }
                true
            } else {
                false
            };

            if applied {
                touched.insert(id);
            } else {
                warn!("sync_computes: {name} is not registered, update dropped");
            }
        }

        for id in &touched {
            self.mark_dependents_dirty(*id);
        }
        touched.len()
    }

    fn mark_dependents_dirty(&mut self, id: TypeId) {
        for dependent in self.graph.dependents(id) {
            if let Some(status) = self.status.get_mut(&dependent) {
                *status = StateSyncStatus::Dirty;
            }
        }
    }

    // =====================
    // Commands
    // =====================

    pub fn record_command<T: Command>(&mut self, command: T) {
        self.commands.insert(TypeId::of::<T>(), Arc::new(command));
    }

    pub fn enqueue_command<T: Command>(&mut self) {
        self.queued.push_back((TypeId::of::<T>(), type_name::<T>()));
    }

    /// Enqueue and immediately start `T`.
    pub fn dispatch<T: Command>(&mut self) {
        self.enqueue_command::<T>();
        self.flush_commands();
    }

    pub fn queued_commands(&self) -> usize {
        self.queued.len()
    }

    /// Start every queued command with a fresh snapshot of the context.
    pub fn flush_commands(&mut self) {
        while let Some((id, name)) = self.queued.pop_front() {
            let Some(command) = self.commands.get(&id).cloned() else {
                error!("flush_commands: {name} was enqueued but never recorded");
                continue;
            };

            debug!("flush_commands: starting {name}");
            let future = command.run(
                self.snapshot(),
                self.updater.clone(),
                self.cancel.child_token(),
            );

            #[cfg(not(target_arch = "wasm32"))]
            self.tasks.spawn(future);

            #[cfg(target_arch = "wasm32")]
            wasm_bindgen_futures::spawn_local(future);
        }
    }

    fn snapshot(&self) -> CommandSnapshot {
        let mut snap = CommandSnapshot::new();
        for (id, state) in &self.states {
            if let Some(cloned) = state.snapshot() {
                snap.insert_state(*id, cloned);
            }
        }
        for (id, compute) in &self.computes {
            if let Some(cloned) = compute.snapshot() {
                snap.insert_compute(*id, cloned);
            }
        }
        snap
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn task_set_mut(&mut self) -> &mut tokio::task::JoinSet<()> {
        &mut self.tasks
    }

    /// Cancel in-flight commands and wait for them to stop.
    pub async fn shutdown(&mut self) {
        self.cancel.cancel();
        #[cfg(not(target_arch = "wasm32"))]
        self.tasks.shutdown().await;
        self.queued.clear();
    }
}
