//! Reactive Runtime
//!
//! This module provides the core reactive runtime for managing Signal dependencies,
//! Computed invalidation and Effect scheduling.
//!
//! ## Architecture
//!
//! 1. **Observer Stack**: Tracks the currently evaluating Computed or Effect
//! 2. **Dependency Tracking**: Records an edge whenever a Signal or Computed is read
//!    while an observer is active
//! 3. **Eager Invalidation**: A write walks the subscriber edges, marking computed
//!    nodes stale and queueing effects
//! 4. **Batched Flush**: Queued effects run once the outermost write or batch returns
//!
//! The runtime lives in thread-local storage. Rendering is single-threaded and the
//! host serializes render calls, so one runtime per thread is one runtime per engine.

use core::cell::{Cell, RefCell};
use core::sync::atomic::{AtomicUsize, Ordering};
use std::collections::BTreeMap;

use super::error::ReactiveError;

/// Unique identifier for reactive nodes (Signals, Computed values, Effects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Create a new unique NodeId
	pub fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for NodeId {
	fn default() -> Self {
		Self::new()
	}
}

/// Type of reactive node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
	/// A source node
	Signal,
	/// A lazily re-evaluated derived value
	Computed,
	/// A side effect re-run when dependencies change
	Effect,
}

/// Observer represents a currently evaluating Computed or Effect
#[derive(Debug, Clone, Copy)]
pub struct Observer {
	/// Unique identifier for this observer
	pub id: NodeId,
	/// Type of this observer
	pub node_type: NodeType,
}

/// Dependency graph node
#[derive(Debug)]
pub(crate) struct DependencyNode {
	pub(crate) node_type: NodeType,
	/// IDs of nodes that depend on this node
	pub(crate) subscribers: Vec<NodeId>,
	/// IDs of nodes this node depends on, in first-read order
	pub(crate) dependencies: Vec<NodeId>,
	/// Set on computed nodes when a transitive source changed
	pub(crate) stale: bool,
}

impl DependencyNode {
	fn new(node_type: NodeType) -> Self {
		Self {
			node_type,
			subscribers: Vec::new(),
			dependencies: Vec::new(),
			stale: false,
		}
	}
}

/// Global reactive runtime
///
/// This struct manages the reactive dependency graph, the global version counter
/// and effect scheduling.
pub struct Runtime {
	/// Observer stack for tracking currently executing computations
	observer_stack: RefCell<Vec<Observer>>,
	/// Dependency graph: NodeId -> DependencyNode
	pub(crate) dependency_graph: RefCell<BTreeMap<NodeId, DependencyNode>>,
	/// Effects queued by writes, flushed in insertion order
	pub(crate) pending_effects: RefCell<Vec<NodeId>>,
	/// Incremented on every effective write
	global_version: Cell<u64>,
	/// Nesting depth of writes and batches
	batch_depth: Cell<usize>,
	/// Nesting depth of computed evaluations
	evaluation_depth: Cell<usize>,
	/// Set when a cycle is detected anywhere inside the current evaluation chain
	cycle_detected: Cell<bool>,
	/// Whether the effect queue is currently being drained
	pub(crate) flushing: Cell<bool>,
}

impl Runtime {
	/// Create a new Runtime instance
	pub fn new() -> Self {
		Self {
			observer_stack: RefCell::new(Vec::new()),
			dependency_graph: RefCell::new(BTreeMap::new()),
			pending_effects: RefCell::new(Vec::new()),
			global_version: Cell::new(0),
			batch_depth: Cell::new(0),
			evaluation_depth: Cell::new(0),
			cycle_detected: Cell::new(false),
			flushing: Cell::new(false),
		}
	}

	/// Registers a node of the given type in the dependency graph.
	pub fn register_node(&self, id: NodeId, node_type: NodeType) {
		self.dependency_graph
			.borrow_mut()
			.entry(id)
			.or_insert_with(|| DependencyNode::new(node_type));
	}

	/// Get the current observer (the currently evaluating Computed or Effect)
	pub fn current_observer(&self) -> Option<NodeId> {
		self.observer_stack
			.borrow()
			.last()
			.map(|observer| observer.id)
	}

	/// Push an observer onto the stack
	pub fn push_observer(&self, observer: Observer) {
		self.observer_stack.borrow_mut().push(observer);
	}

	/// Pop an observer from the stack
	pub fn pop_observer(&self) -> Option<Observer> {
		self.observer_stack.borrow_mut().pop()
	}

	pub(crate) fn take_observers(&self) -> Vec<Observer> {
		core::mem::take(&mut *self.observer_stack.borrow_mut())
	}

	pub(crate) fn restore_observers(&self, observers: Vec<Observer>) {
		*self.observer_stack.borrow_mut() = observers;
	}

	/// Track a dependency between the current observer and a source or computed node
	///
	/// This is called automatically by `Signal::get()` and `Computed::get()`.
	pub fn track_dependency(&self, source_id: NodeId) {
		let Some(observer_id) = self.current_observer() else {
			return;
		};
		if observer_id == source_id {
			return;
		}
		let mut graph = self.dependency_graph.borrow_mut();

		let source_node = graph
			.entry(source_id)
			.or_insert_with(|| DependencyNode::new(NodeType::Signal));
		if !source_node.subscribers.contains(&observer_id) {
			source_node.subscribers.push(observer_id);
		}

		let observer_node = graph
			.entry(observer_id)
			.or_insert_with(|| DependencyNode::new(NodeType::Effect));
		if !observer_node.dependencies.contains(&source_id) {
			observer_node.dependencies.push(source_id);
		}
	}

	/// Returns the dependencies recorded for a node by its last evaluation.
	pub fn dependencies_of(&self, node_id: NodeId) -> Vec<NodeId> {
		self.dependency_graph
			.borrow()
			.get(&node_id)
			.map(|node| node.dependencies.clone())
			.unwrap_or_default()
	}

	/// Current value of the global version counter
	pub fn global_version(&self) -> u64 {
		self.global_version.get()
	}

	/// Records a write to `source_id` and invalidates everything downstream.
	///
	/// Computed dependents are marked stale transitively; effects reached by the
	/// walk are queued. Returns the new global version.
	pub fn notify_write(&self, source_id: NodeId) -> u64 {
		let version = self.global_version.get() + 1;
		self.global_version.set(version);

		let mut graph = self.dependency_graph.borrow_mut();
		let mut queue: Vec<NodeId> = graph
			.get(&source_id)
			.map(|node| node.subscribers.clone())
			.unwrap_or_default();
		let mut pending = self.pending_effects.borrow_mut();

		while let Some(id) = queue.pop() {
			let Some(node) = graph.get_mut(&id) else {
				continue;
			};
			match node.node_type {
				NodeType::Computed => {
					if !node.stale {
						node.stale = true;
						queue.extend(node.subscribers.iter().copied());
					}
				}
				NodeType::Effect => {
					if !pending.contains(&id) {
						pending.push(id);
					}
				}
				NodeType::Signal => {}
			}
		}

		version
	}

	/// Whether a computed node must be re-evaluated before its next read
	pub fn is_stale(&self, node_id: NodeId) -> bool {
		self.dependency_graph
			.borrow()
			.get(&node_id)
			.is_some_and(|node| node.stale)
	}

	pub(crate) fn mark_fresh(&self, node_id: NodeId) {
		if let Some(node) = self.dependency_graph.borrow_mut().get_mut(&node_id) {
			node.stale = false;
		}
	}

	pub(crate) fn begin_batch(&self) {
		self.batch_depth.set(self.batch_depth.get() + 1);
	}

	/// Closes one batch level; returns true when queued effects should be flushed now.
	pub(crate) fn end_batch(&self) -> bool {
		let depth = self.batch_depth.get().saturating_sub(1);
		self.batch_depth.set(depth);
		depth == 0 && !self.flushing.get() && !self.pending_effects.borrow().is_empty()
	}

	/// Enters a computed evaluation, failing once the nesting bound is exceeded.
	pub(crate) fn enter_evaluation(&self, limit: usize) -> Result<(), ReactiveError> {
		let depth = self.evaluation_depth.get() + 1;
		if depth > limit {
			self.cycle_detected.set(true);
			return Err(ReactiveError::Cycle { limit });
		}
		self.evaluation_depth.set(depth);
		Ok(())
	}

	/// Leaves a computed evaluation; returns true when this was the outermost one.
	pub(crate) fn exit_evaluation(&self) -> bool {
		let depth = self.evaluation_depth.get().saturating_sub(1);
		self.evaluation_depth.set(depth);
		depth == 0
	}

	pub(crate) fn flag_cycle(&self) {
		self.cycle_detected.set(true);
	}

	/// Returns and clears the cycle flag.
	pub(crate) fn take_cycle_flag(&self) -> bool {
		self.cycle_detected.replace(false)
	}

	/// Clear dependencies for a node
	///
	/// This is called before re-evaluating a Computed or re-running an Effect so the
	/// dependency set reflects only the latest evaluation.
	pub fn clear_dependencies(&self, node_id: NodeId) {
		let mut graph = self.dependency_graph.borrow_mut();

		let dependencies = match graph.get_mut(&node_id) {
			Some(node) => core::mem::take(&mut node.dependencies),
			None => return,
		};

		for dep_id in dependencies {
			if let Some(dep_node) = graph.get_mut(&dep_id) {
				dep_node.subscribers.retain(|&id| id != node_id);
			}
		}
	}

	/// Remove a node from the dependency graph
	///
	/// This should be called when a Signal/Computed/Effect is dropped.
	pub fn remove_node(&self, node_id: NodeId) {
		self.clear_dependencies(node_id);
		self.pending_effects.borrow_mut().retain(|&id| id != node_id);
		self.dependency_graph.borrow_mut().remove(&node_id);
	}

	/// Check if a node exists in the dependency graph
	pub fn has_node(&self, node_id: NodeId) -> bool {
		self.dependency_graph.borrow().contains_key(&node_id)
	}

	/// Get the number of subscribers for a node
	pub fn subscriber_count(&self, node_id: NodeId) -> usize {
		self.dependency_graph
			.borrow()
			.get(&node_id)
			.map(|node| node.subscribers.len())
			.unwrap_or(0)
	}

	/// Number of effects waiting for the next flush
	pub fn pending_effect_count(&self) -> usize {
		self.pending_effects.borrow().len()
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new()
	}
}

// Thread-local runtime instance
//
// Each rendering thread owns one runtime; nodes never cross threads.
thread_local! {
	static RUNTIME: Runtime = Runtime::new();
}

/// Get a reference to the thread's runtime
///
/// # Example
///
/// ```ignore
/// use tessera_core::reactive::with_runtime;
///
/// with_runtime(|rt| {
///     rt.track_dependency(signal_id);
/// });
/// ```
pub fn with_runtime<F, R>(f: F) -> R
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.with(f)
}

/// Try to access the runtime (safe version for Drop implementations)
///
/// Returns None if the thread-local storage has been destroyed.
pub(crate) fn try_with_runtime<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.try_with(f).ok()
}
