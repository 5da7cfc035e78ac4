//! Reactive runtime: dependency graph, observer stack, update scheduling.
//!
//! The runtime implements a pull-based reactivity model in the Solid/Leptos
//! family:
//!
//! 1. **Observer stack** - tracks the currently executing Effect or Memo.
//! 2. **Dependency tracking** - `Signal::get()` records an edge between the
//!    signal and the current observer.
//! 3. **Update scheduling** - signal writes enqueue dependent observers;
//!    layout effects run synchronously, passive effects run on the next
//!    flush.
//! 4. **Injectable scheduler** - in the browser, flushes are driven by a
//!    microtask; without a scheduler installed, `flush_updates` is called
//!    manually (the mode every native test uses).
//!
//! The runtime lives in thread-local storage. WASM has a single thread, so
//! this is effectively a global; native threads each get their own graph.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Unique identifier for reactive nodes (signals, effects, memos).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Allocates a fresh id. Ids are unique per process, never reused.
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

/// Kind of reactive node an observer represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
	/// A signal node (source of reactivity).
	Signal,
	/// An effect node (side effect re-run on dependency change).
	Effect,
	/// A memo node (cached computation).
	Memo,
}

/// When an effect executes relative to a signal write.
///
/// Layout effects run synchronously inside the write; passive effects are
/// queued and run on the next flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectTiming {
	/// Runs synchronously before control returns from the signal write.
	Layout,
	/// Runs on the next scheduled flush (microtask in the browser).
	#[default]
	Passive,
}

/// A currently executing Effect or Memo, as seen by dependency tracking.
#[derive(Debug, Clone, Copy)]
pub struct Observer {
	/// Id of the executing node.
	pub id: NodeId,
	/// Kind of the executing node.
	pub node_type: NodeType,
	/// Execution timing (meaningful for effects).
	pub timing: EffectTiming,
}

/// One node's edges in the dependency graph.
#[derive(Debug, Default)]
pub(crate) struct DependencyNode {
	/// Nodes that must re-run when this node changes.
	pub(crate) subscribers: Vec<NodeId>,
	/// Nodes this node read during its last run.
	pub(crate) dependencies: Vec<NodeId>,
}

type SchedulerFn = Box<dyn Fn(Box<dyn FnOnce() + Send>) + Send + Sync>;

static SCHEDULER: OnceLock<SchedulerFn> = OnceLock::new();

/// Installs the global flush scheduler. Call once at application startup.
///
/// In the browser this is a microtask spawner
/// (`wasm_bindgen_futures::spawn_local`); see `grappelli::platform::init_scheduler`.
/// With no scheduler installed, pending updates accumulate until
/// [`Runtime::flush_updates`] is invoked manually, which is the mode native
/// tests run in.
pub fn set_scheduler<F>(scheduler: F)
where
	F: Fn(Box<dyn FnOnce() + Send>) + Send + Sync + 'static,
{
	let _ = SCHEDULER.set(Box::new(scheduler));
}

/// Thread-local reactive runtime.
///
/// Owns the dependency graph and the pending-update queue. All access goes
/// through [`with_runtime`].
pub struct Runtime {
	/// Stack of currently executing observers; the top receives tracked reads.
	observer_stack: RefCell<Vec<Observer>>,
	/// NodeId -> edges.
	pub(crate) dependency_graph: RefCell<BTreeMap<NodeId, DependencyNode>>,
	/// Observers awaiting re-execution on the next flush.
	pub(crate) pending_updates: RefCell<Vec<NodeId>>,
	/// Whether a flush has already been handed to the scheduler.
	pub(crate) update_scheduled: RefCell<bool>,
	/// Depth of nested `untrack` calls; reads are ignored while > 0.
	untracked_depth: Cell<usize>,
}

impl Runtime {
	pub fn new() -> Self {
		Self {
			observer_stack: RefCell::new(Vec::new()),
			dependency_graph: RefCell::new(BTreeMap::new()),
			pending_updates: RefCell::new(Vec::new()),
			update_scheduled: RefCell::new(false),
			untracked_depth: Cell::new(0),
		}
	}

	/// The observer currently on top of the stack, if any.
	pub fn current_observer(&self) -> Option<NodeId> {
		self.observer_stack
			.borrow()
			.last()
			.map(|observer| observer.id)
	}

	/// Pushes an observer; called when an Effect/Memo begins executing.
	pub fn push_observer(&self, observer: Observer) {
		self.observer_stack.borrow_mut().push(observer);
	}

	/// Pops the top observer; called when an Effect/Memo finishes executing.
	pub fn pop_observer(&self) -> Option<Observer> {
		self.observer_stack.borrow_mut().pop()
	}

	pub(crate) fn pause_tracking(&self) {
		self.untracked_depth.set(self.untracked_depth.get() + 1);
	}

	pub(crate) fn resume_tracking(&self) {
		let depth = self.untracked_depth.get();
		debug_assert!(depth > 0, "resume_tracking without pause_tracking");
		self.untracked_depth.set(depth.saturating_sub(1));
	}

	/// Records an edge between `signal_id` and the current observer.
	///
	/// No-op when no observer is executing or tracking is paused.
	pub fn track_dependency(&self, signal_id: NodeId) {
		if self.untracked_depth.get() > 0 {
			return;
		}
		if let Some(observer_id) = self.current_observer() {
			let mut graph = self.dependency_graph.borrow_mut();

			let signal_node = graph.entry(signal_id).or_default();
			if !signal_node.subscribers.contains(&observer_id) {
				signal_node.subscribers.push(observer_id);
			}

			let observer_node = graph.entry(observer_id).or_default();
			if !observer_node.dependencies.contains(&signal_id) {
				observer_node.dependencies.push(signal_id);
			}
		}
	}

	/// Notifies subscribers that `signal_id` changed.
	///
	/// Layout-timed effects execute synchronously; everything else (passive
	/// effects, memos) is queued for the next flush.
	pub fn notify_signal_change(&self, signal_id: NodeId) {
		let mut layout = Vec::new();
		let mut passive = Vec::new();
		{
			let graph = self.dependency_graph.borrow();
			let Some(node) = graph.get(&signal_id) else {
				return;
			};
			for &subscriber_id in &node.subscribers {
				match crate::effect::effect_timing(subscriber_id) {
					Some(EffectTiming::Layout) => layout.push(subscriber_id),
					_ => passive.push(subscriber_id),
				}
			}
		}

		for effect_id in layout {
			crate::effect::Effect::execute_effect(effect_id);
		}
		for effect_id in passive {
			self.schedule_update(effect_id);
		}
	}

	/// Queues `node_id` for the next flush, handing a flush task to the
	/// scheduler when one is installed and none is in flight.
	pub fn schedule_update(&self, node_id: NodeId) {
		let mut pending = self.pending_updates.borrow_mut();
		if !pending.contains(&node_id) {
			pending.push(node_id);
		}
		drop(pending);

		if !*self.update_scheduled.borrow() {
			*self.update_scheduled.borrow_mut() = true;

			if let Some(scheduler) = SCHEDULER.get() {
				scheduler(Box::new(|| {
					let _ = try_with_runtime(|rt| rt.flush_updates());
				}));
			}
			// No scheduler installed: the flush happens when flush_updates
			// is called manually.
		}
	}

	/// Drains the pending queue and re-executes every queued effect.
	pub fn flush_updates(&self) {
		*self.update_scheduled.borrow_mut() = false;

		let pending = std::mem::take(&mut *self.pending_updates.borrow_mut());
		for node_id in pending {
			crate::effect::Effect::execute_effect(node_id);
		}
	}

	/// Removes all outgoing dependency edges of `node_id`.
	///
	/// Called before re-running an Effect/Memo so its dependency set is
	/// rebuilt from scratch on every run.
	pub fn clear_dependencies(&self, node_id: NodeId) {
		let mut graph = self.dependency_graph.borrow_mut();

		if let Some(node) = graph.get(&node_id) {
			let dependencies = node.dependencies.clone();
			for &dep_id in &dependencies {
				if let Some(dep_node) = graph.get_mut(&dep_id) {
					dep_node.subscribers.retain(|&id| id != node_id);
				}
			}
		}

		if let Some(node) = graph.get_mut(&node_id) {
			node.dependencies.clear();
		}
	}

	/// Removes `node_id` from the graph entirely (node dropped).
	pub fn remove_node(&self, node_id: NodeId) {
		self.clear_dependencies(node_id);
		self.dependency_graph.borrow_mut().remove(&node_id);
	}

	/// Whether the graph currently holds `node_id`.
	pub fn has_node(&self, node_id: NodeId) -> bool {
		self.dependency_graph.borrow().contains_key(&node_id)
	}

	/// Number of subscribers of `node_id`.
	pub fn subscriber_count(&self, node_id: NodeId) -> usize {
		self.dependency_graph
			.borrow()
			.get(&node_id)
			.map(|node| node.subscribers.len())
			.unwrap_or(0)
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new()
	}
}

thread_local! {
	static RUNTIME: Runtime = Runtime::new();
}

/// Runs `f` with the thread-local runtime.
pub fn with_runtime<F, R>(f: F) -> R
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.with(f)
}

/// Fallible runtime access for Drop impls; `None` once TLS is destroyed.
pub(crate) fn try_with_runtime<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.try_with(f).ok()
}

/// Runs `f` with dependency tracking suspended.
///
/// Signal reads inside `f` do not register edges with the surrounding
/// Effect/Memo. Used by [`crate::watch`] to keep handler reads out of the
/// dependency set.
///
/// # Example
///
/// ```ignore
/// Effect::new(move || {
///     let tracked = trigger.get();
///     untrack(|| handler(tracked, other_signal.get()));
/// });
/// ```
pub fn untrack<F, R>(f: F) -> R
where
	F: FnOnce() -> R,
{
	struct TrackingGuard;
	impl Drop for TrackingGuard {
		fn drop(&mut self) {
			let _ = try_with_runtime(|rt| rt.resume_tracking());
		}
	}

	with_runtime(|rt| rt.pause_tracking());
	let _guard = TrackingGuard;
	f()
}
