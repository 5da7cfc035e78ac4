//! `Effect`: a side effect re-run whenever its tracked signals change.
//!
//! Dependencies are collected automatically: every `Signal::get()` call made
//! while the effect closure runs becomes a dependency, and the set is
//! rebuilt from scratch on each run. Effects run once on creation.
//!
//! Dropping (or explicitly disposing) an effect removes it from the
//! dependency graph; disposal is idempotent.
//!
//! # Example
//!
//! ```ignore
//! let count = Signal::new(0);
//! let _effect = Effect::new(move || {
//!     println!("count is {}", count.get());
//! });
//! count.set(42); // schedules a re-run
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::runtime::{EffectTiming, NodeId, NodeType, Observer, try_with_runtime, with_runtime};

type EffectFn = Box<dyn FnMut() + 'static>;

thread_local! {
	// Closure storage, keyed by effect id, so the runtime can re-execute
	// effects without holding references into user code.
	static EFFECT_FUNCTIONS: RefCell<BTreeMap<NodeId, EffectFn>> = RefCell::new(BTreeMap::new());

	static EFFECT_TIMING: RefCell<BTreeMap<NodeId, EffectTiming>> =
		const { RefCell::new(BTreeMap::new()) };
}

/// Timing registered for `effect_id`, or `None` for non-effect nodes.
pub(crate) fn effect_timing(effect_id: NodeId) -> Option<EffectTiming> {
	EFFECT_TIMING.with(|storage| storage.borrow().get(&effect_id).copied())
}

/// A reactive side effect.
pub struct Effect {
	id: NodeId,
	disposed: Rc<RefCell<bool>>,
}

impl Effect {
	/// Creates a passive effect and runs it immediately.
	pub fn new<F>(f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		Self::new_with_timing(f, EffectTiming::Passive)
	}

	/// Creates an effect with explicit timing and runs it immediately.
	///
	/// Layout effects re-run synchronously inside the signal write that
	/// invalidated them; passive effects wait for the next flush.
	pub fn new_with_timing<F>(mut f: F, timing: EffectTiming) -> Self
	where
		F: FnMut() + 'static,
	{
		let id = NodeId::new();
		let disposed = Rc::new(RefCell::new(false));

		let disposed_guard = disposed.clone();
		EFFECT_FUNCTIONS.with(|storage| {
			storage.borrow_mut().insert(
				id,
				Box::new(move || {
					if !*disposed_guard.borrow() {
						f();
					}
				}),
			);
		});
		EFFECT_TIMING.with(|storage| {
			storage.borrow_mut().insert(id, timing);
		});

		Self::execute_effect(id);

		Self { id, disposed }
	}

	/// Re-executes `effect_id`: clears its old dependency set, runs the
	/// closure under a fresh observer frame, and pops the frame.
	pub(crate) fn execute_effect(effect_id: NodeId) {
		let timing = effect_timing(effect_id).unwrap_or_default();

		with_runtime(|rt| {
			rt.clear_dependencies(effect_id);
			rt.push_observer(Observer {
				id: effect_id,
				node_type: NodeType::Effect,
				timing,
			});
		});

		EFFECT_FUNCTIONS.with(|storage| {
			// Take the closure out while it runs so a re-entrant write can't
			// alias the RefCell borrow.
			let func = storage.borrow_mut().remove(&effect_id);
			if let Some(mut func) = func {
				func();
				// Skip the re-insert when the effect disposed itself mid-run.
				if effect_timing(effect_id).is_some() {
					storage.borrow_mut().entry(effect_id).or_insert(func);
				}
			}
		});

		with_runtime(|rt| {
			rt.pop_observer();
		});
	}

	/// The effect's node id (runtime internals and tests).
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Stops the effect and removes it from the graph. Idempotent; also
	/// invoked on drop.
	pub fn dispose(&self) {
		*self.disposed.borrow_mut() = true;

		let _ = try_with_runtime(|rt| rt.remove_node(self.id));
		let _ = EFFECT_FUNCTIONS.try_with(|storage| {
			storage.borrow_mut().remove(&self.id);
		});
		let _ = EFFECT_TIMING.try_with(|storage| {
			storage.borrow_mut().remove(&self.id);
		});
	}
}

impl Drop for Effect {
	fn drop(&mut self) {
		self.dispose();
	}
}
