//! `Signal<T>`: the reactive single-value container.
//!
//! Reads via [`Signal::get`] are tracked: when called inside an Effect or
//! Memo, the dependency is recorded automatically. Writes via
//! [`Signal::set`]/[`Signal::update`] notify every dependent observer.
//!
//! A `Signal<T>` is a [`NodeId`] plus an `Rc<RefCell<T>>`, so it is cheap to
//! clone and every clone shares the same value.
//!
//! # Example
//!
//! ```ignore
//! let count = Signal::new(0);
//! assert_eq!(count.get(), 0);
//! count.set(42);
//! count.update(|n| *n += 1);
//! assert_eq!(count.get(), 43);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::runtime::{NodeId, try_with_runtime, with_runtime};

/// A reactive value that records reads and broadcasts writes.
#[derive(Clone)]
pub struct Signal<T: 'static> {
	id: NodeId,
	value: Rc<RefCell<T>>,
}

impl<T: 'static> Signal<T> {
	/// Creates a signal holding `value`.
	pub fn new(value: T) -> Self {
		Self {
			id: NodeId::new(),
			value: Rc::new(RefCell::new(value)),
		}
	}

	/// Returns the current value, registering a dependency with the
	/// currently executing Effect/Memo, if any.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		with_runtime(|rt| rt.track_dependency(self.id));
		self.get_untracked()
	}

	/// Returns the current value without registering a dependency.
	pub fn get_untracked(&self) -> T
	where
		T: Clone,
	{
		self.value.borrow().clone()
	}

	/// Replaces the value and notifies all subscribers.
	pub fn set(&self, value: T) {
		*self.value.borrow_mut() = value;
		with_runtime(|rt| rt.notify_signal_change(self.id));
	}

	/// Mutates the value in place, notifying subscribers once.
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
	{
		f(&mut *self.value.borrow_mut());
		with_runtime(|rt| rt.notify_signal_change(self.id));
	}

	/// The signal's node id (runtime internals and tests).
	pub fn id(&self) -> NodeId {
		self.id
	}
}

impl<T: 'static> Drop for Signal<T> {
	fn drop(&mut self) {
		// Last clone removes the node from the dependency graph.
		if Rc::strong_count(&self.value) == 1 {
			let _ = try_with_runtime(|rt| rt.remove_node(self.id));
		}
	}
}

impl<T: fmt::Debug + Clone + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("id", &self.id)
			.field("value", &self.get_untracked())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serial_test::serial;

	#[test]
	#[serial]
	fn holds_initial_value() {
		let signal = Signal::new(42);
		assert_eq!(signal.get_untracked(), 42);
	}

	#[test]
	#[serial]
	fn set_replaces_value() {
		let signal = Signal::new(0);
		signal.set(100);
		assert_eq!(signal.get_untracked(), 100);
	}

	#[test]
	#[serial]
	fn update_mutates_in_place() {
		let signal = Signal::new(1);
		signal.update(|n| *n += 1);
		signal.update(|n| *n *= 3);
		assert_eq!(signal.get_untracked(), 6);
	}

	#[test]
	#[serial]
	fn clones_share_one_value() {
		let first = Signal::new(String::from("a"));
		let second = first.clone();

		first.set(String::from("b"));
		assert_eq!(second.get_untracked(), "b");
	}

	#[test]
	#[serial]
	fn untracked_read_outside_observer_works() {
		let signal = Signal::new(7);
		// No observer on the stack; get() must still return the value.
		assert_eq!(signal.get(), 7);
	}

	#[test]
	#[serial]
	fn last_clone_drop_removes_node() {
		let id = {
			let signal = Signal::new(0);
			let id = signal.id();
			with_runtime(|rt| {
				rt.dependency_graph
					.borrow_mut()
					.entry(id)
					.or_default();
			});
			assert!(with_runtime(|rt| rt.has_node(id)));
			id
		};
		assert!(!with_runtime(|rt| rt.has_node(id)));
	}
}
