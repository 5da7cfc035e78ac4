//! `Memo<T>`: a cached derived value.
//!
//! The computation runs once on creation and again only when a signal it
//! read changes; reads of the memo itself hit the cached value. Reading a
//! memo inside an Effect tracks it like any signal, so derived values
//! compose.
//!
//! # Example
//!
//! ```ignore
//! let count = Signal::new(5);
//! let doubled = Memo::new({
//!     let count = count.clone();
//!     move || count.get() * 2
//! });
//! assert_eq!(doubled.get(), 10);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::effect::Effect;
use crate::signal::Signal;

/// A derived reactive value, recomputed only when its dependencies change.
#[derive(Clone)]
pub struct Memo<T: 'static> {
	value: Signal<T>,
	// Keeps the recomputation alive for as long as any Memo clone exists.
	_effect: Rc<Effect>,
}

impl<T: Clone + 'static> Memo<T> {
	/// Creates a memo from a computation closure.
	///
	/// The closure runs immediately; signals it reads become dependencies
	/// and schedule a recomputation when written.
	pub fn new<F>(mut f: F) -> Self
	where
		F: FnMut() -> T + 'static,
	{
		let slot: Rc<RefCell<Option<Signal<T>>>> = Rc::new(RefCell::new(None));

		let slot_in_effect = slot.clone();
		let effect = Effect::new(move || {
			let computed = f();
			let mut slot = slot_in_effect.borrow_mut();
			match &*slot {
				Some(cached) => cached.set(computed),
				None => *slot = Some(Signal::new(computed)),
			}
		});

		// The effect ran synchronously above, so the slot is filled.
		let value = slot
			.borrow()
			.clone()
			.expect("memo computation runs on creation");

		Self {
			value,
			_effect: Rc::new(effect),
		}
	}

	/// Returns the cached value, tracking the memo as a dependency.
	pub fn get(&self) -> T {
		self.value.get()
	}

	/// Returns the cached value without tracking.
	pub fn get_untracked(&self) -> T {
		self.value.get_untracked()
	}
}
