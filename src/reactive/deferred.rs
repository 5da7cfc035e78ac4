//! Deferred values: signal mirrors that update during idle time.
//!
//! A deferred value trades freshness for scheduling priority - dependents
//! of the mirror re-run during low-priority idle processing instead of on
//! every synchronous write. The storage persister uses this to batch writes
//! off the critical path.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::platform::{IdleHandle, request_idle};
use crate::reactive::{Effect, Signal, on_cleanup, untrack};

/// Returns a signal mirroring `source`, updated only when the host is idle.
///
/// Each change of `source` schedules (or reschedules) one idle-time write,
/// so rapid intermediate values coalesce into the latest one. The mirror
/// starts at the source's current value. Pending idle work is cancelled
/// when the owning scope is disposed.
///
/// # Example
///
/// ```ignore
/// let input = Signal::new(String::new());
/// let deferred = create_deferred({
///     let input = input.clone();
///     move || input.get()
/// });
/// // deferred.get() lags input.get() until the browser goes idle.
/// ```
pub fn create_deferred<T, F>(source: F) -> Signal<T>
where
	T: Clone + 'static,
	F: Fn() -> T + 'static,
{
	let mirror = Signal::new(untrack(&source));
	let pending: Rc<RefCell<Option<IdleHandle>>> = Rc::new(RefCell::new(None));
	let first_run = Cell::new(true);

	let mirror_in_effect = mirror.clone();
	let pending_in_effect = pending.clone();
	let effect = Effect::new(move || {
		let value = source();
		if first_run.replace(false) {
			// The mirror already holds the initial value.
			return;
		}

		// A newer value supersedes any write still waiting for idle time.
		pending_in_effect.borrow_mut().take();

		let mirror = mirror_in_effect.clone();
		let pending_in_idle = pending_in_effect.clone();
		let handle = request_idle(move || {
			pending_in_idle.borrow_mut().take();
			mirror.set(value);
		});
		*pending_in_effect.borrow_mut() = Some(handle);
	});

	on_cleanup(move || {
		effect.dispose();
		pending.borrow_mut().take();
	});

	mirror
}
