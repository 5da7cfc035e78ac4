//! Trigger-driven polling: `use_polling`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::platform::Timeout;
use crate::reactive::{Effect, on_cleanup};

/// Options for [`use_polling`].
pub struct UsePollingOptions {
	/// Delay before each scheduled poll, in milliseconds. Default `3000`.
	pub interval_ms: u32,
	/// Reactive flag gating scheduling; `None` means always enabled.
	pub enabled: Option<Box<dyn Fn() -> bool>>,
	/// Maximum number of polls to fire; `None` means unlimited. Timers
	/// cancelled by a newer trigger do not consume the cap.
	pub max_calls: Option<u32>,
}

impl Default for UsePollingOptions {
	fn default() -> Self {
		Self {
			interval_ms: 3000,
			enabled: None,
			max_calls: None,
		}
	}
}

impl UsePollingOptions {
	/// Sets the poll delay.
	pub fn interval_ms(mut self, interval_ms: u32) -> Self {
		self.interval_ms = interval_ms;
		self
	}

	/// Gates scheduling on a reactive flag.
	pub fn enabled(mut self, flag: impl Fn() -> bool + 'static) -> Self {
		self.enabled = Some(Box::new(flag));
		self
	}

	/// Caps the number of fired polls.
	pub fn max_calls(mut self, max_calls: u32) -> Self {
		self.max_calls = Some(max_calls);
		self
	}
}

/// Schedules `poll` to run `interval_ms` after each change of
/// `ready_trigger` while enabled.
///
/// The trigger is re-read reactively: each firing (including the initial
/// run) replaces any still-pending timer, so polls are paced by the
/// trigger rather than by wall-clock repetition - a slow network response
/// delays the next poll instead of stacking timers. The pending timer is
/// cancelled when the flag turns false or the owning scope is disposed.
///
/// # Example
///
/// ```ignore
/// let orders = Signal::new(Vec::new());
/// use_polling(
///     {
///         let orders = orders.clone();
///         move || orders.get()
///     },
///     move || refetch_orders(),
///     UsePollingOptions::default().interval_ms(5000),
/// );
/// ```
pub fn use_polling<T, F, P>(ready_trigger: F, poll: P, options: UsePollingOptions)
where
	T: 'static,
	F: Fn() -> T + 'static,
	P: Fn() + 'static,
{
	let timer: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
	let fired: Rc<Cell<u32>> = Rc::new(Cell::new(0));
	let poll = Rc::new(poll);

	let timer_in_effect = timer.clone();
	let effect = Effect::new(move || {
		let _ = ready_trigger();
		let enabled = options.enabled.as_ref().map(|flag| flag()).unwrap_or(true);

		// A newer trigger supersedes whatever is still scheduled.
		timer_in_effect.borrow_mut().take();

		if !enabled {
			return;
		}
		if let Some(max_calls) = options.max_calls {
			if fired.get() >= max_calls {
				crate::debug_log!("use_polling: call cap of {max_calls} reached");
				return;
			}
		}

		let poll = poll.clone();
		let fired_in_timer = fired.clone();
		let timer_in_timer = timer_in_effect.clone();
		let scheduled = Timeout::new(options.interval_ms, move || {
			timer_in_timer.borrow_mut().take();
			fired_in_timer.set(fired_in_timer.get() + 1);
			poll();
		});
		*timer_in_effect.borrow_mut() = Some(scheduled);
	});

	on_cleanup(move || {
		effect.dispose();
		timer.borrow_mut().take();
	});
}
