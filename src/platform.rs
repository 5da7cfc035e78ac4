//! Platform scheduling: microtask spawning, one-shot timers, idle callbacks.
//!
//! Hooks never talk to `setTimeout`/`requestIdleCallback` directly; they go
//! through [`Timeout`] and [`request_idle`], which bind to the browser APIs
//! on WASM and to deterministic in-memory registries on native targets. The
//! native registries are driven explicitly from tests via
//! [`testing::fire_pending_timeouts`] and [`testing::run_idle_callbacks`],
//! mirroring the manual `flush_updates` convention of the reactive runtime.

#[cfg(not(target_arch = "wasm32"))]
use std::cell::{Cell, RefCell};
#[cfg(not(target_arch = "wasm32"))]
use std::rc::{Rc, Weak};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;

/// Spawns a future onto the platform's single-threaded executor.
///
/// On WASM this is `wasm_bindgen_futures::spawn_local`. On native targets
/// (tests, non-interactive rendering) there is no event loop to hand the
/// future to, so it is driven to completion on the spot.
#[cfg(target_arch = "wasm32")]
pub fn spawn_local<F>(future: F)
where
	F: std::future::Future<Output = ()> + 'static,
{
	wasm_bindgen_futures::spawn_local(future);
}

/// Spawns a future (native placeholder: drives it to completion inline).
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_local<F>(future: F)
where
	F: std::future::Future<Output = ()> + 'static,
{
	futures::executor::block_on(future);
}

/// Wires the reactive runtime's update flushing to the platform.
///
/// Call once at application startup, before the first signal write. On WASM
/// every batch of signal writes then flushes on the next microtask. On
/// native targets this is a no-op: tests and server rendering flush
/// manually via `with_runtime(|rt| rt.flush_updates())`.
pub fn init_scheduler() {
	#[cfg(target_arch = "wasm32")]
	grappelli_reactive::set_scheduler(|task| {
		wasm_bindgen_futures::spawn_local(async move { task() });
	});
}

// ---------------------------------------------------------------------------
// One-shot timers
// ---------------------------------------------------------------------------

/// A cancellable one-shot timer.
///
/// Dropping the handle cancels the timer if it has not fired yet.
#[cfg(target_arch = "wasm32")]
pub struct Timeout {
	inner: Option<gloo_timers::callback::Timeout>,
}

#[cfg(target_arch = "wasm32")]
impl Timeout {
	/// Schedules `f` to run once after `millis` milliseconds.
	pub fn new<F>(millis: u32, f: F) -> Self
	where
		F: FnOnce() + 'static,
	{
		Self {
			inner: Some(gloo_timers::callback::Timeout::new(millis, f)),
		}
	}

	/// Cancels the timer explicitly (dropping the handle does the same).
	pub fn cancel(mut self) {
		if let Some(inner) = self.inner.take() {
			inner.cancel();
		}
	}
}

#[cfg(not(target_arch = "wasm32"))]
struct TimerState {
	millis: u32,
	callback: RefCell<Option<Box<dyn FnOnce()>>>,
}

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
	static PENDING_TIMEOUTS: RefCell<Vec<Weak<TimerState>>> = const { RefCell::new(Vec::new()) };
}

/// A cancellable one-shot timer (native test double).
///
/// Timers never fire on their own here; tests drive them through
/// [`testing::fire_pending_timeouts`]. Dropping the handle cancels.
#[cfg(not(target_arch = "wasm32"))]
pub struct Timeout {
	state: Rc<TimerState>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Timeout {
	/// Schedules `f` on the in-memory timer registry.
	pub fn new<F>(millis: u32, f: F) -> Self
	where
		F: FnOnce() + 'static,
	{
		let state = Rc::new(TimerState {
			millis,
			callback: RefCell::new(Some(Box::new(f))),
		});
		PENDING_TIMEOUTS.with(|pending| {
			pending.borrow_mut().push(Rc::downgrade(&state));
		});
		Self { state }
	}

	/// Cancels the timer explicitly (dropping the handle does the same).
	pub fn cancel(self) {
		self.state.callback.borrow_mut().take();
	}

	/// The delay this timer was scheduled with.
	pub fn millis(&self) -> u32 {
		self.state.millis
	}
}

// ---------------------------------------------------------------------------
// Idle-time callbacks
// ---------------------------------------------------------------------------

/// A pending idle-time callback; dropping the handle cancels it.
#[cfg(target_arch = "wasm32")]
pub struct IdleHandle {
	inner: IdleInner,
}

#[cfg(target_arch = "wasm32")]
enum IdleInner {
	Idle {
		id: u32,
		_closure: Closure<dyn FnMut()>,
	},
	// requestIdleCallback is not universally available (Safari); fall back
	// to a zero-delay timer there.
	Timer(#[allow(dead_code)] Timeout),
	Inert,
}

/// Schedules `f` to run when the browser is idle.
///
/// Uses `requestIdleCallback` where available and a zero-delay timeout
/// otherwise, so callers can rely on the callback eventually running.
#[cfg(target_arch = "wasm32")]
pub fn request_idle<F>(f: F) -> IdleHandle
where
	F: FnOnce() + 'static,
{
	let Some(window) = web_sys::window() else {
		crate::warn_log!("request_idle called without a window, dropping callback");
		return IdleHandle {
			inner: IdleInner::Inert,
		};
	};

	let has_idle_callback =
		js_sys::Reflect::has(window.as_ref(), &JsValue::from_str("requestIdleCallback"))
			.unwrap_or(false);

	if has_idle_callback {
		let mut f = Some(f);
		let closure = Closure::wrap(Box::new(move || {
			if let Some(f) = f.take() {
				f();
			}
		}) as Box<dyn FnMut()>);

		match window.request_idle_callback(closure.as_ref().unchecked_ref()) {
			Ok(id) => {
				return IdleHandle {
					inner: IdleInner::Idle {
						id,
						_closure: closure,
					},
				};
			}
			Err(err) => {
				crate::warn_log!("requestIdleCallback failed: {err:?}");
				return IdleHandle {
					inner: IdleInner::Inert,
				};
			}
		}
	}

	IdleHandle {
		inner: IdleInner::Timer(Timeout::new(0, f)),
	}
}

#[cfg(target_arch = "wasm32")]
impl Drop for IdleHandle {
	fn drop(&mut self) {
		if let IdleInner::Idle { id, .. } = &self.inner {
			if let Some(window) = web_sys::window() {
				window.cancel_idle_callback(*id);
			}
		}
		// The Timer variant cancels via the Timeout's own Drop.
	}
}

#[cfg(not(target_arch = "wasm32"))]
struct IdleState {
	cancelled: Cell<bool>,
	callback: RefCell<Option<Box<dyn FnOnce()>>>,
}

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
	static IDLE_QUEUE: RefCell<Vec<Rc<IdleState>>> = const { RefCell::new(Vec::new()) };
}

/// A pending idle-time callback (native test double); dropping cancels.
#[cfg(not(target_arch = "wasm32"))]
pub struct IdleHandle {
	state: Rc<IdleState>,
}

/// Schedules `f` on the in-memory idle queue, drained by
/// [`testing::run_idle_callbacks`].
#[cfg(not(target_arch = "wasm32"))]
pub fn request_idle<F>(f: F) -> IdleHandle
where
	F: FnOnce() + 'static,
{
	let state = Rc::new(IdleState {
		cancelled: Cell::new(false),
		callback: RefCell::new(Some(Box::new(f))),
	});
	IDLE_QUEUE.with(|queue| queue.borrow_mut().push(state.clone()));
	IdleHandle { state }
}

#[cfg(not(target_arch = "wasm32"))]
impl Drop for IdleHandle {
	fn drop(&mut self) {
		self.state.cancelled.set(true);
	}
}

/// Test drivers for the native timer and idle registries.
#[cfg(not(target_arch = "wasm32"))]
pub mod testing {
	use super::*;

	/// Clears both registries. Call at the start of a test for isolation.
	pub fn reset() {
		PENDING_TIMEOUTS.with(|pending| pending.borrow_mut().clear());
		IDLE_QUEUE.with(|queue| queue.borrow_mut().clear());
	}

	/// Fires every pending timeout now, in scheduling order. Returns the
	/// number of callbacks that ran.
	pub fn fire_pending_timeouts() -> usize {
		let snapshot: Vec<Rc<TimerState>> = PENDING_TIMEOUTS.with(|pending| {
			let mut pending = pending.borrow_mut();
			let alive: Vec<Rc<TimerState>> =
				pending.iter().filter_map(Weak::upgrade).collect();
			pending.clear();
			alive
		});

		let mut fired = 0;
		for state in snapshot {
			let callback = state.callback.borrow_mut().take();
			if let Some(callback) = callback {
				callback();
				fired += 1;
			}
		}
		fired
	}

	/// Number of timers scheduled and not yet fired or cancelled.
	pub fn pending_timeouts() -> usize {
		PENDING_TIMEOUTS.with(|pending| {
			pending
				.borrow()
				.iter()
				.filter_map(Weak::upgrade)
				.filter(|state| state.callback.borrow().is_some())
				.count()
		})
	}

	/// Runs the currently queued idle callbacks (not ones queued while
	/// running). Returns the number that ran; pump until zero to settle.
	pub fn run_idle_callbacks() -> usize {
		let batch: Vec<Rc<IdleState>> =
			IDLE_QUEUE.with(|queue| queue.borrow_mut().drain(..).collect());

		let mut ran = 0;
		for state in batch {
			if state.cancelled.get() {
				continue;
			}
			let callback = state.callback.borrow_mut().take();
			if let Some(callback) = callback {
				callback();
				ran += 1;
			}
		}
		ran
	}

	/// Number of queued, uncancelled idle callbacks.
	pub fn pending_idle_callbacks() -> usize {
		IDLE_QUEUE.with(|queue| {
			queue
				.borrow()
				.iter()
				.filter(|state| !state.cancelled.get())
				.count()
		})
	}
}
