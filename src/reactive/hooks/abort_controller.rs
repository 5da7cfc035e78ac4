//! Scope-bound cancellation: `use_abort_controller`.

#[cfg(not(target_arch = "wasm32"))]
use std::cell::{Cell, RefCell};
#[cfg(not(target_arch = "wasm32"))]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsValue, UnwrapThrowExt};

use crate::reactive::on_cleanup;

/// An abort controller whose `abort` fires automatically when the creating
/// scope is disposed.
///
/// On WASM this wraps the browser `AbortController`; hand
/// [`signal`](Self::signal) to fetch-style APIs so in-flight requests die
/// with the component. Outside a browsing context (server rendering, native
/// tests) an inert variant stands in: it records the aborted flag and
/// reason and nothing else.
#[derive(Clone)]
pub struct ScopedAbortController {
	#[cfg(target_arch = "wasm32")]
	controller: web_sys::AbortController,
	#[cfg(not(target_arch = "wasm32"))]
	aborted: Rc<Cell<bool>>,
	#[cfg(not(target_arch = "wasm32"))]
	reason: Rc<RefCell<Option<String>>>,
}

/// Creates an abort controller tied to the current scope's teardown.
pub fn use_abort_controller() -> ScopedAbortController {
	build_controller(None)
}

/// Creates an abort controller that aborts with `reason` on scope teardown.
///
/// # Example
///
/// ```ignore
/// let controller = use_abort_controller_with_reason("component unmounted");
/// fetch_with_signal(url, controller.signal());
/// // disposing the scope aborts the fetch with the given reason
/// ```
pub fn use_abort_controller_with_reason(reason: impl Into<String>) -> ScopedAbortController {
	build_controller(Some(reason.into()))
}

#[cfg(target_arch = "wasm32")]
fn build_controller(reason: Option<String>) -> ScopedAbortController {
	let controller = web_sys::AbortController::new()
		.expect_throw("AbortController is available in every supported browser");

	let scoped = ScopedAbortController { controller };
	let on_teardown = scoped.clone();
	on_cleanup(move || match &reason {
		Some(reason) => on_teardown.abort_with_reason(reason),
		None => on_teardown.abort(),
	});

	scoped
}

#[cfg(not(target_arch = "wasm32"))]
fn build_controller(reason: Option<String>) -> ScopedAbortController {
	let scoped = ScopedAbortController {
		aborted: Rc::new(Cell::new(false)),
		reason: Rc::new(RefCell::new(None)),
	};

	let on_teardown = scoped.clone();
	on_cleanup(move || match &reason {
		Some(reason) => on_teardown.abort_with_reason(reason),
		None => on_teardown.abort(),
	});

	scoped
}

#[cfg(target_arch = "wasm32")]
impl ScopedAbortController {
	/// The signal to plumb into cancellable operations.
	pub fn signal(&self) -> web_sys::AbortSignal {
		self.controller.signal()
	}

	/// Aborts now, without a reason.
	pub fn abort(&self) {
		self.controller.abort();
	}

	/// Aborts now with a reason.
	pub fn abort_with_reason(&self, reason: &str) {
		self.controller
			.abort_with_reason(&JsValue::from_str(reason));
	}

	/// Whether the controller has aborted.
	pub fn is_aborted(&self) -> bool {
		self.controller.signal().aborted()
	}
}

#[cfg(not(target_arch = "wasm32"))]
impl ScopedAbortController {
	/// Aborts now, without a reason.
	pub fn abort(&self) {
		self.aborted.set(true);
	}

	/// Aborts now with a reason.
	pub fn abort_with_reason(&self, reason: &str) {
		self.aborted.set(true);
		*self.reason.borrow_mut() = Some(reason.to_string());
	}

	/// Whether the controller has aborted.
	pub fn is_aborted(&self) -> bool {
		self.aborted.get()
	}

	/// The abort reason, if one was given.
	pub fn abort_reason(&self) -> Option<String> {
		self.reason.borrow().clone()
	}
}
