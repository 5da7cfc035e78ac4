//! Async action tracking: `use_async_action`.
//!
//! Tracks the lifecycle of a single user-initiated asynchronous operation so
//! components can gate their UI on it - disable the submit button while
//! pending, show the recorded message while errored.

use std::cell::Cell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use crate::reactive::{Memo, Signal};

/// Lifecycle phase of the tracked operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionPhase {
	/// No attempt has run since creation or the last reset.
	#[default]
	Ready,
	/// An attempt is in flight.
	Pending,
	/// The newest attempt succeeded.
	Resolved,
	/// The newest attempt failed.
	Errored,
}

/// Error surfaced to the UI while the action is errored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionError {
	/// Display text recorded from the failure (or set explicitly).
	pub message: Option<String>,
}

/// Capability record returned by [`use_async_action`].
///
/// Cloning shares the same tracked state.
#[derive(Clone)]
pub struct AsyncAction {
	phase: Signal<ActionPhase>,
	error_message: Signal<Option<String>>,
	error: Memo<Option<ActionError>>,
	// Attempt counter: a settling run writes state only while it is still
	// the newest attempt.
	epoch: Rc<Cell<u64>>,
}

/// Creates an async action tracker in the `Ready` phase.
///
/// # Example
///
/// ```ignore
/// let action = use_async_action();
/// let result = action.run(|| async { save_profile().await }).await;
/// if result.is_err() {
///     // action.error() now carries the failure message
/// }
/// ```
pub fn use_async_action() -> AsyncAction {
	let phase = Signal::new(ActionPhase::Ready);
	let error_message = Signal::new(None::<String>);

	let phase_in_memo = phase.clone();
	let message_in_memo = error_message.clone();
	let error = Memo::new(move || {
		if phase_in_memo.get() == ActionPhase::Errored {
			Some(ActionError {
				message: message_in_memo.get(),
			})
		} else {
			None
		}
	});

	AsyncAction {
		phase,
		error_message,
		error,
		epoch: Rc::new(Cell::new(0)),
	}
}

impl AsyncAction {
	/// Runs `action`, tracking its lifecycle.
	///
	/// The phase becomes `Pending` (and any previous error message is
	/// cleared) before the future is polled. On success the phase becomes
	/// `Resolved` and the value is returned; on failure the phase becomes
	/// `Errored`, the error's display text is recorded, and the error is
	/// returned to the caller - never swallowed.
	///
	/// Overlapping calls all run to completion and each caller receives its
	/// own result, but only the newest attempt's settlement is visible in
	/// `phase`/`error`: older attempts settling later are ignored.
	pub async fn run<T, E, F, Fut>(&self, action: F) -> Result<T, E>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T, E>>,
		E: fmt::Display,
	{
		let attempt = self.epoch.get().wrapping_add(1);
		self.epoch.set(attempt);

		self.error_message.set(None);
		self.phase.set(ActionPhase::Pending);

		match action().await {
			Ok(value) => {
				if self.epoch.get() == attempt {
					self.phase.set(ActionPhase::Resolved);
				}
				Ok(value)
			}
			Err(err) => {
				if self.epoch.get() == attempt {
					self.error_message.set(Some(err.to_string()));
					self.phase.set(ActionPhase::Errored);
				}
				Err(err)
			}
		}
	}

	/// Like [`run`](Self::run), additionally routing a failure to
	/// `on_error` before returning it.
	pub async fn run_with<T, E, F, Fut, H>(&self, action: F, on_error: H) -> Result<T, E>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T, E>>,
		E: fmt::Display,
		H: FnOnce(&E),
	{
		match self.run(action).await {
			Ok(value) => Ok(value),
			Err(err) => {
				on_error(&err);
				Err(err)
			}
		}
	}

	/// Returns to `Ready` and clears the error message, from any phase.
	///
	/// Also invalidates in-flight attempts: a run settling after a reset
	/// leaves the phase untouched.
	pub fn reset(&self) {
		self.epoch.set(self.epoch.get().wrapping_add(1));
		self.error_message.set(None);
		self.phase.set(ActionPhase::Ready);
	}

	/// Overrides the display text shown while errored.
	pub fn set_error_message(&self, message: impl Into<String>) {
		self.error_message.set(Some(message.into()));
	}

	/// Current lifecycle phase (tracked read).
	pub fn phase(&self) -> ActionPhase {
		self.phase.get()
	}

	/// Whether an attempt is in flight (tracked read).
	pub fn is_in_progress(&self) -> bool {
		self.phase.get() == ActionPhase::Pending
	}

	/// The current error, `Some` only while `Errored` (memoized read).
	pub fn error(&self) -> Option<ActionError> {
		self.error.get()
	}
}
