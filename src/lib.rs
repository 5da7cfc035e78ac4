//! Grappelli hooks: reusable reactive building blocks for WASM frontends.
//!
//! Each hook wraps a handful of reactive primitives (signals, effects,
//! ownership scopes) and a browser API into a small capability record for
//! component authors:
//!
//! - [`use_async_action`](reactive::hooks::use_async_action) - four-phase
//!   lifecycle tracking for user-initiated async operations.
//! - [`use_click_outside`](reactive::hooks::use_click_outside) - document
//!   clicks landing outside a target element.
//! - [`use_save_to_storage`](reactive::hooks::use_save_to_storage) -
//!   serialize-on-change persistence with idle-time batching.
//! - [`use_pinch_zoom`](reactive::hooks::use_pinch_zoom) - two-finger
//!   distance-delta gestures.
//! - [`use_polling`](reactive::hooks::use_polling) - trigger-paced deferred
//!   polling with an optional call cap.
//! - [`use_scroll_to`](reactive::hooks::use_scroll_to) - trigger-driven
//!   scrolling of a referenced element.
//! - [`use_sort_state`](reactive::hooks::use_sort_state) /
//!   [`use_visible_state`](reactive::hooks::use_visible_state) - tiny state
//!   togglers with derived accessors.
//! - [`use_abort_controller`](reactive::hooks::use_abort_controller) -
//!   cancellation tied to scope teardown.
//! - [`use_context_strict`](reactive::hooks::use_context_strict) - context
//!   access that fails loudly.
//! - [`use_module_preloader`](reactive::hooks::use_module_preloader) -
//!   sequential idle-time warm-up of lazy modules.
//! - [`use_sync_state`](reactive::hooks::use_sync_state) - mirror a
//!   reactive source into a setter.
//!
//! # Setup
//!
//! Call [`platform::init_scheduler`] once at startup so signal writes flush
//! on the next microtask:
//!
//! ```ignore
//! grappelli::platform::init_scheduler();
//! ```
//!
//! Native targets (tests, server rendering) skip this and drive updates
//! manually with `with_runtime(|rt| rt.flush_updates())`.
//!
//! # Ownership
//!
//! Hooks register their teardown with the current reactive scope: disposing
//! the scope detaches listeners, cancels timers and idle callbacks, and
//! aborts controllers, exactly once. Hooks called outside any scope attach
//! to a fallback root scope instead.

pub mod dom;
pub mod logging;
pub mod platform;
pub mod reactive;

pub use dom::{
	DomError, Element, Event, EventHandle, EventType, ScrollBehavior, ScrollPosition,
	StorageArea, TouchPoint, document,
};
pub use reactive::hooks::{
	ActionError, ActionPhase, AsyncAction, Preload, ScopedAbortController, SortOrder, SortState,
	UseClickOutsideOptions, UsePinchZoomOptions, UsePollingOptions, SaveToStorageOptions,
	UseScrollToOptions, VisibleState, use_abort_controller, use_abort_controller_with_reason,
	use_async_action, use_click_outside, use_context_strict, use_context_strict_msg,
	use_module_preloader, use_pinch_zoom, use_polling, use_save_to_storage, use_scroll_to,
	use_sort_state, use_sync_state, use_visible_state,
};
pub use reactive::{
	Context, Effect, Memo, Signal, create_context, create_deferred, create_scope, get_context,
	on_cleanup, provide_context, untrack, watch, with_runtime,
};

/// One-import surface for application code.
pub mod prelude {
	pub use crate::dom::{Element, Event, ScrollBehavior, ScrollPosition, StorageArea};
	pub use crate::platform::init_scheduler;
	pub use crate::reactive::hooks::{
		ActionPhase, SortOrder, SaveToStorageOptions, UseClickOutsideOptions,
		UsePinchZoomOptions, UsePollingOptions, UseScrollToOptions, use_abort_controller,
		use_async_action, use_click_outside, use_context_strict, use_module_preloader,
		use_pinch_zoom, use_polling, use_save_to_storage, use_scroll_to, use_sort_state,
		use_sync_state, use_visible_state,
	};
	pub use crate::reactive::{
		Context, Effect, Memo, Signal, create_context, create_deferred, create_scope,
		get_context, on_cleanup, provide_context, untrack, watch,
	};
}
