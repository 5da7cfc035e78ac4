//! Reusable hooks: small capability records wrapping the reactive substrate
//! and the DOM adapter.
//!
//! Every hook follows the same conventions:
//!
//! - Options arrive as a struct with a `Default` impl and documented
//!   defaults.
//! - Hooks that watch an element return an element slot
//!   (`Signal<Option<Element>>`); setting it wires the hook up, clearing it
//!   tears the wiring down.
//! - All resources (listeners, timers, idle callbacks) are released when
//!   the owning scope is disposed, via `on_cleanup`.

pub mod abort_controller;
pub mod async_action;
pub mod click_outside;
pub mod context_strict;
pub mod module_preloader;
pub mod pinch_zoom;
pub mod polling;
pub mod save_to_storage;
pub mod scroll_to;
pub mod sort_state;
pub mod sync_state;
pub mod visible_state;

pub use abort_controller::{ScopedAbortController, use_abort_controller,
	use_abort_controller_with_reason};
pub use async_action::{ActionError, ActionPhase, AsyncAction, use_async_action};
pub use click_outside::{UseClickOutsideOptions, use_click_outside};
pub use context_strict::{use_context_strict, use_context_strict_msg};
pub use module_preloader::{Preload, use_module_preloader};
pub use pinch_zoom::{UsePinchZoomOptions, use_pinch_zoom};
pub use polling::{UsePollingOptions, use_polling};
pub use save_to_storage::{SaveToStorageOptions, use_save_to_storage};
pub use scroll_to::{UseScrollToOptions, use_scroll_to};
pub use sort_state::{SortOrder, SortState, use_sort_state};
pub use sync_state::use_sync_state;
pub use visible_state::{VisibleState, use_visible_state};
