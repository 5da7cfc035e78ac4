//! Fine-grained reactive substrate for Grappelli frontends.
//!
//! This crate provides the primitives every Grappelli hook is built from:
//!
//! - [`Signal`] - a reactive single-value container with tracked reads.
//! - [`Effect`] - a side effect re-run when its tracked signals change.
//! - [`Memo`] - a cached derived value.
//! - [`watch`] - an effect with an explicit, deferrable dependency closure.
//! - [`create_scope`] / [`on_cleanup`] - ownership scopes with guaranteed
//!   exactly-once teardown, including a fallback scope for callbacks
//!   registered outside any owner.
//! - [`Context`] / [`provide_context`] / [`get_context`] - typed ambient
//!   values scoped to their provider's lifetime.
//!
//! The runtime is thread-local and single-threaded by design: WASM has one
//! thread, and native targets (tests, server rendering) get an independent
//! runtime per thread. Updates are batched; in the browser a microtask
//! scheduler installed via [`set_scheduler`] drives flushes, while tests
//! call [`Runtime::flush_updates`] directly.

pub mod context;
pub mod effect;
pub mod memo;
pub mod runtime;
pub mod scope;
pub mod signal;
pub mod watch;

pub use context::{Context, create_context, get_context, provide_context};
pub use effect::Effect;
pub use memo::Memo;
pub use runtime::{
	EffectTiming, NodeId, NodeType, Observer, Runtime, set_scheduler, untrack, with_runtime,
};
pub use scope::{ScopeHandle, ScopeId, create_scope, current_scope, dispose_root, on_cleanup};
pub use signal::Signal;
pub use watch::watch;
