//! Reactive facade: substrate re-exports plus the hook collection.
//!
//! Everything from `grappelli-reactive` is re-exported here so hook users
//! need a single import path; the hooks themselves live in [`hooks`].

pub mod deferred;
pub mod hooks;

pub use deferred::create_deferred;
pub use grappelli_reactive::{
	Context, Effect, EffectTiming, Memo, NodeId, NodeType, Observer, Runtime, ScopeHandle,
	ScopeId, Signal, create_context, create_scope, current_scope, dispose_root, get_context,
	on_cleanup, provide_context, set_scheduler, untrack, watch, with_runtime,
};
