//! Strict context access: `use_context_strict`.

use std::any::type_name;

use crate::reactive::{Context, get_context};

/// Reads a context value, panicking when no provider is present.
///
/// The lenient accessor (`get_context`) returns `Option<T>` so callers can
/// fall back gracefully. This hook is for the opposite situation: the
/// component is unusable without the value, and a missing provider is a
/// wiring bug that should fail immediately and loudly rather than smuggle
/// an empty value through.
///
/// # Panics
///
/// Panics when no value is provided for `ctx`, naming the value type.
///
/// # Example
///
/// ```ignore
/// let session: Context<Session> = create_context();
/// // deep inside the tree, where a provider is guaranteed:
/// let session = use_context_strict(&session);
/// ```
pub fn use_context_strict<T: Clone + 'static>(ctx: &Context<T>) -> T {
	match get_context(ctx) {
		Some(value) => value,
		None => panic!("no context value of type `{}` provided", type_name::<T>()),
	}
}

/// Like [`use_context_strict`], with a caller-supplied panic message.
///
/// # Panics
///
/// Panics with `message` when no value is provided for `ctx`.
pub fn use_context_strict_msg<T: Clone + 'static>(ctx: &Context<T>, message: &str) -> T {
	match get_context(ctx) {
		Some(value) => value,
		None => panic!("{message}"),
	}
}
