//! Idle-time module preloading: `use_module_preloader`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::platform::{IdleHandle, request_idle};
use crate::reactive::on_cleanup;

/// A lazily loaded module that can be warmed up ahead of use.
///
/// Implemented for plain closures, so route tables can pass
/// `|| router.preload("/settings")` style thunks directly.
pub trait Preload {
	/// Starts loading the module in the background.
	fn preload(&self);
}

impl<F: Fn()> Preload for F {
	fn preload(&self) {
		self();
	}
}

/// Preloads `modules` one at a time while the host is idle.
///
/// Each module is triggered in its own idle slice, in order, starting once
/// the hook is called; a long list never monopolizes a frame. Pending idle
/// work is cancelled when the owning scope is disposed, leaving the
/// remaining modules untouched.
///
/// # Example
///
/// ```ignore
/// use_module_preloader(vec![
///     || lazy_routes.preload("settings"),
///     || lazy_routes.preload("billing"),
/// ]);
/// ```
pub fn use_module_preloader<P: Preload + 'static>(modules: Vec<P>) {
	let modules = Rc::new(modules);
	let slot: Rc<RefCell<Option<IdleHandle>>> = Rc::new(RefCell::new(None));

	schedule_step(0, modules, slot.clone());

	on_cleanup(move || {
		slot.borrow_mut().take();
	});
}

fn schedule_step<P: Preload + 'static>(
	index: usize,
	modules: Rc<Vec<P>>,
	slot: Rc<RefCell<Option<IdleHandle>>>,
) {
	if index >= modules.len() {
		slot.borrow_mut().take();
		return;
	}

	let slot_in_idle = slot.clone();
	let handle = request_idle(move || {
		crate::debug_log!("use_module_preloader: preloading module {index}");
		modules[index].preload();
		schedule_step(index + 1, modules.clone(), slot_in_idle.clone());
	});
	*slot.borrow_mut() = Some(handle);
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use crate::platform::testing;
	use crate::reactive::create_scope;
	use serial_test::serial;
	use std::cell::RefCell as StdRefCell;

	fn pump_idle() {
		while testing::run_idle_callbacks() > 0 {}
	}

	#[test]
	#[serial]
	fn preloads_all_modules_in_order() {
		testing::reset();
		let loaded = Rc::new(StdRefCell::new(Vec::new()));

		let modules: Vec<_> = (0..3)
			.map(|index| {
				let loaded = loaded.clone();
				move || loaded.borrow_mut().push(index)
			})
			.collect();

		let ((), scope) = create_scope(move || use_module_preloader(modules));

		assert!(loaded.borrow().is_empty());
		pump_idle();
		assert_eq!(*loaded.borrow(), vec![0, 1, 2]);

		scope.dispose();
	}

	#[test]
	#[serial]
	fn one_module_per_idle_slice() {
		testing::reset();
		let loaded = Rc::new(StdRefCell::new(Vec::new()));

		let modules: Vec<_> = (0..3)
			.map(|index| {
				let loaded = loaded.clone();
				move || loaded.borrow_mut().push(index)
			})
			.collect();

		let ((), scope) = create_scope(move || use_module_preloader(modules));

		testing::run_idle_callbacks();
		assert_eq!(*loaded.borrow(), vec![0]);

		testing::run_idle_callbacks();
		assert_eq!(*loaded.borrow(), vec![0, 1]);

		scope.dispose();
	}

	#[test]
	#[serial]
	fn dispose_stops_the_chain() {
		testing::reset();
		let loaded = Rc::new(StdRefCell::new(Vec::new()));

		let modules: Vec<_> = (0..5)
			.map(|index| {
				let loaded = loaded.clone();
				move || loaded.borrow_mut().push(index)
			})
			.collect();

		let ((), scope) = create_scope(move || use_module_preloader(modules));

		testing::run_idle_callbacks();
		assert_eq!(*loaded.borrow(), vec![0]);

		scope.dispose();
		pump_idle();
		// The pending step was cancelled; nothing else loads.
		assert_eq!(*loaded.borrow(), vec![0]);
	}

	#[test]
	#[serial]
	fn empty_module_list_is_a_no_op() {
		testing::reset();
		let ((), scope) = create_scope(|| use_module_preloader(Vec::<fn()>::new()));

		assert_eq!(testing::pending_idle_callbacks(), 0);
		scope.dispose();
	}
}
