use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};

/// A guard that owns one value and runs a teardown closure on it at end of scope.
///
/// The guarded value stays usable in place through `Deref`/`DerefMut`. If the value should
/// outlive the scope after all, [`defuse`][ScopeGuard::defuse] disarms the guard and hands it
/// back.
pub struct ScopeGuard<T, F: FnOnce(T)> {
    value: ManuallyDrop<T>,
    dropfn: ManuallyDrop<F>,
}

/// Guards `value`, running `dropfn` on it when the guard is dropped.
pub fn guard<T, F: FnOnce(T)>(value: T, dropfn: F) -> ScopeGuard<T, F> {
    ScopeGuard {
        value: ManuallyDrop::new(value),
        dropfn: ManuallyDrop::new(dropfn),
    }
}

/// Runs `dropfn` at end of scope, unless the returned guard is
/// [defused][ScopeGuard::defuse] first.
pub fn defer<F: FnOnce()>(dropfn: F) -> ScopeGuard<(), impl FnOnce(())> {
    guard((), move |()| dropfn())
}

impl<T, F: FnOnce(T)> ScopeGuard<T, F> {
    /// Disarms the guard and returns the value without running the teardown closure.
    pub fn defuse(self) -> T {
        let mut this = ManuallyDrop::new(self);
        // SAFETY: `self` is never dropped, so both fields are taken exactly once here.
        unsafe {
            ManuallyDrop::drop(&mut this.dropfn);
            ManuallyDrop::take(&mut this.value)
        }
    }
}

impl<T, F: FnOnce(T)> Deref for ScopeGuard<T, F> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T, F: FnOnce(T)> DerefMut for ScopeGuard<T, F> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T, F: FnOnce(T)> Drop for ScopeGuard<T, F> {
    fn drop(&mut self) {
        // SAFETY: both fields are `ManuallyDrop` and only taken here; `defuse` forgets `self`
        // before this can run.
        let (value, dropfn) =
            unsafe { (ManuallyDrop::take(&mut self.value), ManuallyDrop::take(&mut self.dropfn)) };
        dropfn(value);
    }
}
