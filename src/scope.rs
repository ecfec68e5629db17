use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::error::ErrorKind;
use crate::{Destructible, Error, Result};

/// Default entry limit of a [`Scope`].
pub const DEFAULT_LIMIT: usize = 64;

type Teardown = Box<dyn FnOnce()>;

/// An ordered registry of pending teardown actions for one lexical scope.
///
/// Entries accumulate in registration order and run in reverse when the scope unwinds, so a
/// later value may rely on every earlier value still being intact during its own teardown.
/// Unwinding happens at most once: either explicitly through [`unwind`][Scope::unwind], which
/// consumes the scope, or implicitly when the scope is dropped (early return and panic paths
/// included).
///
/// A scope belongs to the control flow that opened it and is not `Send`.
pub struct Scope {
    entries: Vec<Teardown>,
    limit: usize,
}

impl Scope {
    /// Opens a new, empty scope with the [default entry limit][DEFAULT_LIMIT].
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }

    /// Opens a new, empty scope accepting at most `limit` entries.
    pub fn with_limit(limit: usize) -> Self {
        Scope {
            entries: Vec::new(),
            limit,
        }
    }

    /// Registers a cleanup action to run when this scope unwinds. Returns the updated entry
    /// count.
    ///
    /// # Panics
    ///
    /// Panics if the scope's entry limit is already reached. Registration past the limit is a
    /// contract violation: the alternative, dropping the action, would leak whatever the
    /// action was meant to release. Use [`try_register`][Scope::try_register] to handle the
    /// condition as an error instead.
    pub fn register(&mut self, teardown: impl FnOnce() + 'static) -> usize {
        match self.try_register(teardown) {
            Ok(count) => count,
            Err(err) => panic!("{err}"),
        }
    }

    /// Registers a cleanup action, reporting [`ErrorKind::CapacityExceeded`] instead of
    /// panicking when the scope's entry limit is reached. Returns the updated entry count.
    pub fn try_register(&mut self, teardown: impl FnOnce() + 'static) -> Result<usize> {
        if self.entries.len() >= self.limit {
            return Err(Error::new(
                ErrorKind::CapacityExceeded,
                None,
                format!("{} of {} entries registered", self.entries.len(), self.limit),
            ));
        }
        self.entries.push(Box::new(teardown));
        Ok(self.entries.len())
    }

    /// Moves `value` under this scope's control and registers its teardown.
    ///
    /// The returned [`Handle`] keeps the value accessible until the scope unwinds; the scope
    /// holds its own back-reference for the teardown call. Panics like
    /// [`register`][Scope::register] if the entry limit is reached.
    pub fn adopt<T: Destructible + 'static>(&mut self, value: T) -> Handle<T> {
        let handle = Handle(Rc::new(RefCell::new(value)));
        let back = Rc::clone(&handle.0);
        self.register(move || back.borrow_mut().teardown());
        handle
    }

    /// Runs `ctor` and, only on success, adopts the constructed value.
    ///
    /// On `Err` the scope is left untouched: nothing is registered and no teardown will ever
    /// run for the failed attempt. Cleaning up a partially constructed value is the
    /// constructor's own responsibility.
    pub fn construct<T, E>(&mut self, ctor: impl FnOnce() -> Result<T, E>) -> Result<Handle<T>, E>
    where
        T: Destructible + 'static,
    {
        Ok(self.adopt(ctor()?))
    }

    /// Returns the number of entries currently registered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the scope's entry limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Unwinds the scope: every registered teardown runs exactly once, in reverse registration
    /// order.
    ///
    /// Consuming `self` makes reuse after unwinding a compile error. Dropping a scope unwinds
    /// it the same way; this method only makes the point of teardown explicit in the caller's
    /// control flow.
    pub fn unwind(self) {
        drop(self);
    }

    fn run_teardowns(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        debug!(entries = self.entries.len(), "unwinding scope");
        while let Some(teardown) = self.entries.pop() {
            teardown();
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.run_teardowns();
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("entries", &self.entries.len())
            .field("limit", &self.limit)
            .finish()
    }
}

/// Opens a fresh [`Scope`], runs `f` with it, and unwinds on the way out.
///
/// The closure's early returns and panics all pass through the unwind, so this is the
/// preferred way to tie a registry to a lexical region without managing the `Scope` value
/// by hand.
pub fn scope<R>(f: impl FnOnce(&mut Scope) -> R) -> R {
    let mut scope = Scope::new();
    let result = f(&mut scope);
    scope.unwind();
    result
}

/// A shared reference to a value adopted by a [`Scope`].
///
/// The scope holds a twin of this handle and uses it to run the value's teardown at unwind;
/// until then the caller reads and writes the value through [`borrow`][Handle::borrow] and
/// [`borrow_mut`][Handle::borrow_mut]. A borrow must not be held across the owning scope's
/// unwind, since the teardown call needs mutable access.
pub struct Handle<T>(Rc<RefCell<T>>);

impl<T> Handle<T> {
    /// Immutably borrows the underlying value.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Mutably borrows the underlying value.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Handle(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.0.borrow()).finish()
    }
}
