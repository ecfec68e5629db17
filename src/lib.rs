#![warn(missing_docs)]

//! Dropstack emulates deterministic, stack-ordered resource cleanup for values whose teardown
//! cannot be expressed as a plain `Drop` impl — external handles, values finalized through a
//! shared registry, or code ported from languages where construction and destruction are paired
//! manually.
//!
//! The crate guarantees that every value successfully placed under a [`Scope`] is torn down
//! exactly once, in strict reverse order of registration (last-constructed, first-destroyed),
//! no matter which exit path leaves the scope: normal fallthrough, early return, or panic.
//!
//! # Usage
//!
//! ```rust
//! use dropstack::{Destructible, Scope};
//!
//! struct Connection {
//!     id: u32,
//!     closed: bool,
//! }
//!
//! impl Destructible for Connection {
//!     fn teardown(&mut self) {
//!         self.closed = true;
//!     }
//! }
//!
//! let mut scope = Scope::new();
//! let a = scope.adopt(Connection { id: 1, closed: false });
//! let b = scope.adopt(Connection { id: 2, closed: false });
//!
//! // Both values stay usable while the scope is open.
//! assert_eq!(a.borrow().id + b.borrow().id, 3);
//!
//! // Tears down `b` first, then `a`.
//! scope.unwind();
//! assert!(a.borrow().closed && b.borrow().closed);
//! ```
//!
//! # Overview
//!
//! The primary pieces provided by Dropstack are:
//!
//! - [`Scope`]: an ordered registry of pending teardown actions for one lexical scope.
//!   Values enter it through [`adopt`][Scope::adopt] (infallible construction),
//!   [`construct`][Scope::construct] (fallible construction; nothing is registered on failure),
//!   or [`register`][Scope::register] (a bare cleanup closure). Unwinding happens explicitly
//!   via [`unwind`][Scope::unwind] or implicitly when the scope is dropped.
//! - [`Destructible`]: the capability a type implements to be finalized by a scope.
//! - [`Handle`]: the caller's shared reference to an adopted value. The scope keeps its own
//!   back-reference for teardown; the handle keeps the value accessible until then.
//! - [`ScopeGuard`]: a single-value guard for the common case of one resource and one cleanup
//!   action, with [`defuse`][ScopeGuard::defuse] for moving the value out intact. [`defer`]
//!   builds a value-less guard from a closure.
//! - [`scope`]: runs a closure with a fresh `Scope` and unwinds on every way out of it.
//!
//! # Misuse policy
//!
//! Exceeding a scope's entry limit is a programming error, not a runtime condition: silently
//! dropping an entry would leak the resource behind it. [`Scope::register`] therefore panics on
//! overflow, while [`Scope::try_register`] reports it as [`ErrorKind::CapacityExceeded`] for
//! embeddings that prefer to surface the contract violation themselves. Recoverable
//! construction failure is a different thing entirely and belongs to the constructor: a failed
//! [`construct`][Scope::construct] leaves the scope untouched.
//!
//! Scopes are single-threaded by design. A [`Handle`] is neither `Send` nor `Sync`, and a
//! `Scope` belongs to the control flow that opened it.

pub mod error;

mod destructible;
mod guard;
mod scope;

pub use destructible::Destructible;
pub use error::{Error, ErrorKind};
pub use guard::{defer, guard, ScopeGuard};
pub use scope::{scope, Handle, Scope, DEFAULT_LIMIT};

/// Convenience alias for a result with [`Error`]
pub type Result<T, E = Error> = core::result::Result<T, E>;
