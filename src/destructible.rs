/// The teardown capability required of values placed under a [`Scope`][crate::Scope].
///
/// `teardown` is the value's finalizer: it runs exactly once, when the owning scope unwinds,
/// and never runs for a value whose construction failed (a failed constructor returns `Err`
/// before the value ever reaches a scope). Implementations finalize in place; releasing the
/// memory itself is still ordinary `Drop`.
///
/// Types whose cleanup is fully expressed by `Drop` don't need this trait or a scope at all.
pub trait Destructible {
    /// Finalizes the value.
    fn teardown(&mut self);
}
