use super::frame::FrameId;
use alloc::boxed::Box;
use core::any::Any;

/// A control-transfer backend.
///
/// Transferring is a mechanism of forcefully "returning" through multiple call frames up until the
/// `intercept` call that belongs to the target protected block. This roughly corresponds to the
/// `resume_unwind`/`catch_unwind` pair in Rust and the `longjmp`/`setjmp` pair in C.
///
/// It's crucial that the transfer doesn't require (source-level) cooperation from the
/// intermediate call frames. During the transfer, all destructors of locals must be run, as if
/// `return` was called.
///
/// Every `intercept` on the way sees the transfer, not just the target's. Interceptors that are
/// not the target must pass it on with [`Backend::resume`] after doing their own bookkeeping.
pub trait Backend {
    /// Unwind towards the protected block owning `target`.
    fn transfer(target: FrameId) -> !;

    /// Run `func`, stopping any unwinding that escapes it.
    ///
    /// Returns `Ok` if `func` returns normally and `Err` if it unwinds, whether because of a
    /// transfer or because of something foreign, like a Rust panic.
    fn intercept<Func: FnOnce() -> R, R>(func: Func) -> Result<R, Unwind>;

    /// Continue an unwind previously stopped by [`Backend::intercept`].
    fn resume(unwind: Unwind) -> !;
}

/// An unwind stopped by [`Backend::intercept`].
pub enum Unwind {
    /// A transfer towards a protected block.
    Transfer(FrameId),
    /// Unwinding not started by this crate. Its payload is kept as-is.
    Foreign(Box<dyn Any + Send>),
}

mod panic;

pub use panic::ActiveBackend;
