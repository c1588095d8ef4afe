use super::{
    backend::{ActiveBackend, Backend},
    exception::Exception,
    fatal,
    frame::Frame,
    frame_stack,
    identity::{ASSERT_ERROR, Identity},
    location::Location,
};
use alloc::rc::Rc;

/// Throw an exception.
///
/// The nearest enclosing protected block that declared a handler for `identity` catches it. Blocks
/// in between are abandoned, except that those with a cleanup clause get to run it on the way.
///
/// If no active block handles `identity`, a diagnostic is written to standard error and the
/// process is aborted.
///
/// The location of the caller is reported in diagnostics; use [`throw_at`] to supply another one.
///
/// # Example
///
/// ```rust
/// use tryframe::{Identity, Try, throw};
///
/// static EMPTY: Identity = Identity::new("Queue is empty");
///
/// fn pop(queue: &mut Vec<u32>) -> u32 {
///     queue.pop().unwrap_or_else(|| throw(&EMPTY))
/// }
///
/// let value = Try::new()
///     .catch(&EMPTY, |_| 0)
///     .run(|| pop(&mut vec![]));
/// assert_eq!(value, 0);
/// ```
#[inline]
#[track_caller]
pub fn throw(identity: &'static Identity) -> ! {
    throw_at(identity, Location::caller());
}

/// Throw an exception, reporting `location` in diagnostics.
///
/// ```rust
/// use tryframe::{Identity, Try, location, throw_at};
///
/// static DENIED: Identity = Identity::new("Permission denied");
///
/// let location = Try::new()
///     .catch(&DENIED, |exception| exception.location())
///     .run(|| throw_at(&DENIED, location!()));
/// assert!(location.function().is_some());
/// ```
#[inline]
pub fn throw_at(identity: &'static Identity, location: Location) -> ! {
    let exception = Exception::new(identity, location);
    match select_target(identity) {
        Some(target) => {
            tracing::trace!(
                exception = %exception,
                target = %target.origin(),
                "dispatching exception",
            );
            frame_stack::unwind_to(&target);
            target.dispatch(exception);
            ActiveBackend::transfer(target.id());
        }
        None => fatal::uncaught(&exception),
    }
}

/// Pick the frame that control is transferred to for `identity`.
///
/// That's the nearest frame that either handles `identity` or has a cleanup clause, as long as
/// some frame handles `identity` at all. Otherwise, there is no target, unless cleanup clauses are
/// configured to run for uncaught exceptions, in which case the nearest frame with a cleanup
/// clause is picked.
fn select_target(identity: &Identity) -> Option<Rc<Frame>> {
    frame_stack::inspect(|top| {
        let handler = frame_stack::frames(top).find(|frame| frame.handles(identity));
        match handler {
            Some(handler) => frame_stack::frames(top)
                .find(|frame| frame.has_cleanup() || Rc::ptr_eq(frame, handler))
                .cloned(),
            #[cfg(uncaught_cleanup = "run")]
            None => frame_stack::frames(top)
                .find(|frame| frame.has_cleanup())
                .cloned(),
            #[cfg(uncaught_cleanup = "skip")]
            None => None,
        }
    })
}

/// Throw [`ASSERT_ERROR`] unless `condition` holds.
///
/// ```rust
/// use tryframe::{ASSERT_ERROR, Try, assert};
///
/// let caught = Try::new()
///     .catch(&ASSERT_ERROR, |_| true)
///     .run(|| {
///         assert(1 == 2);
///         false
///     });
/// assert!(caught);
/// ```
#[inline]
#[track_caller]
pub fn assert(condition: bool) {
    if !condition {
        throw_at(&ASSERT_ERROR, Location::caller());
    }
}

/// Throw [`ASSERT_ERROR`] unless `condition` holds, reporting `location` in diagnostics.
#[inline]
pub fn assert_at(condition: bool, location: Location) {
    if !condition {
        throw_at(&ASSERT_ERROR, location);
    }
}
