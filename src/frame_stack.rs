//! The per-thread stack of active protected blocks.
//!
//! The stack is a singly-linked list threaded through [`Frame::parent`], with the innermost frame
//! on top. Each thread owns an independent stack, so a protected block only ever sees the frames
//! of its own thread.

use super::{fatal, frame::Frame, location::Location};
use alloc::rc::Rc;
use core::cell::RefCell;

type Top = RefCell<Option<Rc<Frame>>>;

#[cfg(thread_local = "std")]
std::thread_local! {
    /// Innermost active frame of this thread.
    static TOP: Top = const { RefCell::new(None) };
}

#[cfg(thread_local = "attribute")]
#[thread_local]
static TOP: Top = RefCell::new(None);

fn with_top<R>(f: impl FnOnce(&Top) -> R) -> R {
    #[cfg(thread_local = "std")]
    return TOP.with(f);

    #[cfg(thread_local = "attribute")]
    return f(&TOP);
}

/// Walk the stack from `top` towards the bottom.
pub fn frames<'a>(top: Option<&'a Rc<Frame>>) -> impl Iterator<Item = &'a Rc<Frame>> {
    core::iter::successors(top, |frame| frame.parent.as_ref())
}

/// Run `f` with a view of the current top of the stack.
///
/// `f` must not push or pop frames.
pub fn inspect<R>(f: impl FnOnce(Option<&Rc<Frame>>) -> R) -> R {
    with_top(|top| f(top.borrow().as_ref()))
}

/// Open a new frame on top of the stack.
pub fn push(origin: Location) -> Rc<Frame> {
    with_top(|top| {
        let mut top = top.borrow_mut();
        let frame = Rc::new(Frame::new(origin, top.take()));
        *top = Some(Rc::clone(&frame));
        tracing::trace!(origin = %origin, "pushed frame");
        frame
    })
}

/// Retire `frame`, making its parent the new top.
///
/// Frames above `frame`, if any, are retired along with it. `frame` must be reachable from the
/// top; anything else means the stack was corrupted, and the process is aborted.
pub fn pop(frame: &Rc<Frame>) {
    with_top(|top| {
        let mut top = top.borrow_mut();
        if !frames(top.as_ref()).any(|active| Rc::ptr_eq(active, frame)) {
            fatal::inconsistent(frame.origin(), "popped a frame that is not on the stack");
        }
        *top = frame.parent.clone();
        tracing::trace!(origin = %frame.origin(), "popped frame");
    });
}

/// Make `frame` the top of the stack, retiring every frame above it.
pub fn unwind_to(frame: &Rc<Frame>) {
    with_top(|top| {
        let mut top = top.borrow_mut();
        if !frames(top.as_ref()).any(|active| Rc::ptr_eq(active, frame)) {
            fatal::inconsistent(frame.origin(), "unwound to a frame that is not on the stack");
        }
        *top = Some(Rc::clone(frame));
    });
}

/// The innermost active frame, if any.
pub fn top() -> Option<Rc<Frame>> {
    inspect(|top| top.cloned())
}

/// The number of protected blocks currently active on the calling thread.
///
/// ```rust
/// use tryframe::{Try, depth};
///
/// assert_eq!(depth(), 0);
/// Try::<()>::new().run(|| assert_eq!(depth(), 1));
/// assert_eq!(depth(), 0);
/// ```
#[inline]
#[must_use]
pub fn depth() -> usize {
    inspect(|top| frames(top).count())
}
