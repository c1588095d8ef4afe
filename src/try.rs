use super::{
    backend::{ActiveBackend, Backend, Unwind},
    exception::Exception,
    fatal,
    frame::Frame,
    frame_stack,
    identity::Identity,
    location::Location,
    throw::throw_at,
};
use alloc::{boxed::Box, rc::Rc, vec::Vec};

/// A protected block: a body, the handlers that may catch exceptions thrown from it, and an
/// optional cleanup clause.
///
/// Build the block with [`Try::catch`] and [`Try::finally`], then enter it with [`Try::run`]. The
/// body and the handlers produce the block's value, so they share the result type `R`.
///
/// Running a block goes through the following steps:
///
/// 1. A frame is pushed on the calling thread's stack, and every clause is declared on it. More
///    than [`MAX_REGISTRATIONS`](crate::MAX_REGISTRATIONS) clauses terminate the process before
///    the body ever runs.
/// 2. The body runs. If it returns, the frame is popped.
/// 3. If an exception is transferred to this block, the frame is popped and the first handler
///    declared for its identity runs. If there's no such handler, this block was only picked to
///    run its cleanup clause, and the exception continues to propagate after that.
/// 4. The cleanup clause, if any, runs with the frame already popped, so exceptions thrown from it
///    are only caught by enclosing blocks.
///
/// The cleanup clause runs on every way out of the block: normal completion, a handled exception,
/// an exception propagating to an enclosing block, an exception thrown from a handler, and Rust
/// panics passing through.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use tryframe::{Identity, Try, throw};
///
/// static EOF: Identity = Identity::new("End of file");
///
/// let log = RefCell::new(Vec::new());
/// let read = Try::new()
///     .catch(&EOF, |_| {
///         log.borrow_mut().push("caught");
///         0
///     })
///     .finally(|| log.borrow_mut().push("closed"))
///     .run(|| {
///         log.borrow_mut().push("reading");
///         throw(&EOF)
///     });
///
/// assert_eq!(read, 0);
/// assert_eq!(*log.borrow(), ["reading", "caught", "closed"]);
/// ```
#[must_use = "a protected block does nothing until `run` is called"]
pub struct Try<'a, R> {
    origin: Location,
    handlers: Vec<Handler<'a, R>>,
    cleanup: Option<Box<dyn FnOnce() + 'a>>,
}

struct Handler<'a, R> {
    identity: &'static Identity,
    body: Box<dyn FnOnce(Exception) -> R + 'a>,
}

/// How the body, or the handler that replaced it, left the block.
enum Outcome<R> {
    Completed(R),
    Handled(R),
    /// Picked for cleanup only; the exception goes on to an enclosing block.
    Propagate(Exception),
    Unwinding(Unwind),
}

impl<'a, R> Try<'a, R> {
    /// Declare a protected block at the caller's location.
    #[inline]
    #[track_caller]
    pub fn new() -> Self {
        Self::at(Location::caller())
    }

    /// Declare a protected block, reporting `origin` as its location.
    #[inline]
    pub fn at(origin: Location) -> Self {
        Self {
            origin,
            handlers: Vec::new(),
            cleanup: None,
        }
    }

    /// Add a handler clause for `identity`.
    ///
    /// If several handlers are declared for the same identity, the first one wins.
    #[inline]
    pub fn catch(
        mut self,
        identity: &'static Identity,
        handler: impl FnOnce(Exception) -> R + 'a,
    ) -> Self {
        self.handlers.push(Handler {
            identity,
            body: Box::new(handler),
        });
        self
    }

    /// Set the cleanup clause, replacing any previously set one.
    #[inline]
    pub fn finally(mut self, cleanup: impl FnOnce() + 'a) -> Self {
        self.cleanup = Some(Box::new(cleanup));
        self
    }

    /// Enter the block, run it to completion, and leave it.
    ///
    /// Returns the value of the body, or of the handler that caught an exception thrown from it.
    /// Exceptions that are not handled here propagate to enclosing blocks after the cleanup clause
    /// has run.
    pub fn run(self, body: impl FnOnce() -> R) -> R {
        let Self {
            origin,
            handlers,
            cleanup,
        } = self;

        let frame = frame_stack::push(origin);
        declare(&frame, &handlers, cleanup.is_some());

        let outcome = match ActiveBackend::intercept(body) {
            Ok(value) => {
                if !frame_stack::top().is_some_and(|top| Rc::ptr_eq(&top, &frame)) {
                    fatal::inconsistent(origin, "block completed while not on top of the stack");
                }
                frame_stack::pop(&frame);
                Outcome::Completed(value)
            }
            Err(Unwind::Transfer(target)) if target == frame.id() => {
                let Some(exception) = frame.take_dispatched() else {
                    fatal::inconsistent(origin, "transfer reached a frame without an exception");
                };
                frame_stack::pop(&frame);
                handle(handlers, exception)
            }
            // Retired by a transfer to an enclosing block; the frame is already off the stack.
            Err(unwind @ Unwind::Transfer(_)) => Outcome::Unwinding(unwind),
            Err(unwind @ Unwind::Foreign(_)) => {
                frame_stack::pop(&frame);
                Outcome::Unwinding(unwind)
            }
        };

        if let Some(cleanup) = cleanup {
            tracing::trace!(origin = %origin, "running cleanup");
            cleanup();
        }

        match outcome {
            Outcome::Completed(value) | Outcome::Handled(value) => value,
            Outcome::Propagate(exception) => {
                tracing::trace!(exception = %exception, "propagating after cleanup");
                throw_at(exception.identity(), exception.location())
            }
            Outcome::Unwinding(unwind) => ActiveBackend::resume(unwind),
        }
    }
}

impl<R> Default for Try<'_, R> {
    #[inline]
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

/// Declare every clause of the block on its freshly pushed frame.
fn declare<R>(frame: &Rc<Frame>, handlers: &[Handler<'_, R>], has_cleanup: bool) {
    let mut declared = handlers
        .iter()
        .try_for_each(|handler| frame.register(handler.identity));
    if declared.is_ok() && has_cleanup {
        declared = frame.enable_cleanup();
    }
    if let Err(error) = declared {
        fatal::misconfigured(frame.origin(), &error);
    }
}

/// Run the handler for `exception`, if this block has one.
fn handle<R>(handlers: Vec<Handler<'_, R>>, exception: Exception) -> Outcome<R> {
    let Some(handler) = handlers
        .into_iter()
        .find(|handler| exception.is(handler.identity))
    else {
        return Outcome::Propagate(exception);
    };
    tracing::trace!(exception = %exception, "handling exception");
    match ActiveBackend::intercept(|| (handler.body)(exception)) {
        Ok(value) => Outcome::Handled(value),
        Err(unwind) => Outcome::Unwinding(unwind),
    }
}
