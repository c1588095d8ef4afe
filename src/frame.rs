use super::{
    exception::Exception,
    identity::Identity,
    location::Location,
    registry::{RegistrationError, Registry},
};
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

/// The runtime record of one active protected block.
///
/// Frames are created by [`frame_stack::push`](super::frame_stack::push) and only ever touched by
/// the thread running the block they belong to.
pub struct Frame {
    registry: RefCell<Registry>,
    has_cleanup: Cell<bool>,
    dispatched: Cell<Option<Exception>>,
    origin: Location,
    pub(crate) parent: Option<Rc<Frame>>,
}

/// Address-based frame handle that can travel inside an unwinding payload.
///
/// Two live frames never share an id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameId(usize);

impl Frame {
    pub(crate) fn new(origin: Location, parent: Option<Rc<Frame>>) -> Self {
        Self {
            registry: RefCell::new(Registry::new()),
            has_cleanup: Cell::new(false),
            dispatched: Cell::new(None),
            origin,
            parent,
        }
    }

    pub fn id(self: &Rc<Self>) -> FrameId {
        FrameId(Rc::as_ptr(self).addr())
    }

    pub fn origin(&self) -> Location {
        self.origin
    }

    /// Declare a handler clause for `identity`.
    pub fn register(&self, identity: &'static Identity) -> Result<(), RegistrationError> {
        self.registry.borrow_mut().register(identity)
    }

    /// Declare a cleanup clause.
    pub fn enable_cleanup(&self) -> Result<(), RegistrationError> {
        self.registry.borrow().ensure_room()?;
        self.has_cleanup.set(true);
        Ok(())
    }

    pub fn handles(&self, identity: &Identity) -> bool {
        self.registry.borrow().contains(identity)
    }

    pub fn has_cleanup(&self) -> bool {
        self.has_cleanup.get()
    }

    /// Record the exception this frame is being unwound for.
    pub fn dispatch(&self, exception: Exception) {
        self.dispatched.set(Some(exception));
    }

    /// Take the recorded exception, clearing it.
    pub fn take_dispatched(&self) -> Option<Exception> {
        self.dispatched.take()
    }
}
