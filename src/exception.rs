use super::{identity::Identity, location::Location};
use core::fmt;

/// A thrown exception: its identity and where it was thrown.
///
/// Handlers receive the exception they caught.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Exception {
    identity: &'static Identity,
    location: Location,
}

impl Exception {
    #[inline]
    #[must_use]
    pub const fn new(identity: &'static Identity, location: Location) -> Self {
        Self { identity, location }
    }

    #[inline]
    #[must_use]
    pub const fn identity(&self) -> &'static Identity {
        self.identity
    }

    #[inline]
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Check whether this exception has the given identity.
    #[inline]
    #[must_use]
    pub fn is(&self, identity: &Identity) -> bool {
        self.identity == identity
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: exception {}", self.location, self.identity)
    }
}
