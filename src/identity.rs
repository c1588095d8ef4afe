use core::fmt;

/// An exception identity.
///
/// Identities are compared by address, never by message: two identities with the same message are
/// still different exceptions. Always declare them as `static` items, so that every reference to
/// an identity points at the same place in memory. A `const` would be duplicated at each use site
/// and never match.
///
/// ```rust
/// use tryframe::{Identity, Try, throw};
///
/// static NOT_FOUND: Identity = Identity::new("Not found");
/// static ALSO_NOT_FOUND: Identity = Identity::new("Not found");
///
/// assert_ne!(NOT_FOUND, ALSO_NOT_FOUND);
///
/// let code = Try::new()
///     .catch(&NOT_FOUND, |_| 404)
///     .run(|| throw(&NOT_FOUND));
/// assert_eq!(code, 404);
/// ```
pub struct Identity {
    message: Option<&'static str>,
}

/// Thrown by [`assert`](crate::assert()) when its condition does not hold.
pub static ASSERT_ERROR: Identity = Identity::new("Assertion failed");

impl Identity {
    /// Create an identity with a human-readable message.
    #[inline]
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self {
            message: Some(message),
        }
    }

    /// Create an identity without a message.
    ///
    /// Diagnostics refer to such identities by address.
    #[inline]
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { message: None }
    }

    /// The message attached to this identity, if any.
    #[inline]
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        self.message
    }
}

impl PartialEq for Identity {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self, other)
    }
}

impl Eq for Identity {}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message {
            Some(message) => write!(f, "Identity({message:?} @{self:p})"),
            None => write!(f, "Identity(@{self:p})"),
        }
    }
}

impl fmt::Display for Identity {
    /// Formats as `` `message` `` or `@address`, the way the uncaught-exception diagnostic does.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message {
            Some(message) => write!(f, "`{message}`"),
            None => write!(f, "@{self:p}"),
        }
    }
}
