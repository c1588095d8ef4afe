use super::identity::Identity;
use thiserror::Error;

/// The maximum number of clauses, handlers and cleanup alike, one protected block may declare.
pub const MAX_REGISTRATIONS: usize = 32;

/// A protected block declared more clauses than it can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("protected block declares more than {limit} clauses")]
    Overflow { limit: usize },
}

/// A bounded, ordered list of identities a frame is prepared to catch.
// Invariants:
// - `len <= MAX_REGISTRATIONS`
// - `slots[..len]` are all `Some`, `slots[len..]` are all `None`
pub struct Registry {
    slots: [Option<&'static Identity>; MAX_REGISTRATIONS],
    len: usize,
}

impl Registry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            slots: [None; MAX_REGISTRATIONS],
            len: 0,
        }
    }

    /// Append an identity.
    ///
    /// Duplicates are accepted; they occupy a slot each.
    pub fn register(&mut self, identity: &'static Identity) -> Result<(), RegistrationError> {
        self.ensure_room()?;
        self.slots[self.len] = Some(identity);
        self.len += 1;
        Ok(())
    }

    /// Fail if no further clause may be declared.
    ///
    /// Cleanup clauses are subject to the bound but don't take a slot.
    pub const fn ensure_room(&self) -> Result<(), RegistrationError> {
        if self.len >= MAX_REGISTRATIONS {
            return Err(RegistrationError::Overflow {
                limit: MAX_REGISTRATIONS,
            });
        }
        Ok(())
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.iter().any(|registered| registered == identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Identity> + '_ {
        self.slots[..self.len].iter().flatten().copied()
    }
}
