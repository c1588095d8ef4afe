//! Terminal exits.
//!
//! Nothing here returns. Diagnostics go straight to standard error and are flushed before the
//! process goes away.

use super::{exception::Exception, location::Location, registry::RegistrationError};
use std::io::Write;

/// An exception reached the bottom of the stack without being claimed by any frame.
///
/// The location prefix is only written when the throwing function is known.
#[cold]
pub fn uncaught(exception: &Exception) -> ! {
    let mut stderr = std::io::stderr().lock();
    let location = exception.location();
    if location.function().is_some() {
        let _ = write!(stderr, "{location}: ");
    }
    let _ = writeln!(stderr, "Uncaught exception {}", exception.identity());
    let _ = stderr.flush();
    std::process::abort();
}

/// A protected block was declared with more clauses than a frame can hold.
#[cold]
pub fn misconfigured(origin: Location, error: &RegistrationError) -> ! {
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{origin}: {error}");
    let _ = stderr.flush();
    std::process::exit(1);
}

/// The frame stack no longer matches the protected blocks that are running.
#[cold]
pub fn inconsistent(origin: Location, what: &str) -> ! {
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{origin}: tryframe: {what}. The process will now terminate.");
    let _ = stderr.flush();
    std::process::abort();
}
