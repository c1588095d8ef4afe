//! Try/catch/finally blocks with identity-matched exceptions.
//!
//! Tryframe provides protected blocks in the spirit of `try`/`catch`/`finally`: a body runs under a
//! set of handlers, each registered for one exception [`Identity`], plus an optional cleanup clause
//! that runs however the block is left. [`throw`] looks for the nearest enclosing block that
//! handles the identity and transfers control there, abandoning the code in between.
//!
//! Exceptions carry no payload beyond their identity and the location they were thrown from.
//! Identities are compared by address, so every exception is declared once as a `static`.
//!
//!
//! # Usage
//!
//! ```rust
//! use std::cell::RefCell;
//! use tryframe::{ASSERT_ERROR, Identity, Try, assert, throw};
//!
//! static OUT_OF_RANGE: Identity = Identity::new("Index out of range");
//!
//! fn get(items: &[u32], index: usize) -> u32 {
//!     assert(!items.is_empty());
//!     match items.get(index) {
//!         Some(item) => *item,
//!         None => throw(&OUT_OF_RANGE),
//!     }
//! }
//!
//! let log = RefCell::new(Vec::new());
//! let item = Try::new()
//!     .catch(&OUT_OF_RANGE, |_| 0)
//!     .catch(&ASSERT_ERROR, |_| u32::MAX)
//!     .finally(|| log.borrow_mut().push("done"))
//!     .run(|| get(&[1, 2, 3], 7));
//!
//! assert_eq!(item, 0);
//! assert_eq!(*log.borrow(), ["done"]);
//! ```
//!
//!
//! # Uncaught exceptions
//!
//! Throwing an identity that no active block handles is fatal: a diagnostic of the form
//!
//! ```text
//! src/main.rs:main:12: Uncaught exception `Index out of range`
//! ```
//!
//! is written to standard error and the process is aborted. The `file:function:line:` prefix is
//! only written when the location was recorded with [`location!`], since [`throw`] and
//! [`assert`] don't know the enclosing function. Before that, the cleanup clauses
//! of the active blocks still run, innermost first. Build with `TRYFRAME_UNCAUGHT_CLEANUP=skip`
//! to abort right away instead.
//!
//! Declaring more than [`MAX_REGISTRATIONS`] clauses on one block is a fatal configuration error
//! too; the process exits with a failure status before the block's body runs.
//!
//!
//! # Threads and unwinding
//!
//! Each thread has its own stack of active blocks, so exceptions never cross threads.
//!
//! Control transfer rides on Rust unwinding, which must be enabled (`panic = "unwind"`). A
//! [`std::panic::catch_unwind`] between a [`throw`] and the block that handles it intercepts the
//! transfer and leaves the stack of active blocks inconsistent. The block that notices aborts the
//! process with a diagnostic, so don't let throwing code run under foreign unwinding handlers.
//! Rust panics, on the other hand, pass through protected blocks, which run their cleanup clauses
//! on the way.

#![cfg_attr(thread_local = "attribute", feature(thread_local))]
#![forbid(unsafe_code)]
#![warn(
    clippy::cargo,
    clippy::pedantic,
    clippy::alloc_instead_of_core,
    clippy::allow_attributes,
    clippy::clone_on_ref_ptr,
    clippy::else_if_without_else,
    clippy::empty_drop,
    clippy::empty_structs_with_brackets,
    clippy::format_push_string,
    clippy::missing_assert_message,
    clippy::missing_inline_in_public_items,
    clippy::mixed_read_write_in_expression,
    clippy::needless_raw_strings,
    clippy::rc_buffer,
    clippy::redundant_type_annotations,
    clippy::same_name_method,
    clippy::self_named_module_files,
    clippy::semicolon_inside_block,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::string_to_string,
    clippy::try_err,
    clippy::unneeded_field_pattern,
    clippy::unused_result_ok,
    clippy::wildcard_enum_match_arm,
)]

extern crate alloc;

mod backend;
mod exception;
mod fatal;
mod frame;
mod frame_stack;
mod identity;
mod location;
mod registry;
mod throw;
mod r#try;

pub use exception::Exception;
pub use frame_stack::depth;
pub use identity::{ASSERT_ERROR, Identity};
#[doc(hidden)]
pub use location::function_name;
pub use location::Location;
pub use r#try::Try;
pub use registry::MAX_REGISTRATIONS;
pub use throw::{assert, assert_at, throw, throw_at};
