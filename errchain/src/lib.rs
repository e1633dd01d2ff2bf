//! # errchain
//!
//! Error wrapping for programs that want to keep every layer of an error,
//! without asking the wrapped error types to cooperate.
//!
//! ## Design Philosophy
//!
//! - **Chain**: an ordered list of payload errors, newest first, cause last
//! - **Stack snapshots**: `wrap` records where an error was first wrapped as an
//!   ordinary payload of type [`StackError`]
//! - **Comparison**: [`similar`] and [`contains`] compare chains by payload type
//!   and message, ignoring stack snapshots
//! - **Printers**: how a chain becomes text is decided by a [`Serializer`], not by
//!   the errors themselves
//!
//! ## Usage
//!
//! ```rust
//! use errchain::{new, wrap, Message};
//!
//! fn load() -> Option<errchain::Error> {
//!     let cause = new("connection refused");
//!     wrap(Some(cause), Some(new("loading profile")))
//! }
//!
//! let err = load().unwrap();
//! assert_eq!(err.to_string(), "loading profile: connection refused");
//! assert_eq!(err.cause().to_string(), "connection refused");
//! assert!(err.find_typed::<Message>().is_some());
//! ```
//!
//! ## Principles
//!
//! - Errors are never mutated; wrapping consumes its inputs and returns a new chain
//! - A payload is never itself a chain
//! - Degenerate inputs (nothing to wrap, nothing to compare) are answered, not reported

mod chain;
mod compare;
mod error;
mod find;
mod message;
mod wrap;

pub mod config;
pub mod printer;
pub mod serializer;
pub mod stack;

pub use chain::{Chain, Payloads};
pub use compare::{contains, similar};
pub use error::{Error, Payload};
pub use find::{cause, find, find_typed};
pub use message::{new, Message};
pub use printer::Printer;
pub use serializer::{ColonSerializer, Cursor, Serializer, COLON_SEPARATOR};
pub use stack::{is_not_stack_error, is_stack_error, Frame, StackError, StackOpts, DEFAULT_DEPTH};
pub use wrap::{wrap, wrap_with_opts};

/// Result type alias using errchain Error
pub type Result<T> = std::result::Result<T, Error>;
