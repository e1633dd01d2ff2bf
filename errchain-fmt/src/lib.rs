//! # errchain-fmt
//!
//! Serializers for [`errchain::Printer`] beyond the default colon list.
//!
//! | Serializer | Output for `foo -> bar -> stack -> cause` |
//! |---|---|
//! | [`ShortStackSerializer`] | `(a - b - c)` |
//! | [`DefaultAndShortStackSerializer`] | `foo: bar: cause (a - b - c)` |
//! | [`JsonSerializer`] | `["foo","bar","cause"]` |
//! | [`ReverseColonSerializer`] | `cause: bar: foo` |
//!
//! ```rust
//! use errchain::{new, wrap};
//!
//! let err = wrap(Some(new("cause")), Some(new("context"))).unwrap();
//! assert_eq!(errchain_fmt::json_printer().string(&err), r#"["context","cause"]"#);
//! assert_eq!(errchain_fmt::reverse_printer().string(&err), "cause: context");
//! ```

mod json;
mod reverse;
mod short_stack;

pub use json::JsonSerializer;
pub use reverse::ReverseColonSerializer;
pub use short_stack::{short_name, DefaultAndShortStackSerializer, ShortStackSerializer};

use errchain::Printer;

/// Printer writing only the stacks, with short function names
pub fn short_stack_printer() -> Printer {
    Printer::new(ShortStackSerializer::new)
}

/// Printer writing the messages followed by the stacks
pub fn default_and_short_stack_printer() -> Printer {
    Printer::new(DefaultAndShortStackSerializer::new)
}

/// Printer writing the messages as a JSON array of strings
pub fn json_printer() -> Printer {
    Printer::new(JsonSerializer::new)
}

/// Printer writing the messages cause first
pub fn reverse_printer() -> Printer {
    Printer::new(ReverseColonSerializer::new)
}
