//! # Serializers
//!
//! A [`Serializer`] decides how a chain becomes text: which payloads are
//! written, in which order, how each is rendered and what goes between them.
//! Serializers are stateful and reused; a [`crate::Printer`] drives them.
//!
//! The same error can be printed as one line for logs, as JSON for an
//! aggregator, or as only its user-safe messages, by choosing a serializer.

use crate::chain::Chain;
use crate::error::Payload;
use crate::stack::is_not_stack_error;

/// Separator used by the default serializer
pub const COLON_SEPARATOR: &str = ": ";

/// Defines how a chain is converted to text.
pub trait Serializer: Send {
    /// Reset any state left from a previous chain and prepare for `chain`.
    /// A bare error is presented as a single node chain.
    fn init(&mut self, chain: &Chain);

    /// The next payload to write, or `None` when done.
    ///
    /// `chain` is the same chain passed to `init`.
    fn next<'c>(&mut self, chain: &'c Chain) -> Option<&'c Payload>;

    /// Render `payload` some way other than its `Display`.
    ///
    /// Write into `buf` and return true, or write nothing and return false to
    /// fall back to `Display`.
    fn custom_format(&mut self, payload: &Payload, buf: &mut String) -> bool {
        let _ = (payload, buf);
        false
    }

    /// Append one rendered payload to `out`, with any separator, prefix or
    /// suffix.
    fn append(&mut self, out: &mut String, rendered: &str);

    /// Called once after the last payload, even if there was none.
    fn finish(&mut self, out: &mut String) {
        let _ = out;
    }
}

/// Forward position over a chain, head to tail.
///
/// Serializers keep one of these instead of a borrow of the chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    position: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewind to the head
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Position of the next payload to be examined (0 = head)
    pub fn position(&self) -> usize {
        self.position
    }

    /// Advance past the next payload satisfying `keep` and return it
    pub fn next_matching<'c, P>(&mut self, chain: &'c Chain, mut keep: P) -> Option<&'c Payload>
    where
        P: FnMut(&Payload) -> bool,
    {
        while let Some(payload) = chain.get(self.position) {
            self.position += 1;
            if keep(payload) {
                return Some(payload);
            }
        }
        None
    }
}

/// The default serializer: skips stack snapshots and joins messages with `": "`.
///
/// For `"wrapper-2" -> "wrapper-1" -> StackError -> "cause"` it writes
/// `"wrapper-2: wrapper-1: cause"`.
#[derive(Debug, Default)]
pub struct ColonSerializer {
    cursor: Cursor,
    first_entry: bool,
}

impl ColonSerializer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Serializer for ColonSerializer {
    fn init(&mut self, _chain: &Chain) {
        self.cursor.reset();
        self.first_entry = true;
    }

    fn next<'c>(&mut self, chain: &'c Chain) -> Option<&'c Payload> {
        self.cursor.next_matching(chain, is_not_stack_error)
    }

    fn append(&mut self, out: &mut String, rendered: &str) {
        if self.first_entry {
            self.first_entry = false;
        } else {
            out.push_str(COLON_SEPARATOR);
        }
        out.push_str(rendered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::is_stack_error;
    use crate::{new, wrap};

    fn drive(serializer: &mut dyn Serializer, chain: &Chain) -> String {
        let mut out = String::new();
        serializer.init(chain);
        while let Some(payload) = serializer.next(chain) {
            let mut buf = String::new();
            if !serializer.custom_format(payload, &mut buf) {
                buf = payload.to_string();
            }
            serializer.append(&mut out, &buf);
        }
        serializer.finish(&mut out);
        out
    }

    #[test]
    fn test_cursor_skips_filtered() {
        let err = wrap(Some(new("cause")), Some(new("wrapper"))).unwrap();
        let chain = err.as_chain().unwrap();

        let mut cursor = Cursor::new();
        assert_eq!(
            cursor.next_matching(chain, is_not_stack_error).map(|p| p.to_string()),
            Some("wrapper".into())
        );
        assert_eq!(cursor.position(), 2);
        assert_eq!(
            cursor.next_matching(chain, is_not_stack_error).map(|p| p.to_string()),
            Some("cause".into())
        );
        assert!(cursor.next_matching(chain, is_not_stack_error).is_none());
        assert!(cursor.next_matching(chain, |_| true).is_none());

        cursor.reset();
        assert!(cursor.next_matching(chain, is_stack_error).is_some());
    }

    #[test]
    fn test_colon_serializer() {
        let err = wrap(
            wrap(Some(new("cause_msg")), Some(new("wrapping_msg_1"))),
            Some(new("wrapping_msg_2")),
        )
        .unwrap();
        let mut serializer = ColonSerializer::new();
        assert_eq!(
            drive(&mut serializer, err.as_chain().unwrap()),
            "wrapping_msg_2: wrapping_msg_1: cause_msg"
        );
    }

    #[test]
    fn test_colon_serializer_is_reusable() {
        let mut serializer = ColonSerializer::new();

        let first = wrap(Some(new("a")), Some(new("b"))).unwrap();
        assert_eq!(drive(&mut serializer, first.as_chain().unwrap()), "b: a");

        let second = wrap(None, Some(new("only"))).unwrap();
        assert_eq!(drive(&mut serializer, second.as_chain().unwrap()), "only");
    }
}
