//! Cause-first output

use errchain::{is_not_stack_error, Chain, Payload, Serializer, COLON_SEPARATOR};

/// Writes the messages tail to head, joined by `": "`: `cause: bar: foo`.
/// Stacks are left out.
#[derive(Debug, Default)]
pub struct ReverseColonSerializer {
    /// Positions (from the head) still to be written, cause last in the vec
    pending: Vec<usize>,
    first_entry: bool,
}

impl ReverseColonSerializer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Serializer for ReverseColonSerializer {
    fn init(&mut self, chain: &Chain) {
        self.pending.clear();
        self.pending.extend(
            chain
                .iter()
                .enumerate()
                .filter(|(_, payload)| is_not_stack_error(payload))
                .map(|(position, _)| position),
        );
        self.first_entry = true;
    }

    fn next<'c>(&mut self, chain: &'c Chain) -> Option<&'c Payload> {
        let position = self.pending.pop()?;
        chain.get(position)
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
