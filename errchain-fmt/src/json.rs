//! JSON output

use errchain::{is_not_stack_error, Chain, Cursor, Payload, Serializer};

/// Writes the messages, head to tail, as a JSON array of strings:
/// `["foo","bar"]`. Stacks are left out.
#[derive(Debug, Default)]
pub struct JsonSerializer {
    cursor: Cursor,
    opened: bool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Serializer for JsonSerializer {
    fn init(&mut self, _chain: &Chain) {
        self.cursor.reset();
        self.opened = false;
    }

    fn next<'c>(&mut self, chain: &'c Chain) -> Option<&'c Payload> {
        self.cursor.next_matching(chain, is_not_stack_error)
    }

    fn append(&mut self, out: &mut String, rendered: &str) {
        out.push(if self.opened { ',' } else { '[' });
        self.opened = true;

        match serde_json::to_string(rendered) {
            Ok(quoted) => out.push_str(&quoted),
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode error message as JSON");
                out.push_str("null");
            }
        }
    }

    fn finish(&mut self, out: &mut String) {
        out.push_str(if self.opened { "]" } else { "[]" });
    }
}
