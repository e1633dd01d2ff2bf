//! Stack-oriented serializers

use errchain::stack::UNKNOWN_FRAME;
use errchain::{
    is_not_stack_error, is_stack_error, Chain, Cursor, Payload, Serializer, StackError,
    COLON_SEPARATOR,
};

const FRAME_SEPARATOR: &str = " - ";

/// The last two path segments of a function name.
///
/// `app::store::load` becomes `store::load`.
pub fn short_name(function: &str) -> &str {
    let mut cut = function.rmatch_indices("::").skip(1);
    match cut.next() {
        Some((idx, sep)) => &function[idx + sep.len()..],
        None => function,
    }
}

fn write_short_stack(stack: &StackError, buf: &mut String) {
    for (i, frame) in stack.frames().iter().enumerate() {
        if i > 0 {
            buf.push_str(FRAME_SEPARATOR);
        }
        buf.push_str(frame.function.as_deref().map_or(UNKNOWN_FRAME, short_name));
    }
}

fn custom_stack(payload: &Payload, buf: &mut String) -> bool {
    match payload.downcast_ref::<StackError>() {
        Some(stack) => {
            write_short_stack(stack, buf);
            true
        }
        None => false,
    }
}

/// Writes only the stack snapshots: `(a - b) (c - d)`
#[derive(Debug, Default)]
pub struct ShortStackSerializer {
    cursor: Cursor,
    first_entry: bool,
}

impl ShortStackSerializer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Serializer for ShortStackSerializer {
    fn init(&mut self, _chain: &Chain) {
        self.cursor.reset();
        self.first_entry = true;
    }

    fn next<'c>(&mut self, chain: &'c Chain) -> Option<&'c Payload> {
        self.cursor.next_matching(chain, is_stack_error)
    }

    fn custom_format(&mut self, payload: &Payload, buf: &mut String) -> bool {
        custom_stack(payload, buf)
    }

    fn append(&mut self, out: &mut String, rendered: &str) {
        if self.first_entry {
            self.first_entry = false;
        } else {
            out.push(' ');
        }
        out.push('(');
        out.push_str(rendered);
        out.push(')');
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Messages,
    Stacks,
}

/// Writes the colon separated messages, then every stack in parentheses:
/// `foo: bar: cause (a - b - c)`
#[derive(Debug, Default)]
pub struct DefaultAndShortStackSerializer {
    messages: Cursor,
    stacks: Cursor,
    phase: Phase,
    wrote_any: bool,
}

impl DefaultAndShortStackSerializer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Serializer for DefaultAndShortStackSerializer {
    fn init(&mut self, _chain: &Chain) {
        self.messages.reset();
        self.stacks.reset();
        self.phase = Phase::Messages;
        self.wrote_any = false;
    }

    fn next<'c>(&mut self, chain: &'c Chain) -> Option<&'c Payload> {
        if self.phase == Phase::Messages {
            if let Some(payload) = self.messages.next_matching(chain, is_not_stack_error) {
                return Some(payload);
            }
            self.phase = Phase::Stacks;
        }
        self.stacks.next_matching(chain, is_stack_error)
    }

    fn custom_format(&mut self, payload: &Payload, buf: &mut String) -> bool {
        custom_stack(payload, buf)
    }

    fn append(&mut self, out: &mut String, rendered: &str) {
        match self.phase {
            Phase::Messages => {
                if self.wrote_any {
                    out.push_str(COLON_SEPARATOR);
                }
                out.push_str(rendered);
            }
            Phase::Stacks => {
                if self.wrote_any {
                    out.push(' ');
                }
                out.push('(');
                out.push_str(rendered);
                out.push(')');
            }
        }
        self.wrote_any = true;
    }
}
