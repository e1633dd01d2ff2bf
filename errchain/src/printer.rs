//! # Printers
//!
//! A [`Printer`] turns errors into text with the [`Serializer`] its factory
//! builds. It is safe to share between threads: every call leases its own
//! serializer and buffers from a pool and returns them when done.

use crate::chain::Chain;
use crate::error::Error;
use crate::serializer::{ColonSerializer, Serializer};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::fmt::{self, Write};

/// Maximum number of idle scratch sets kept by a printer
pub const MAX_POOLED: usize = 64;

type Factory = Box<dyn Fn() -> Box<dyn Serializer> + Send + Sync>;

/// Everything one serialization needs for itself
struct Scratch {
    serializer: Box<dyn Serializer>,
    /// Output buffer, used by `render` and `string`
    out: String,
    /// Rendering of the payload currently being appended
    payload: String,
}

impl Scratch {
    fn new(serializer: Box<dyn Serializer>) -> Self {
        Self {
            serializer,
            out: String::new(),
            payload: String::new(),
        }
    }
}

/// Exclusive use of a scratch, returned to the pool on drop
struct Lease<'p> {
    pool: &'p Mutex<Vec<Scratch>>,
    scratch: Option<Scratch>,
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        if let Some(mut scratch) = self.scratch.take() {
            scratch.out.clear();
            scratch.payload.clear();
            let mut pool = self.pool.lock();
            if pool.len() < MAX_POOLED {
                pool.push(scratch);
            }
        }
    }
}

/// An error printer, fully defined by its serializer factory.
///
/// # Example
///
/// ```rust
/// use errchain::{new, wrap, ColonSerializer, Printer};
///
/// let printer = Printer::new(ColonSerializer::new);
/// let err = wrap(Some(new("cause")), Some(new("context"))).unwrap();
/// assert_eq!(printer.string(&err), "context: cause");
/// ```
pub struct Printer {
    factory: Factory,
    pool: Mutex<Vec<Scratch>>,
}

impl Printer {
    /// Create a printer building serializers with `factory`
    pub fn new<F, S>(factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Serializer + 'static,
    {
        Self {
            factory: Box::new(move || Box::new(factory()) as Box<dyn Serializer>),
            pool: Mutex::new(Vec::new()),
        }
    }

    /// Serialize `err` and hand the text to `f` without copying it
    pub fn render<R>(&self, err: &Error, f: impl FnOnce(&str) -> R) -> R {
        self.with_scratch(|scratch| {
            serialize(
                scratch.serializer.as_mut(),
                &mut scratch.out,
                &mut scratch.payload,
                err,
            );
            f(&scratch.out)
        })
    }

    /// Serialize `err` to a new string.
    ///
    /// Use this to print with a non-default serializer; for the default one,
    /// `err.to_string()` is equivalent.
    pub fn string(&self, err: &Error) -> String {
        self.render(err, str::to_owned)
    }

    /// Serialize `err`, appending to `out`
    pub fn write(&self, out: &mut String, err: &Error) {
        self.with_scratch(|scratch| {
            serialize(scratch.serializer.as_mut(), out, &mut scratch.payload, err);
        })
    }

    /// Number of idle scratch sets currently pooled
    pub fn pooled(&self) -> usize {
        self.pool.lock().len()
    }

    fn with_scratch<R>(&self, f: impl FnOnce(&mut Scratch) -> R) -> R {
        let pooled = self.pool.lock().pop();
        let mut lease = Lease {
            pool: &self.pool,
            scratch: pooled,
        };
        let scratch = lease
            .scratch
            .get_or_insert_with(|| Scratch::new((self.factory)()));
        f(scratch)
    }
}

impl fmt::Debug for Printer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Printer")
            .field("pooled", &self.pooled())
            .finish_non_exhaustive()
    }
}

fn serialize(serializer: &mut dyn Serializer, out: &mut String, buf: &mut String, err: &Error) {
    let single;
    let chain = match err {
        Error::Chain(chain) => chain,
        Error::Bare(payload) => {
            single = Chain::single(payload.clone());
            &single
        }
    };

    serializer.init(chain);
    while let Some(payload) = serializer.next(chain) {
        if !serializer.custom_format(payload, buf) {
            // Writing into a String cannot fail.
            let _ = write!(buf, "{}", payload);
        }
        serializer.append(out, buf);
        buf.clear();
    }
    serializer.finish(out);
}

// =============================================================================
// Process default printer
// =============================================================================

static DEFAULT_PRINTER: OnceCell<Printer> = OnceCell::new();

/// The printer behind `Display` for [`Error`].
///
/// Unless [`install_default`] ran first, this is a [`ColonSerializer`] printer
/// created on first use.
pub fn default_printer() -> &'static Printer {
    DEFAULT_PRINTER.get_or_init(|| Printer::new(ColonSerializer::new))
}

/// Replace the default printer. Only possible before it is first used; the
/// printer is handed back otherwise.
pub fn install_default(printer: Printer) -> std::result::Result<(), Printer> {
    DEFAULT_PRINTER.set(printer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Chain;
    use crate::error::Payload;
    use crate::stack::is_stack_error;
    use crate::{new, wrap};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn scenarios() -> Vec<(&'static str, Error, &'static str)> {
        vec![
            ("nonWrapped", wrap(None, Some(new("msg"))).unwrap(), "msg"),
            ("bare", new("msg"), "msg"),
            (
                "singleWrapped",
                wrap(Some(new("cause_msg")), Some(new("wrapping_msg"))).unwrap(),
                "wrapping_msg: cause_msg",
            ),
            (
                "doubleWrapped",
                wrap(
                    wrap(Some(new("cause_msg")), Some(new("wrapping_msg_1"))),
                    Some(new("wrapping_msg_2")),
                )
                .unwrap(),
                "wrapping_msg_2: wrapping_msg_1: cause_msg",
            ),
        ]
    }

    #[test]
    fn test_default_rendering() {
        for (name, err, expected) in scenarios() {
            assert_eq!(err.to_string(), expected, "{}", name);
            assert_eq!(default_printer().string(&err), expected, "{}", name);
        }
    }

    #[test]
    fn test_foo_bar() {
        let err = wrap(Some(new("bar")), Some(new("foo"))).unwrap();
        assert_eq!(err.to_string(), "foo: bar");
    }

    #[test]
    fn test_write_appends() {
        let printer = Printer::new(ColonSerializer::new);
        let mut out = String::from("error: ");
        printer.write(&mut out, &wrap(Some(new("b")), Some(new("a"))).unwrap());
        assert_eq!(out, "error: a: b");
    }

    #[test]
    fn test_scratch_is_reused() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = built.clone();
        let printer = Printer::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ColonSerializer::new()
        });

        let err = new("x");
        for _ in 0..5 {
            assert_eq!(printer.string(&err), "x");
        }
        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert_eq!(printer.pooled(), 1);
    }

    #[test]
    fn test_nested_rendering_uses_separate_scratch() {
        let printer = Printer::new(ColonSerializer::new);
        let inner = new("inner");
        let outer = new("outer");

        let text = printer.render(&outer, |o| {
            let nested = printer.string(&inner);
            format!("{} / {}", o, nested)
        });
        assert_eq!(text, "outer / inner");
        assert_eq!(printer.pooled(), 2);
    }

    #[test]
    fn test_scratch_returned_after_panic() {
        let printer = Printer::new(ColonSerializer::new);
        let err = new("x");

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            printer.render(&err, |_| panic!("consumer failed"))
        }));
        assert!(result.is_err());
        assert_eq!(printer.pooled(), 1);
        assert_eq!(printer.string(&err), "x");
    }

    /// Only the stack snapshots, each rendered as a marker
    struct StackMarker {
        cursor: crate::Cursor,
    }

    impl Serializer for StackMarker {
        fn init(&mut self, _chain: &Chain) {
            self.cursor.reset();
        }

        fn next<'c>(&mut self, chain: &'c Chain) -> Option<&'c Payload> {
            self.cursor.next_matching(chain, is_stack_error)
        }

        fn custom_format(&mut self, payload: &Payload, buf: &mut String) -> bool {
            if payload.is::<crate::StackError>() {
                buf.push_str("stack");
                return true;
            }
            false
        }

        fn append(&mut self, out: &mut String, rendered: &str) {
            out.push('[');
            out.push_str(rendered);
            out.push(']');
        }
    }

    #[test]
    fn test_custom_format() {
        let printer = Printer::new(|| StackMarker {
            cursor: crate::Cursor::new(),
        });
        let err = wrap(Some(new("b")), Some(new("a"))).unwrap();
        assert_eq!(printer.string(&err), "[stack]");
        assert_eq!(printer.string(&new("bare")), "");
    }

    #[test]
    fn test_concurrent_printing() {
        const THREADS: usize = 16;
        const REPS: usize = 500;

        let printer = Printer::new(ColonSerializer::new);
        let scenarios = scenarios();
        let failures = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for t in 0..THREADS {
                let printer = &printer;
                let scenarios = &scenarios;
                let failures = &failures;
                scope.spawn(move || {
                    for i in 0..REPS {
                        let (_, err, expected) = &scenarios[(t + i) % scenarios.len()];
                        if printer.string(err) != *expected || err.to_string() != *expected {
                            failures.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        assert_eq!(failures.load(Ordering::Relaxed), 0);
        assert!(printer.pooled() <= THREADS);
    }

    #[test]
    fn test_pool_is_bounded() {
        let printer = Printer::new(ColonSerializer::new);
        let err = new("x");

        fn nest(printer: &Printer, err: &Error, depth: usize) {
            if depth == 0 {
                return;
            }
            printer.render(err, |_| nest(printer, err, depth - 1));
        }

        nest(&printer, &err, MAX_POOLED + 8);
        assert_eq!(printer.pooled(), MAX_POOLED);
    }
}
