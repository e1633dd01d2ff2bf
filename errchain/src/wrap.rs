//! Building and merging chains

use crate::chain::Chain;
use crate::config;
use crate::error::{Error, Payload};
use crate::stack::{StackError, StackOpts};

/// Frames between the stack capture and the caller of `wrap`:
/// `frame_wrap`, `wrap_inner` and `wrap` itself.
const WRAP_FRAMES: u8 = 3;

/// Frames between the stack capture and the caller of `Error::wrap` or
/// `wrap_with_opts`: `frame_wrap` and the entry point itself.
const DIRECT_FRAMES: u8 = 2;

/// Wrap `payload` around `base`, producing a chain.
///
/// The intended use is:
///
/// ```rust
/// # use errchain::{new, wrap, Error};
/// fn read() -> Result<(), Error> {
///     Err(new("permission denied"))
/// }
///
/// fn load() -> Option<Error> {
///     if let Err(err) = read() {
///         return wrap(Some(err), Some(new("loading settings")));
///     }
///     None
/// }
///
/// assert_eq!(load().unwrap().to_string(), "loading settings: permission denied");
/// ```
///
/// For a new error, call `wrap(None, Some(cause))`.
///
/// When neither input is already a chain, a stack snapshot is added at the
/// head using the process [`config`]; the stack starts at the caller of `wrap`.
/// Wrapping a chain with `None` returns it untouched. Passing `None` twice
/// returns `None`, which callers should avoid.
///
/// `payload` should not be a chain itself. It is handled, its nodes ending up
/// in front of `base`'s, but costs an extra merge.
#[inline(never)]
pub fn wrap(base: Option<Error>, payload: Option<Error>) -> Option<Error> {
    wrap_inner(base, payload)
}

impl Error {
    /// Wrap `payload` around this error; the method form of [`wrap`].
    ///
    /// ```rust
    /// use errchain::new;
    ///
    /// let err = new("connection reset").wrap(new("fetching index"));
    /// assert_eq!(err.to_string(), "fetching index: connection reset");
    /// ```
    #[inline(never)]
    pub fn wrap(self, payload: Error) -> Error {
        if self.is_chain() || payload.is_chain() {
            return Error::Chain(merge(self, payload));
        }
        let opts = config::current().stack;
        Error::Chain(frame_wrap(merge(self, payload), opts, DIRECT_FRAMES))
    }
}

#[inline(never)]
fn wrap_inner(base: Option<Error>, payload: Option<Error>) -> Option<Error> {
    let opts = config::current().stack;

    match (base, payload) {
        (None, None) => {
            tracing::debug!("wrap called without a base or a payload");
            None
        }
        (Some(Error::Chain(chain)), None) => Some(Error::Chain(chain)),
        (Some(Error::Bare(payload)), None) | (None, Some(Error::Bare(payload))) => Some(
            Error::Chain(frame_wrap(Chain::single(payload), opts, WRAP_FRAMES)),
        ),
        (None, Some(Error::Chain(chain))) => {
            tracing::debug!(len = chain.len(), "wrap called with a chain as payload");
            Some(Error::Chain(chain))
        }
        (Some(base), Some(payload)) => {
            if base.is_chain() || payload.is_chain() {
                // A stack was recorded when the existing chain was built.
                return Some(Error::Chain(merge(base, payload)));
            }
            Some(Error::Chain(frame_wrap(merge(base, payload), opts, WRAP_FRAMES)))
        }
    }
}

/// Like [`wrap`], but always adds a stack with the given options, even when
/// the inputs are already chains.
///
/// Use it when an error changes thread or task and a second stack is wanted,
/// or with `opts.depth == 0` to wrap without any stack. Passing `None` twice
/// still returns `None`.
#[inline(never)]
pub fn wrap_with_opts(
    base: Option<Error>,
    payload: Option<Error>,
    opts: StackOpts,
) -> Option<Error> {
    let chain = match (base, payload) {
        (None, None) => {
            tracing::debug!("wrap_with_opts called without a base or a payload");
            return None;
        }
        (Some(err), None) | (None, Some(err)) => into_chain(err),
        (Some(base), Some(payload)) => merge(base, payload),
    };

    Some(Error::Chain(frame_wrap(chain, opts, DIRECT_FRAMES)))
}

fn into_chain(err: Error) -> Chain {
    match err {
        Error::Chain(chain) => chain,
        Error::Bare(payload) => Chain::single(payload),
    }
}

/// Payload's nodes on top of base's nodes, both in their original order
fn merge(base: Error, payload: Error) -> Chain {
    let mut out = into_chain(base);
    match payload {
        Error::Bare(payload) => out.push(payload),
        Error::Chain(upper) => {
            tracing::debug!(len = upper.len(), "merging a chain passed as payload");
            out.extend_head(upper);
        }
    }
    out
}

/// Push a stack snapshot as the new head unless `opts.depth` is zero.
/// `frames` is how many library frames sit above this one.
#[inline(never)]
fn frame_wrap(mut chain: Chain, opts: StackOpts, frames: u8) -> Chain {
    if opts.depth == 0 {
        return chain;
    }

    let opts = opts.with_skip(opts.skip.saturating_add(frames));
    chain.push(Payload::new(StackError::capture(opts)));
    chain
}
