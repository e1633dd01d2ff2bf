//! The Error and Payload types for errchain

use crate::chain::{Chain, Payloads};
use crate::printer;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Object-safe view over any error usable as a payload.
trait PayloadError: fmt::Display + fmt::Debug + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
    fn as_std(&self) -> &(dyn std::error::Error + Send + Sync + 'static);
}

impl<E> PayloadError for E
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_std(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }
}

/// A single non-chain error held by a chain node.
///
/// Payloads are immutable and cheap to clone. Each one remembers the concrete
/// type it was created from; that type and the rendered message are what
/// [`crate::similar`] and [`crate::contains`] compare.
#[derive(Clone)]
pub struct Payload {
    inner: Arc<dyn PayloadError>,
    type_id: TypeId,
}

impl Payload {
    pub(crate) fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(err),
            type_id: TypeId::of::<E>(),
        }
    }

    // =========================================================================
    // Type identity
    // =========================================================================

    /// The `TypeId` of the concrete error type behind this payload
    pub fn concrete_type(&self) -> TypeId {
        self.type_id
    }

    /// The errchain error held by this payload, directly or behind a
    /// `Box` or `Arc`
    fn as_error(&self) -> Option<&Error> {
        if let Some(err) = self.downcast_ref::<Error>() {
            return Some(err);
        }
        if let Some(err) = self.downcast_ref::<Box<Error>>() {
            return Some(&**err);
        }
        self.downcast_ref::<Arc<Error>>().map(|err| &**err)
    }

    /// Check if the payload is exactly of type `T`
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Borrow the payload as its concrete type
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    /// Borrow the payload as a standard error trait object
    pub fn as_std_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.inner.as_std()
    }

    /// Check if both handles point at the same error value
    pub fn ptr_eq(&self, other: &Payload) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.inner) as *const (),
            Arc::as_ptr(&other.inner) as *const (),
        )
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

/// An error handled by errchain: a bare payload or a wrapping chain.
///
/// Bare errors come from [`crate::new`] or [`Error::new`]; chains are only
/// built by [`crate::wrap`] and [`crate::wrap_with_opts`].
///
/// # Example
///
/// ```rust
/// use errchain::{new, wrap, Error};
///
/// let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
/// let err = wrap(Some(Error::new(io)), Some(new("reading config"))).unwrap();
///
/// assert!(err.is_chain());
/// assert_eq!(err.to_string(), "reading config: no such file");
/// assert!(err.find_typed::<std::io::Error>().is_some());
/// ```
#[derive(Clone)]
pub enum Error {
    /// A single error that has not been wrapped
    Bare(Payload),
    /// A wrapping chain
    Chain(Chain),
}

impl Error {
    /// Turn any standard error into an errchain error.
    ///
    /// Passing an errchain `Error`, boxed or not, returns (a copy of) that
    /// error rather than nesting it, so a payload is never a chain.
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let payload = Payload::new(err);
        match payload.as_error() {
            Some(inner) => inner.clone(),
            None => Error::Bare(payload),
        }
    }

    /// Create a bare error from an existing payload
    pub fn from_payload(payload: Payload) -> Self {
        Error::Bare(payload)
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Check if this error is a wrapping chain
    pub fn is_chain(&self) -> bool {
        matches!(self, Error::Chain(_))
    }

    /// Get the chain, if this error is one
    pub fn as_chain(&self) -> Option<&Chain> {
        match self {
            Error::Chain(chain) => Some(chain),
            Error::Bare(_) => None,
        }
    }

    /// Iterate over the payloads, head to tail. A bare error yields itself.
    pub fn payloads(&self) -> Payloads<'_> {
        Payloads::new(self.as_slice())
    }

    /// Payloads in storage order (cause first)
    pub(crate) fn as_slice(&self) -> &[Payload] {
        match self {
            Error::Bare(payload) => std::slice::from_ref(payload),
            Error::Chain(chain) => chain.as_slice(),
        }
    }
}

// =============================================================================
// Display - default printer, colon separated, stacks omitted
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        printer::default_printer().render(self, |text| f.write_str(text))
    }
}

// =============================================================================
// Debug - every payload, stacks included
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bare(payload) => fmt::Debug::fmt(payload, f),
            Error::Chain(chain) => fmt::Debug::fmt(chain, f),
        }
    }
}

impl std::error::Error for Error {}

impl From<Chain> for Error {
    fn from(chain: Chain) -> Self {
        Error::Chain(chain)
    }
}

impl From<Payload> for Error {
    fn from(payload: Payload) -> Self {
        Error::Bare(payload)
    }
}
