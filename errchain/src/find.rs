//! Searching chains

use crate::chain::Chain;
use crate::error::{Error, Payload};

impl Chain {
    /// Position (from the head) of the first payload passing `predicate`
    pub fn position<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&Payload) -> bool,
    {
        self.iter().position(|payload| predicate(payload))
    }
}

impl Error {
    /// First payload, head to tail, for which `predicate` holds.
    ///
    /// The predicate only ever sees payloads, never chains. A bare error is
    /// tested directly. For exact type matches use [`Error::find_typed`].
    pub fn find<P>(&self, mut predicate: P) -> Option<&Payload>
    where
        P: FnMut(&Payload) -> bool,
    {
        self.payloads().find(|payload| predicate(payload))
    }

    /// First payload whose concrete type is exactly `T`.
    ///
    /// This is a type match, not a trait match; use [`Error::find`] with a
    /// predicate for anything else. `find_typed::<Error>()` never matches, as
    /// payloads are never chains.
    ///
    /// ```rust
    /// use errchain::{new, wrap, Error};
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// #[error("bar-{0}")]
    /// struct BarError(String);
    ///
    /// let err = wrap(Some(Error::new(BarError("abc".into()))), Some(new("foo"))).unwrap();
    /// assert_eq!(err.find_typed::<BarError>().map(|b| b.0.as_str()), Some("abc"));
    /// ```
    pub fn find_typed<T: 'static>(&self) -> Option<&T> {
        self.payloads().find_map(|payload| payload.downcast_ref::<T>())
    }

    /// The causal payload: the tail of a chain, or the bare error itself
    pub fn cause(&self) -> &Payload {
        match self {
            Error::Bare(payload) => payload,
            Error::Chain(chain) => chain.cause(),
        }
    }
}

/// [`Error::find`] over a possibly absent error; `None` yields `None`
pub fn find<P>(err: Option<&Error>, predicate: P) -> Option<&Payload>
where
    P: FnMut(&Payload) -> bool,
{
    err?.find(predicate)
}

/// [`Error::find_typed`] over a possibly absent error; `None` yields `None`
pub fn find_typed<T: 'static>(err: Option<&Error>) -> Option<&T> {
    err?.find_typed::<T>()
}

/// [`Error::cause`] over a possibly absent error; `None` yields `None`
pub fn cause(err: Option<&Error>) -> Option<&Payload> {
    err.map(Error::cause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::{is_not_stack_error, is_stack_error, StackError, StackOpts};
    use crate::{new, wrap, wrap_with_opts, Message};

    #[derive(Debug, thiserror::Error)]
    #[error("foo")]
    struct FooError;

    #[derive(Debug, thiserror::Error)]
    #[error("value")]
    struct ValueError;

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    struct PtrError(String);

    fn no_stack(base: Option<Error>, payload: Error) -> Error {
        wrap_with_opts(base, Some(payload), StackOpts::none()).unwrap()
    }

    fn text(payload: Option<&Payload>) -> Option<String> {
        payload.map(|p| p.to_string())
    }

    #[test]
    fn test_find_nil() {
        let out = find(None, |_| panic!("not to be called"));
        assert!(out.is_none());
    }

    #[test]
    fn test_find_non_wrapped() {
        let err = new("msg");
        assert_eq!(text(err.find(|_| true)), Some("msg".into()));
        assert!(err.find(|_| false).is_none());
    }

    #[test]
    fn test_find_basic_wrapped() {
        let err = no_stack(None, new("msg"));
        assert_eq!(text(err.find(|_| true)), Some("msg".into()));
        assert!(err.find(|_| false).is_none());
    }

    #[test]
    fn test_find_skipping_stack() {
        let err = wrap(Some(new("msg")), Some(new("wrapper"))).unwrap();
        assert_eq!(text(err.find(is_not_stack_error)), Some("wrapper".into()));
        assert!(err.find(|_| true).is_some_and(is_stack_error));
    }

    #[test]
    fn test_find_by_type_predicate() {
        let err = no_stack(Some(Error::new(FooError)), new("wrapper"));
        assert_eq!(text(err.find(|_| true)), Some("wrapper".into()));
        assert!(err.find(|_| false).is_none());
        assert_eq!(text(err.find(|p| p.is::<FooError>())), Some("foo".into()));
        assert_eq!(text(err.find(|p| !p.is::<FooError>())), Some("wrapper".into()));
    }

    #[test]
    fn test_find_foo_wrapping() {
        let err = no_stack(Some(no_stack(None, new("msg"))), Error::new(FooError));
        assert_eq!(text(err.find(|_| true)), Some("foo".into()));
        assert!(err.find(|_| false).is_none());
        assert_eq!(text(err.find(|p| !p.is::<FooError>())), Some("msg".into()));
    }

    #[test]
    fn test_find_predicate_sees_only_payloads() {
        let err = wrap(Some(new("a")), Some(new("b"))).unwrap();
        let mut seen = 0;
        assert!(err
            .find(|p| {
                seen += 1;
                assert!(p.downcast_ref::<Error>().is_none());
                false
            })
            .is_none());
        assert_eq!(seen, 3);
    }

    #[test]
    fn test_find_typed_nil_argument() {
        assert!(find_typed::<Message>(None).is_none());
    }

    #[test]
    fn test_find_typed_sentinel() {
        let err = new("msg");
        assert_eq!(err.find_typed::<Message>().map(Message::as_str), Some("msg"));
        assert!(err.find_typed::<ValueError>().is_none());
    }

    #[test]
    fn test_find_typed_wrapped() {
        let err = wrap(Some(new("msg")), Some(new("wrap"))).unwrap();
        assert_eq!(err.find_typed::<Message>().map(Message::as_str), Some("wrap"));

        let err = wrap(Some(new("msg")), Some(Error::new(ValueError))).unwrap();
        assert_eq!(err.find_typed::<Message>().map(Message::as_str), Some("msg"));

        let err = wrap(Some(new("msg")), Some(Error::new(PtrError(String::new())))).unwrap();
        assert!(err.find_typed::<ValueError>().is_none());
    }

    #[test]
    fn test_find_typed_needs_no_witness() {
        let err = Error::new(PtrError("foo".into()));
        assert_eq!(err.find_typed::<PtrError>().map(|e| e.0.as_str()), Some("foo"));
    }

    #[test]
    fn test_find_typed_chain_type_never_matches() {
        let err = wrap(Some(new("msg")), Some(new("wrap"))).unwrap();
        assert!(err.find_typed::<Error>().is_none());
    }

    #[test]
    fn test_find_typed_stack() {
        let err = wrap(None, Some(new("msg"))).unwrap();
        assert!(err.find_typed::<StackError>().is_some());
    }

    #[test]
    fn test_cause() {
        assert!(cause(None).is_none());
        assert_eq!(new("msg").cause().to_string(), "msg");
        assert_eq!(wrap(None, Some(new("msg"))).unwrap().cause().to_string(), "msg");
        assert_eq!(
            wrap(Some(new("msg")), Some(new("wrapper"))).unwrap().cause().to_string(),
            "msg"
        );

        let double = wrap(
            wrap(Some(new("msg")), Some(new("wrapper_1"))),
            Some(new("wrapper_2")),
        );
        assert_eq!(text(cause(double.as_ref())), Some("msg".into()));
    }

    #[test]
    fn test_chain_position() {
        let err = wrap(Some(new("msg")), Some(new("wrapper"))).unwrap();
        let chain = err.as_chain().unwrap();
        assert_eq!(chain.position(is_stack_error), Some(0));
        assert_eq!(chain.position(|p| p.to_string() == "msg"), Some(2));
        assert_eq!(chain.position(|_| false), None);
    }
}
