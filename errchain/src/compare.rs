//! Comparing chains while ignoring stack snapshots

use crate::error::{Error, Payload};
use crate::stack::is_not_stack_error;
use std::any::TypeId;

/// Two payloads are equal when they share concrete type and message
fn equal(a: &Payload, b: &Payload) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    a.concrete_type() == b.concrete_type() && a.to_string() == b.to_string()
}

/// A payload rendered once, matched against many
struct Needle<'a> {
    payload: &'a Payload,
    type_id: TypeId,
    message: String,
}

impl<'a> Needle<'a> {
    fn new(payload: &'a Payload) -> Self {
        Self {
            payload,
            type_id: payload.concrete_type(),
            message: payload.to_string(),
        }
    }

    fn matches(&self, other: &Payload) -> bool {
        self.payload.ptr_eq(other)
            || (other.concrete_type() == self.type_id && other.to_string() == self.message)
    }
}

/// Payloads that take part in comparisons, head to tail
fn meaningful(err: &Error) -> impl Iterator<Item = &Payload> {
    err.payloads().filter(|payload| is_not_stack_error(payload))
}

impl Error {
    /// Check if both errors hold the same payloads, stacks aside.
    ///
    /// Payloads are compared pairwise, in order, by concrete type and message.
    /// A bare error counts as a one-payload chain.
    pub fn similar(&self, other: &Error) -> bool {
        let mut left = meaningful(self);
        let mut right = meaningful(other);

        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if equal(a, b) => continue,
                _ => return false,
            }
        }
    }

    /// Check if every payload of `other` appears in this error, in the same
    /// order, stacks aside. Gaps are allowed.
    ///
    /// Each payload of `other` is searched for after the position where the
    /// previous one matched.
    pub fn contains(&self, other: &Error) -> bool {
        let mut haystack = meaningful(self);
        meaningful(other).all(|payload| {
            let needle = Needle::new(payload);
            haystack.any(|candidate| needle.matches(candidate))
        })
    }
}

/// Check if two possibly absent errors are logically identical.
///
/// A replacement for strict equality, which stack snapshots would defeat.
/// Two absent errors are similar; an absent and a present one are not.
pub fn similar(a: Option<&Error>, b: Option<&Error>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.similar(b),
        _ => false,
    }
}

/// Check if `b` is logically contained within `a`.
///
/// An absent `b` is contained in anything; an absent `a` contains only an
/// absent `b`.
pub fn contains(a: Option<&Error>, b: Option<&Error>) -> bool {
    match (a, b) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(a), Some(b)) => a.contains(b),
    }
}
