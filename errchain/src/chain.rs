//! # Wrapping chain
//!
//! An ordered list of payloads. The head is the most recently added payload,
//! the tail is the cause. Storage is a plain vector with the cause at the
//! bottom and the head on top, so wrapping pushes and merging extends.

use crate::error::Payload;
use std::fmt;
use std::iter::{FusedIterator, Rev};
use std::slice;

/// A wrapping chain of payload errors. Never empty.
#[derive(Clone)]
pub struct Chain {
    /// Bottom (index 0) is the cause, top is the head
    nodes: Vec<Payload>,
}

impl Chain {
    /// Create a single node chain
    pub(crate) fn single(payload: Payload) -> Self {
        let mut nodes = Vec::with_capacity(4);
        nodes.push(payload);
        Chain { nodes }
    }

    /// Push a new head
    pub(crate) fn push(&mut self, payload: Payload) {
        self.nodes.push(payload);
    }

    /// Place every node of `upper` in front of this chain, keeping their order
    pub(crate) fn extend_head(&mut self, upper: Chain) {
        self.nodes.extend(upper.nodes);
    }

    pub(crate) fn as_slice(&self) -> &[Payload] {
        &self.nodes
    }

    /// Number of nodes, stack snapshots included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a chain holds at least one payload
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The most recently added payload
    pub fn head(&self) -> &Payload {
        &self.nodes[self.nodes.len() - 1]
    }

    /// The payload that originated the chain
    pub fn cause(&self) -> &Payload {
        &self.nodes[0]
    }

    /// Get the payload at a position counted from the head (0 = head)
    pub fn get(&self, position: usize) -> Option<&Payload> {
        let idx = self.nodes.len().checked_sub(position)?.checked_sub(1)?;
        self.nodes.get(idx)
    }

    /// Iterate over payloads, head to tail
    pub fn iter(&self) -> Payloads<'_> {
        Payloads::new(&self.nodes)
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Payload;
    type IntoIter = Payloads<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Head to tail iterator over payloads
#[derive(Clone)]
pub struct Payloads<'a> {
    inner: Rev<slice::Iter<'a, Payload>>,
}

impl<'a> Payloads<'a> {
    pub(crate) fn new(nodes: &'a [Payload]) -> Self {
        Self {
            inner: nodes.iter().rev(),
        }
    }
}

impl<'a> Iterator for Payloads<'a> {
    type Item = &'a Payload;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Payloads<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Payloads<'_> {}

impl FusedIterator for Payloads<'_> {}
