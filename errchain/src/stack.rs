//! # Stack snapshots
//!
//! A [`StackError`] is an ordinary payload recording the call stack at the
//! point an error was wrapped. Frames are stored as raw instruction pointers
//! and only resolved to symbols when rendered.

use crate::error::Payload;
use serde::{Deserialize, Serialize};
use std::ffi::c_void;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default number of frames captured by [`crate::wrap`]
pub const DEFAULT_DEPTH: u8 = 10;

/// Upper bound on frames walked before the capture point is located
const MAX_INTERNAL_FRAMES: usize = 32;

/// Rendering of a frame with neither symbol nor location
pub const UNKNOWN_FRAME: &str = "<unknown>";

/// How stacks are recorded when wrapping.
///
/// `depth` of zero disables stack capture. `skip` drops that many extra
/// frames above the wrapping call, for helpers that wrap on behalf of their
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct StackOpts {
    pub skip: u8,
    pub depth: u8,
    /// Marks a stack forced onto an existing chain from the same unit of work
    pub same_stack: bool,
}

impl Default for StackOpts {
    fn default() -> Self {
        Self {
            skip: 0,
            depth: DEFAULT_DEPTH,
            same_stack: false,
        }
    }
}

impl StackOpts {
    /// Options that capture no stack at all
    pub fn none() -> Self {
        Self {
            skip: 0,
            depth: 0,
            same_stack: false,
        }
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_skip(mut self, skip: u8) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_same_stack(mut self, same_stack: bool) -> Self {
        self.same_stack = same_stack;
        self
    }
}

/// A captured call stack, stored in a chain as a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackError {
    ips: Vec<usize>,
    same_stack: bool,
}

impl StackError {
    /// Capture the current stack.
    ///
    /// The first recorded frame is the first one after `opts.skip` frames
    /// above `capture`.
    #[inline(never)]
    pub(crate) fn capture(opts: StackOpts) -> Self {
        let anchor: fn(StackOpts) -> StackError = StackError::capture;
        let anchor = anchor as usize;
        let depth = usize::from(opts.depth);
        let limit = MAX_INTERNAL_FRAMES + usize::from(opts.skip) + depth;

        let mut walked: Vec<(usize, usize)> = Vec::with_capacity(limit.min(64));
        backtrace::trace(|frame| {
            walked.push((frame.ip() as usize, frame.symbol_address() as usize));
            walked.len() < limit
        });

        // Frames up to and including this function belong to the unwinder.
        let start = walked
            .iter()
            .position(|&(_, symbol)| symbol == anchor)
            .map_or(0, |idx| idx + 1);

        let ips: Vec<usize> = walked
            .iter()
            .skip(start + usize::from(opts.skip))
            .take(depth)
            .map(|&(ip, _)| ip)
            .collect();

        tracing::trace!(
            depth,
            skip = opts.skip,
            frames = ips.len(),
            anchored = start > 0,
            "captured stack snapshot"
        );

        Self {
            ips,
            same_stack: opts.same_stack,
        }
    }

    /// Build a snapshot from already captured instruction pointers
    pub fn from_ips(ips: Vec<usize>, same_stack: bool) -> Self {
        Self { ips, same_stack }
    }

    /// The raw instruction pointers, innermost first
    pub fn ips(&self) -> &[usize] {
        &self.ips
    }

    /// Whether this stack was forced onto a chain that already had one
    pub fn is_same_stack(&self) -> bool {
        self.same_stack
    }

    /// Resolve every frame to its symbol information
    pub fn frames(&self) -> Vec<Frame> {
        self.ips.iter().map(|&ip| Frame::resolve(ip)).collect()
    }
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames().iter().enumerate() {
            if i > 0 {
                f.write_str(" - ")?;
            }
            write!(f, "{}", frame)?;
        }
        Ok(())
    }
}

impl std::error::Error for StackError {}

/// A resolved stack frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Demangled function name, without the symbol hash
    pub function: Option<String>,
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
}

impl Frame {
    fn resolve(ip: usize) -> Self {
        let mut frame = Frame::default();
        backtrace::resolve(ip as *mut c_void, |symbol| {
            // Inlined frames resolve to several symbols, innermost first; keep that one.
            if frame.function.is_some() {
                return;
            }
            frame.function = symbol.name().map(|name| format!("{:#}", name));
            frame.file = symbol.filename().map(Path::to_path_buf);
            frame.line = symbol.lineno();
        });
        frame
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.function.is_none() && self.file.is_none() {
            return f.write_str(UNKNOWN_FRAME);
        }
        if let Some(function) = &self.function {
            f.write_str(function)?;
        }
        if let Some(file) = &self.file {
            if self.function.is_some() {
                f.write_str(":")?;
            }
            write!(f, "{}:{}", file.display(), self.line.unwrap_or(0))?;
        }
        Ok(())
    }
}

/// Check if the payload is a stack snapshot
pub fn is_stack_error(payload: &Payload) -> bool {
    payload.is::<StackError>()
}

/// Check if the payload is anything but a stack snapshot
pub fn is_not_stack_error(payload: &Payload) -> bool {
    !is_stack_error(payload)
}
