use std::collections::VecDeque;
use std::time::Duration;

use crate::coord::VoxelCoord;

/// Wall-clock budget `process_queue` spends per frame, one simulation tick.
pub const QUEUE_BUDGET: Duration = Duration::from_micros(1_000_000 / 60);

/// One unit of postponed visibility work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Show(VoxelCoord),
    Hide(VoxelCoord),
}

/// Strict FIFO of postponed show/hide work.
///
/// Ops are never reordered or deduplicated. A later hide does not cancel an
/// earlier queued show; both drain, in order, and each re-checks the world
/// state it finds when it runs.
#[derive(Debug, Default)]
pub struct OpQueue {
    ops: VecDeque<Op>,
}

impl OpQueue {
    pub fn new() -> Self {
        Self {
            ops: VecDeque::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, op: Op) {
        self.ops.push_back(op);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Op> {
        self.ops.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
