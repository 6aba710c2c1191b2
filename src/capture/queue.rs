// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bounded lock-free hand-off between the capture and consumer contexts.
//!
//! Backed by `crossbeam_queue::ArrayQueue`: producers never block, and a push
//! onto a full queue hands the record back so the caller can drop it.

use std::sync::Arc;

use crossbeam_queue::ArrayQueue;

use crate::core::PacketRecord;

use super::MAX_QUEUE_SIZE;

/// Shared capture queue. Cloning shares the same underlying queue.
///
/// # Example
///
/// ```
/// use pktcodec::capture::CaptureQueue;
/// use pktcodec::core::{Direction, PacketRecord};
///
/// let queue = CaptureQueue::with_capacity(1);
/// let record = PacketRecord::new(Direction::Send, 1, "UP_PingReq", vec![0; 4], 4);
/// assert!(queue.push(record.clone()).is_ok());
/// assert!(queue.push(record).is_err());
/// assert!(queue.pop().is_some());
/// ```
#[derive(Clone, Debug)]
pub struct CaptureQueue {
    inner: Arc<ArrayQueue<PacketRecord>>,
}

impl CaptureQueue {
    /// Create a queue holding up to [`MAX_QUEUE_SIZE`] records.
    pub fn new() -> Self {
        Self::with_capacity(MAX_QUEUE_SIZE)
    }

    /// Create a queue with a custom bound (at least one slot).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(ArrayQueue::new(capacity.max(1))),
        }
    }

    /// Enqueue without blocking; a full queue returns the record.
    #[inline]
    pub fn push(&self, record: PacketRecord) -> Result<(), PacketRecord> {
        self.inner.push(record)
    }

    /// Dequeue the oldest record.
    #[inline]
    pub fn pop(&self) -> Option<PacketRecord> {
        self.inner.pop()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }
}

impl Default for CaptureQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Direction;

    fn record(opcode: u16) -> PacketRecord {
        PacketRecord::new(Direction::Receive, opcode, "DOWN_X", Vec::new(), 0)
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(CaptureQueue::new().capacity(), MAX_QUEUE_SIZE);
    }

    #[test]
    fn test_fifo_order() {
        let queue = CaptureQueue::with_capacity(4);
        for op in 1..=3 {
            queue.push(record(op)).unwrap();
        }
        let ops: Vec<u16> = std::iter::from_fn(|| queue.pop()).map(|r| r.opcode()).collect();
        assert_eq!(ops, vec![1, 2, 3]);
    }

    #[test]
    fn test_full_queue_rejects_newest() {
        let queue = CaptureQueue::with_capacity(2);
        queue.push(record(1)).unwrap();
        queue.push(record(2)).unwrap();
        let rejected = queue.push(record(3)).unwrap_err();
        assert_eq!(rejected.opcode(), 3);
        assert!(queue.is_full());
        assert_eq!(queue.pop().map(|r| r.opcode()), Some(1));
    }

    #[test]
    fn test_clones_share_storage() {
        let producer = CaptureQueue::with_capacity(2);
        let consumer = producer.clone();
        producer.push(record(9)).unwrap();
        assert_eq!(consumer.len(), 1);
    }
}
