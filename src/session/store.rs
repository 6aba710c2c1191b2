// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Named, bounded record buffers fed from the capture queue.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use crate::capture::CaptureQueue;
use crate::core::{CodecError, PacketRecord, Result};
use crate::io::PacketFilter;

use super::{DEFAULT_DRAIN_BATCH, DEFAULT_MAX_PER_SESSION};

/// A bounded, time-ordered buffer of captured records.
#[derive(Debug, Clone)]
pub struct Session {
    id: i64,
    name: String,
    created_at: DateTime<Local>,
    records: VecDeque<PacketRecord>,
    active: bool,
}

impl Session {
    fn new(id: i64, name: String) -> Self {
        Self {
            id,
            name,
            created_at: Local::now(),
            records: VecDeque::new(),
            active: true,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Whether new records are appended here.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn records(&self) -> &VecDeque<PacketRecord> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Tab label, e.g. `Session 2 (41 packets)`.
    pub fn display_name(&self) -> String {
        format!("{} ({} packets)", self.name, self.records.len())
    }

    fn evict_to(&mut self, max: usize) -> usize {
        let excess = self.records.len().saturating_sub(max);
        self.records.drain(..excess);
        excess
    }
}

/// Outcome of one [`SessionStore::drain`] tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Records moved from the queue into the active session
    pub drained: usize,
    /// Records evicted from the front to respect the session bound
    pub evicted: usize,
    pub paused: bool,
}

/// Ordered collection of sessions, exactly one of which is active.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Vec<Session>,
    next_id: i64,
    counter: usize,
    max_per_session: usize,
    drain_batch: usize,
    paused: bool,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a store holding one active session named `Session 1`.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_PER_SESSION, DEFAULT_DRAIN_BATCH)
    }

    /// Create a store with custom bounds (each at least 1).
    pub fn with_limits(max_per_session: usize, drain_batch: usize) -> Self {
        let mut store = Self {
            sessions: Vec::new(),
            next_id: 1,
            counter: 0,
            max_per_session: max_per_session.max(1),
            drain_batch: drain_batch.max(1),
            paused: false,
        };
        store.create_session_auto();
        store
    }

    /// Move up to `drain_batch` records from the queue into the active session.
    pub fn drain(&mut self, queue: &CaptureQueue) -> DrainReport {
        if self.paused {
            return DrainReport {
                paused: true,
                ..DrainReport::default()
            };
        }

        let max = self.max_per_session;
        let batch = self.drain_batch;
        let Some(session) = self.sessions.iter_mut().find(|s| s.active) else {
            return DrainReport::default();
        };

        let mut report = DrainReport::default();
        while report.drained < batch {
            let Some(mut record) = queue.pop() else {
                break;
            };
            record.stamp_session(session.id);
            session.records.push_back(record);
            report.drained += 1;
            report.evicted += session.evict_to(max);
        }
        report
    }

    /// Deactivate the current session and start a new active one.
    pub fn create_session(&mut self, name: impl Into<String>) -> i64 {
        for session in &mut self.sessions {
            session.active = false;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.counter += 1;

        let session = Session::new(id, name.into());
        debug!(id, name = %session.name, "session created");
        self.sessions.push(session);
        id
    }

    /// Like [`create_session`](Self::create_session) with a `Session {n}` name.
    pub fn create_session_auto(&mut self) -> i64 {
        let name = format!("Session {}", self.counter + 1);
        self.create_session(name)
    }

    /// Close a session and free its records.
    ///
    /// Closing the active session hands activation to the previous session,
    /// or to the next one when it is first.
    pub fn close_session(&mut self, id: i64) -> Result<()> {
        let index = self.index_of(id)?;
        if self.sessions.len() == 1 {
            return Err(CodecError::LastSession);
        }

        if self.sessions[index].active {
            let next = if index > 0 { index - 1 } else { 1 };
            self.sessions[next].active = true;
        }
        let closed = self.sessions.remove(index);
        debug!(id, records = closed.len(), "session closed");
        Ok(())
    }

    /// The session receiving new records.
    pub fn active(&self) -> &Session {
        // One session always exists and exactly one is active.
        self.sessions
            .iter()
            .find(|s| s.active)
            .unwrap_or(&self.sessions[0])
    }

    pub fn get(&self, id: i64) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Sessions in creation order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Drop every record of a session.
    pub fn clear(&mut self, id: i64) -> Result<()> {
        let session = self.session_mut(id)?;
        session.records.clear();
        Ok(())
    }

    /// Remove records by position. Returns how many were removed.
    ///
    /// All indices are checked before anything is removed.
    pub fn remove_records(&mut self, id: i64, indices: &[usize]) -> Result<usize> {
        let session = self.session_mut(id)?;
        let count = session.records.len();
        if let Some(&bad) = indices.iter().find(|&&i| i >= count) {
            return Err(CodecError::index_out_of_range(bad, count));
        }

        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for &i in sorted.iter().rev() {
            session.records.remove(i);
        }
        Ok(sorted.len())
    }

    /// Remove records by position within the filtered view of a session.
    pub fn remove_filtered(
        &mut self,
        id: i64,
        filter: &PacketFilter,
        view_indices: &[usize],
    ) -> Result<usize> {
        let positions: Vec<usize> = self
            .session(id)?
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| filter.matches(r))
            .map(|(i, _)| i)
            .collect();

        let mut resolved = Vec::with_capacity(view_indices.len());
        for &v in view_indices {
            let pos = positions
                .get(v)
                .copied()
                .ok_or_else(|| CodecError::index_out_of_range(v, positions.len()))?;
            resolved.push(pos);
        }
        self.remove_records(id, &resolved)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause or resume draining. Records stay queued while paused.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn max_per_session(&self) -> usize {
        self.max_per_session
    }

    /// Change the per-session bound, evicting the oldest records at once.
    pub fn set_max_per_session(&mut self, max: usize) {
        self.max_per_session = max.max(1);
        for session in &mut self.sessions {
            session.evict_to(self.max_per_session);
        }
    }

    pub fn drain_batch(&self) -> usize {
        self.drain_batch
    }

    pub fn set_drain_batch(&mut self, batch: usize) {
        self.drain_batch = batch.max(1);
    }

    /// Records of a session that pass the filter, in capture order.
    pub fn filtered<'a>(
        &'a self,
        id: i64,
        filter: &'a PacketFilter,
    ) -> Result<impl Iterator<Item = &'a PacketRecord> + 'a> {
        Ok(self
            .session(id)?
            .records
            .iter()
            .filter(move |r| filter.matches(r)))
    }

    fn index_of(&self, id: i64) -> Result<usize> {
        self.sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CodecError::session_not_found(id))
    }

    fn session(&self, id: i64) -> Result<&Session> {
        self.get(id).ok_or_else(|| CodecError::session_not_found(id))
    }

    fn session_mut(&mut self, id: i64) -> Result<&mut Session> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CodecError::session_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Direction;

    fn record(opcode: u16) -> PacketRecord {
        PacketRecord::new(Direction::Receive, opcode, "DOWN_Effect", Vec::new(), 0)
    }

    fn queue_of(opcodes: impl IntoIterator<Item = u16>) -> CaptureQueue {
        let queue = CaptureQueue::with_capacity(64);
        for op in opcodes {
            queue.push(record(op)).unwrap();
        }
        queue
    }

    fn opcodes(session: &Session) -> Vec<u16> {
        session.records().iter().map(|r| r.opcode()).collect()
    }

    #[test]
    fn test_new_store_has_one_active_session() {
        let store = SessionStore::new();
        assert_eq!(store.sessions().len(), 1);
        assert!(store.active().is_active());
        assert_eq!(store.active().name(), "Session 1");
    }

    #[test]
    fn test_drain_stamps_and_respects_batch() {
        let mut store = SessionStore::with_limits(100, 2);
        let queue = queue_of([1, 2, 3]);

        let report = store.drain(&queue);
        assert_eq!(report.drained, 2);
        assert_eq!(queue.len(), 1);

        let active = store.active();
        assert_eq!(opcodes(active), vec![1, 2]);
        assert!(active.records().iter().all(|r| r.session_id() == active.id()));
    }

    #[test]
    fn test_drain_evicts_oldest() {
        let mut store = SessionStore::with_limits(3, 100);
        let report = store.drain(&queue_of(1..=5));
        assert_eq!(report.drained, 5);
        assert_eq!(report.evicted, 2);
        assert_eq!(opcodes(store.active()), vec![3, 4, 5]);
    }

    #[test]
    fn test_paused_store_leaves_queue() {
        let mut store = SessionStore::new();
        let queue = queue_of([1]);
        store.set_paused(true);
        let report = store.drain(&queue);
        assert!(report.paused);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_create_session_moves_activation() {
        let mut store = SessionStore::new();
        let first = store.active().id();
        let second = store.create_session_auto();

        assert_ne!(first, second);
        assert!(!store.get(first).unwrap().is_active());
        assert_eq!(store.active().id(), second);
        assert_eq!(store.active().name(), "Session 2");

        store.drain(&queue_of([7]));
        assert!(store.get(first).unwrap().is_empty());
        assert_eq!(store.get(second).unwrap().len(), 1);
    }

    #[test]
    fn test_close_rules() {
        let mut store = SessionStore::new();
        let first = store.active().id();
        assert!(matches!(store.close_session(first), Err(CodecError::LastSession)));
        assert!(matches!(
            store.close_session(999),
            Err(CodecError::SessionNotFound { id: 999 })
        ));

        let second = store.create_session("capture B");
        let third = store.create_session("capture C");
        store.close_session(third).unwrap();
        assert_eq!(store.active().id(), second);

        store.close_session(first).unwrap();
        assert_eq!(store.sessions().len(), 1);
        assert_eq!(store.active().id(), second);
    }

    #[test]
    fn test_close_first_active_activates_next() {
        let mut store = SessionStore::new();
        let first = store.active().id();
        let second = store.create_session("b");
        store.sessions[1].active = false;
        store.sessions[0].active = true;

        store.close_session(first).unwrap();
        assert_eq!(store.active().id(), second);
        assert!(store.active().is_active());
    }

    #[test]
    fn test_set_max_evicts_immediately() {
        let mut store = SessionStore::with_limits(10, 100);
        store.drain(&queue_of(1..=6));
        store.set_max_per_session(2);
        assert_eq!(opcodes(store.active()), vec![5, 6]);
    }

    #[test]
    fn test_remove_records_and_clear() {
        let mut store = SessionStore::new();
        let id = store.active().id();
        store.drain(&queue_of(1..=5));

        assert_eq!(store.remove_records(id, &[3, 0, 3]).unwrap(), 2);
        assert_eq!(opcodes(store.active()), vec![2, 3, 5]);
        assert!(matches!(
            store.remove_records(id, &[9]),
            Err(CodecError::IndexOutOfRange { index: 9, count: 3 })
        ));

        store.clear(id).unwrap();
        assert!(store.active().is_empty());
    }

    #[test]
    fn test_filtered_view_and_removal() {
        let mut store = SessionStore::new();
        let id = store.active().id();
        let queue = CaptureQueue::with_capacity(8);
        queue.push(record(0x10)).unwrap();
        queue
            .push(PacketRecord::new(Direction::Send, 0x20, "UP_PingReq", Vec::new(), 0))
            .unwrap();
        queue.push(record(0x30)).unwrap();
        store.drain(&queue);

        let filter = PacketFilter::new().direction(Direction::Receive);
        let seen: Vec<u16> = store.filtered(id, &filter).unwrap().map(|r| r.opcode()).collect();
        assert_eq!(seen, vec![0x10, 0x30]);

        assert_eq!(store.remove_filtered(id, &filter, &[1]).unwrap(), 1);
        assert_eq!(opcodes(store.active()), vec![0x10, 0x20]);
    }
}
