// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Session store tests fed through the real capture pipeline.

mod common;

use common::{builtin_pipeline, receive_frame, send_frame};
use pktcodec::core::{CodecError, Direction};
use pktcodec::io::{OpcodeFilter, PacketFilter};
use pktcodec::session::SessionStore;
use pktcodec::PktConfig;

#[test]
fn test_drain_preserves_capture_order() {
    let pipeline = builtin_pipeline(64);
    for opcode in [0x0123u16, 0x0200, 0x0300] {
        pipeline.on_receive(&receive_frame(opcode, 0x40), 0, true);
    }
    pipeline.on_send(&send_frame(0x0042, 0x20, 0x40), 0, true);

    let mut store = SessionStore::new();
    let report = store.drain(pipeline.queue());
    assert_eq!(report.drained, 4);

    let names: Vec<&str> = store.active().records().iter().map(|r| r.opcode_name()).collect();
    assert_eq!(
        names,
        vec!["DOWN_ActorControl", "DOWN_Effect", "DOWN_EffectResult", "UP_ActionSend"]
    );
}

#[test]
fn test_eviction_keeps_newest_in_order() {
    let pipeline = builtin_pipeline(64);
    for opcode in 1..=10u16 {
        pipeline.on_receive(&receive_frame(opcode, 0x40), 0, true);
    }

    let mut store = SessionStore::with_limits(4, 3);
    let mut evicted = 0;
    while !pipeline.queue().is_empty() {
        let report = store.drain(pipeline.queue());
        assert!(report.drained <= 3);
        evicted += report.evicted;
    }

    let opcodes: Vec<u16> = store.active().records().iter().map(|r| r.opcode()).collect();
    assert_eq!(opcodes, vec![7, 8, 9, 10]);
    assert_eq!(evicted, 6);
}

#[test]
fn test_records_go_to_the_session_active_at_drain_time() {
    let pipeline = builtin_pipeline(64);
    let mut store = SessionStore::new();
    let first = store.active().id();

    pipeline.on_receive(&receive_frame(0x0123, 0x40), 0, true);
    store.drain(pipeline.queue());

    let second = store.create_session_auto();
    pipeline.on_receive(&receive_frame(0x0200, 0x40), 0, true);
    store.drain(pipeline.queue());

    let a = store.get(first).unwrap();
    let b = store.get(second).unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert!(a.records().iter().all(|r| r.session_id() == first));
    assert!(b.records().iter().all(|r| r.session_id() == second));
    assert_eq!(b.display_name(), "Session 2 (1 packets)");
}

#[test]
fn test_last_session_cannot_be_closed() {
    let mut store = SessionStore::new();
    let only = store.active().id();
    assert!(matches!(store.close_session(only), Err(CodecError::LastSession)));
    assert_eq!(store.sessions().len(), 1);
}

#[test]
fn test_filtered_view() {
    let pipeline = builtin_pipeline(64);
    pipeline.on_receive(&receive_frame(0x0123, 0x40), 0, true);
    pipeline.on_receive(&receive_frame(0x0BAD, 0x40), 0, true);
    pipeline.on_send(&send_frame(0x0042, 0x20, 0x40), 0, true);

    let mut store = SessionStore::new();
    store.drain(pipeline.queue());
    let id = store.active().id();

    let count = |filter: &PacketFilter| store.filtered(id, filter).unwrap().count();
    assert_eq!(count(&PacketFilter::new()), 3);
    assert_eq!(count(&PacketFilter::new().only_known(true)), 2);
    assert_eq!(count(&PacketFilter::new().direction(Direction::Send)), 1);
    assert_eq!(count(&PacketFilter::new().with_text("0bad")), 1);
    assert_eq!(count(&PacketFilter::new().with_text("actor")), 1);
    assert_eq!(
        count(&PacketFilter::new().with_names(OpcodeFilter::regex_exclude("^DOWN_").unwrap())),
        2
    );
}

#[test]
fn test_config_sizes_store() {
    let cfg: PktConfig = pktcodec::config::load_from_str("max_packets_per_session = 2").unwrap();
    let pipeline = builtin_pipeline(64);
    for _ in 0..5 {
        pipeline.on_receive(&receive_frame(0x0123, 0x40), 0, true);
    }
    let mut store = cfg.session_store();
    store.drain(pipeline.queue());
    assert_eq!(store.active().len(), 2);
}
