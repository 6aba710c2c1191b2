// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decoding tests against the built-in layout catalogue.

mod common;

use common::{put_u16, put_u32, receive_frame};
use pktcodec::capture::HEADER_SIZE;
use pktcodec::core::{CodecError, DecodeError, DecodedValue, Direction, LayoutRegistry, PacketRecord};
use pktcodec::encoding::{FieldDecoder, FixOutcome, Inspection, Inspector, PacketFixEngine};
use pktcodec::schema::builtin::enums::ACTOR_CONTROL_SET_LOCK_ON;
use pktcodec::schema::builtin::down::EFFECT_RESULT_CAPACITY;

// ============================================================================
// Whole-catalogue properties
// ============================================================================

#[test]
fn test_zero_buffer_decodes_every_layout_cleanly() {
    let decoder = FieldDecoder::new();
    for layout in LayoutRegistry::builtin().iter() {
        let bytes = vec![0u8; HEADER_SIZE + layout.total_size() as usize];
        let msg = decoder.decode(layout, &bytes, HEADER_SIZE).unwrap();

        assert_eq!(msg.len(), layout.field_count(), "{}", layout.name());
        for field in msg.iter() {
            assert!(
                !field.value.is_out_of_range(),
                "{}.{} out of range on a full-size buffer",
                layout.name(),
                field.name
            );
        }
        assert!(!msg.has_errors(), "{} has soft failures", layout.name());
    }
}

#[test]
fn test_header_only_buffer_marks_fields_not_panics() {
    let decoder = FieldDecoder::new();
    for layout in LayoutRegistry::builtin().iter() {
        let bytes = vec![0u8; HEADER_SIZE];
        let msg = decoder.decode(layout, &bytes, HEADER_SIZE).unwrap();
        assert_eq!(msg.len(), layout.field_count());
    }
}

#[test]
fn test_short_buffer_only_affects_trailing_fields() {
    let layout = LayoutRegistry::builtin().lookup("DOWN_ActorControl").unwrap();
    // Enough for Id and Arg0 only.
    let bytes = vec![0u8; HEADER_SIZE + 0x08];
    let msg = FieldDecoder::new().decode(layout, &bytes, HEADER_SIZE).unwrap();

    assert!(!msg.get("Id").unwrap().is_error());
    assert_eq!(msg.get("Arg0"), Some(&DecodedValue::U32(0)));
    for name in ["Arg1", "Arg2", "Arg3"] {
        assert!(msg.get(name).unwrap().is_out_of_range(), "{name}");
    }
}

// ============================================================================
// Specific layouts
// ============================================================================

#[test]
fn test_actor_control_enum_names() {
    let layout = LayoutRegistry::builtin().lookup("DOWN_ActorControl").unwrap();
    let mut bytes = vec![0u8; HEADER_SIZE + layout.total_size() as usize];
    put_u16(&mut bytes, 0, ACTOR_CONTROL_SET_LOCK_ON as u16);
    let msg = FieldDecoder::new().decode(layout, &bytes, HEADER_SIZE).unwrap();
    assert!(matches!(
        msg.get("Id"),
        Some(DecodedValue::Enum { value, .. }) if *value == ACTOR_CONTROL_SET_LOCK_ON
    ));

    put_u16(&mut bytes, 0, 0xFFFE);
    let msg = FieldDecoder::new().decode(layout, &bytes, HEADER_SIZE).unwrap();
    assert_eq!(
        msg.get("Id"),
        Some(&DecodedValue::Enum {
            name: "Unknown(0xFFFE)".into(),
            value: 0xFFFE
        })
    );
}

#[test]
fn test_effect_result_nested_records() {
    let layout = LayoutRegistry::builtin().lookup("DOWN_EffectResult").unwrap();
    let mut bytes = vec![0u8; HEADER_SIZE + layout.total_size() as usize];
    bytes[HEADER_SIZE] = 2;
    // Second entry: TargetId and one status.
    let entry1 = 0x04 + 0x58;
    put_u32(&mut bytes, entry1 + 0x04, 0x1000_0042);
    bytes[HEADER_SIZE + entry1 + 0x15] = 1;
    put_u16(&mut bytes, entry1 + 0x18 + 0x02, 0x0325);

    let msg = FieldDecoder::new().decode(layout, &bytes, HEADER_SIZE).unwrap();
    let results = msg.get("Results").and_then(DecodedValue::as_records).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results.offset(), 0x04);

    let second = results.get(1).unwrap();
    assert_eq!(second.get("TargetId"), Some(&DecodedValue::U32(0x1000_0042)));
    let status = second.get("Status").and_then(DecodedValue::as_records).unwrap();
    assert_eq!(status.len(), 1);
    assert_eq!(status.get(0).unwrap().get("StatusId"), Some(&DecodedValue::U16(0x0325)));

    assert_eq!(results.raw(1).unwrap().len(), 0x58);
    assert!(matches!(
        results.get(2),
        Err(CodecError::IndexOutOfRange { index: 2, count: 2 })
    ));
}

#[test]
fn test_effect_result_count_clamped() {
    let layout = LayoutRegistry::builtin().lookup("DOWN_EffectResult").unwrap();
    let mut bytes = vec![0u8; HEADER_SIZE + layout.total_size() as usize];
    bytes[HEADER_SIZE] = 0xFF;
    let msg = FieldDecoder::new().decode(layout, &bytes, HEADER_SIZE).unwrap();
    let results = msg.get("Results").and_then(DecodedValue::as_records).unwrap();
    assert_eq!(results.len(), EFFECT_RESULT_CAPACITY);
}

#[test]
fn test_event_args_dynamic_array() {
    let layout = LayoutRegistry::builtin().lookup("UP_EventFinish").unwrap();
    let arg_cnt = layout.field("arg_cnt").unwrap().offset as usize;
    let mut bytes = vec![0u8; HEADER_SIZE + 0x40];

    let msg = FieldDecoder::new().decode(layout, &bytes, HEADER_SIZE).unwrap();
    assert_eq!(msg.get("args"), Some(&DecodedValue::EmptyArray));

    bytes[HEADER_SIZE + arg_cnt] = 2;
    put_u32(&mut bytes, 0x08, 7);
    put_u32(&mut bytes, 0x0C, 9);
    let msg = FieldDecoder::new().decode(layout, &bytes, HEADER_SIZE).unwrap();
    assert_eq!(msg.get("args"), Some(&DecodedValue::U32Array(vec![7, 9])));

    // Count past the captured bytes.
    bytes[HEADER_SIZE + arg_cnt] = 200;
    let msg = FieldDecoder::new().decode(layout, &bytes, HEADER_SIZE).unwrap();
    assert!(matches!(
        msg.get("args"),
        Some(DecodedValue::Error(DecodeError::InsufficientData { .. }))
    ));
}

// ============================================================================
// Packet fixes through inspection
// ============================================================================

fn actor_control_record(id: u16, arg0: u32) -> PacketRecord {
    let mut frame = receive_frame(0x0123, HEADER_SIZE + 0x18);
    put_u16(&mut frame, 0, id);
    put_u32(&mut frame, 4, arg0);
    PacketRecord::new(Direction::Receive, 0x0123, "DOWN_ActorControl", frame, 0x38)
}

#[test]
fn test_fix_round_trip_on_lock_on() {
    let inspector = Inspector::builtin();
    let record = actor_control_record(ACTOR_CONTROL_SET_LOCK_ON as u16, 5);
    let Inspection::Decoded { fields, fix, .. } = inspector.inspect(&record, 0x1000_0000).unwrap() else {
        panic!("expected decoded inspection");
    };
    assert_eq!(fix, FixOutcome::Applied);
    assert_eq!(fields.get("Arg0"), Some(&DecodedValue::U32(0x1000_0005)));
}

#[test]
fn test_fix_ignores_other_discriminants() {
    let inspector = Inspector::builtin();
    let record = actor_control_record(0x01, 5);
    let Inspection::Decoded { fields, fix, .. } = inspector.inspect(&record, 0x1000_0000).unwrap() else {
        panic!("expected decoded inspection");
    };
    assert_eq!(fix, FixOutcome::NotApplicable);
    assert_eq!(fields.get("Arg0"), Some(&DecodedValue::U32(5)));
}

#[test]
fn test_fix_raw_matches_decoded_fix() {
    let layout = LayoutRegistry::builtin().lookup("DOWN_Effect").unwrap();
    let mut bytes = vec![0u8; HEADER_SIZE + layout.total_size() as usize];
    put_u32(&mut bytes, 0x08, 0x1D0C);

    let engine = PacketFixEngine::builtin();
    let outcome = engine
        .apply_fix_raw("DOWN_Effect", 0x100, layout, &mut bytes, HEADER_SIZE)
        .unwrap();
    assert_eq!(outcome, FixOutcome::Applied);

    let msg = FieldDecoder::new().decode(layout, &bytes, HEADER_SIZE).unwrap();
    assert_eq!(msg.get("RealActionId"), Some(&DecodedValue::U32(0x1E0C)));
}
