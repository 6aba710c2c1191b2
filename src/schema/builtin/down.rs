// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Server-to-client (`DOWN_`) layouts.

use std::sync::Arc;

use crate::schema::{LayoutBuilder, LayoutDescriptor, ScalarKind};

use super::enums;

/// Result slots reserved by `DOWN_EffectResult`.
pub const EFFECT_RESULT_CAPACITY: usize = 16;

/// Status slots reserved by each effect result entry.
pub const EFFECT_STATUS_CAPACITY: usize = 4;

/// Member slots reserved by `DOWN_PartyUpdate`.
pub const PARTY_CAPACITY: usize = 8;

/// Size of one 12-byte status entry in the spawn and party layouts.
const STATUS_ENTRY_SIZE: usize = 0x0C;

/// Size of one action effect entry.
const ACTION_EFFECT_SIZE: usize = 0x08;

pub fn layouts() -> Vec<LayoutDescriptor> {
    let control_id = enums::actor_control_id();
    let npc_spawn = npc_spawn();

    vec![
        LayoutDescriptor::extend(&npc_spawn, "DOWN_NpcSpawn2", 0x3F0)
            .bytes("ExpandStatus", 0x284, 30 * STATUS_ENTRY_SIZE)
            .build(),
        npc_spawn,
        effect_header("DOWN_Effect", 0x78)
            .bytes("Effects", 0x2A, 8 * ACTION_EFFECT_SIZE)
            .u64("TargetId", 0x70)
            .build(),
        aoe_effect("DOWN_AoeEffect8", 0x278, 8, 0x230),
        aoe_effect("DOWN_AoeEffect16", 0x4B8, 16, 0x430),
        aoe_effect("DOWN_AoeEffect24", 0x6F8, 24, 0x630),
        aoe_effect("DOWN_AoeEffect32", 0x938, 32, 0x830),
        LayoutDescriptor::builder("DOWN_ActorCast", 0x20)
            .u16("ActionId", 0x00)
            .u8("ActionKind", 0x02)
            .u8("DisplayDelay", 0x03)
            .u32("RealActionId", 0x04)
            .f32("CastTime", 0x08)
            .u32("TargetId", 0x0C)
            .u16("Facing", 0x10)
            .u8("CanInterrupt", 0x12)
            .array("Pos", 0x18, ScalarKind::U16, 3)
            .build(),
        LayoutDescriptor::builder("DOWN_ActorControl", 0x18)
            .enum_u16("Id", 0x00, &control_id)
            .u32("Arg0", 0x04)
            .u32("Arg1", 0x08)
            .u32("Arg2", 0x0C)
            .u32("Arg3", 0x10)
            .build(),
        LayoutDescriptor::builder("DOWN_ActorControlSelf", 0x20)
            .enum_u16("Id", 0x00, &control_id)
            .u32("Arg0", 0x04)
            .u32("Arg1", 0x08)
            .u32("Arg2", 0x0C)
            .u32("Arg3", 0x10)
            .u32("Arg4", 0x14)
            .u32("Arg5", 0x18)
            .build(),
        LayoutDescriptor::builder("DOWN_ActorControlTarget", 0x20)
            .enum_u16("Id", 0x00, &control_id)
            .u32("Arg0", 0x04)
            .u32("Arg1", 0x08)
            .u32("Arg2", 0x0C)
            .u32("Arg3", 0x10)
            .u64("TargetId", 0x18)
            .build(),
        LayoutDescriptor::builder("DOWN_ActorDelete", 0x08)
            .u8("Index", 0x00)
            .u32("ActorId", 0x04)
            .build(),
        LayoutDescriptor::builder("DOWN_ActorGauge", 0x10)
            .bytes("Buffer", 0x00, 16)
            .build(),
        LayoutDescriptor::builder("DOWN_UpdateHpMpGp", 0x08)
            .u32("Hp", 0x00)
            .u16("Mp", 0x04)
            .u16("Gp", 0x06)
            .build(),
        effect_result(),
        LayoutDescriptor::builder("DOWN_MapEffect", 0x10)
            .u32("DirectorId", 0x00)
            .u16("State", 0x04)
            .u16("PlayState", 0x06)
            .u8("Index", 0x08)
            .build(),
        LayoutDescriptor::builder("DOWN_PlayerSpawn", 0x278)
            .u16("TitleId", 0x00)
            .u16("PlayingActionTimelineId", 0x02)
            .u16("WorldId", 0x04)
            .u16("HomeWorldId", 0x06)
            .u8("GmLevel", 0x08)
            .u8("GrandCompany", 0x09)
            .u8("GrandCompanyLevel", 0x0A)
            .u8("OnlineStatus", 0x0B)
            .u8("PoseEmote", 0x0C)
            .build(),
        LayoutDescriptor::builder("DOWN_ObjectSpawn", 0x40)
            .u8("Index", 0x00)
            .u8("Kind", 0x01)
            .u8("Flag", 0x02)
            .u8("InvisibilityGroup", 0x03)
            .u32("BaseId", 0x04)
            .u32("Id", 0x08)
            .u32("LayoutId", 0x0C)
            .u32("ContentId", 0x10)
            .u32("OwnerId", 0x14)
            .u32("BindLayoutId", 0x18)
            .f32("Scale", 0x1C)
            .u16("SharedGroupTimelineState", 0x20)
            .u16("Facing", 0x22)
            .u16("Fate", 0x24)
            .u8("PermissionInvisibility", 0x26)
            .u8("Arg1", 0x27)
            .u32("Arg2", 0x28)
            .u32("Arg3", 0x2C)
            .vec3("Pos", 0x30)
            .build(),
        LayoutDescriptor::builder("DOWN_ActorMove", 0x0C)
            .u16("Facing", 0x00)
            .u16("Flag", 0x02)
            .u8("Speed", 0x04)
            .array("Pos", 0x06, ScalarKind::U16, 3)
            .build(),
        LayoutDescriptor::builder("DOWN_ActorSetPos", 0x18)
            .u16("Facing", 0x00)
            .u8("Type", 0x02)
            .u8("TypeArg", 0x03)
            .u32("LayerId", 0x04)
            .vec3("Pos", 0x08)
            .build(),
        LayoutDescriptor::builder("DOWN_EventStart", 0x18)
            .u64("TargetCommonId", 0x00)
            .u32("HandlerId", 0x08)
            .u8("Type", 0x0C)
            .u8("Flags", 0x0D)
            .u32("Arg", 0x10)
            .build(),
        LayoutDescriptor::builder("DOWN_EventFinish", 0x10)
            .u32("HandlerId", 0x00)
            .u8("Type", 0x04)
            .u8("Res", 0x05)
            .u32("Arg", 0x08)
            .build(),
        LayoutDescriptor::builder("DOWN_NpcYell", 0x20)
            .u64("ActorId", 0x00)
            .u32("NameId", 0x08)
            .u16("NpcYellId", 0x0C)
            .array("Args", 0x10, ScalarKind::I32, 4)
            .build(),
        party_update(),
        LayoutDescriptor::builder("DOWN_StartActionTimelineMulti", 0x40)
            .array("Ids", 0x00, ScalarKind::U32, 10)
            .array("TimelineIds", 0x28, ScalarKind::U16, 10)
            .build(),
    ]
}

fn npc_spawn() -> LayoutDescriptor {
    LayoutDescriptor::builder("DOWN_NpcSpawn", 0x290)
        .u64("MainTarget", 0x10)
        .u32("DataID", 0x40)
        .u32("OwnerID", 0x44)
        .u32("FlagOrState", 0x54)
        .u32("CurrentHp", 0x5C)
        .u32("MaxHp", 0x60)
        .f32("Rotation", 0x72)
        .u8("ModelScale", 0x7F)
        .u8("ObjectKind", 0x81)
        .u8("ObjectType", 0x82)
        .u8("BattalionType", 0x85)
        .u8("Level", 0x86)
        .f32("PosX", 0x200)
        .f32("PosY", 0x204)
        .f32("PosZ", 0x208)
        .bytes("NameBytes", 0x242, 32)
        .build()
}

/// Header shared by the single-target and area effect layouts.
fn effect_header(name: &str, total_size: u32) -> LayoutBuilder {
    LayoutDescriptor::builder(name, total_size)
        .u32("MainTargetId", 0x00)
        .u32("RealActionId", 0x08)
        .u32("ResponseId", 0x0C)
        .f32("LockTime", 0x10)
        .u32("BallistaTargetId", 0x14)
        .u16("RequestId", 0x18)
        .u16("Facing", 0x1A)
        .u16("ActionId", 0x1C)
        .u8("ActionVariant", 0x1E)
        .u8("ActionKind", 0x1F)
        .u8("Flag", 0x20)
        .u8("TargetCount", 0x21)
}

/// Area effect with `targets` slots of eight effect entries each.
fn aoe_effect(name: &str, total_size: u32, targets: usize, target_ids_at: u32) -> LayoutDescriptor {
    effect_header(name, total_size)
        .bytes("Effects", 0x2A, targets * 8 * ACTION_EFFECT_SIZE)
        .array("TargetIds", target_ids_at, ScalarKind::U64, targets)
        .array("Pos", target_ids_at + (targets as u32) * 8, ScalarKind::U16, 3)
        .build()
}

fn effect_result() -> LayoutDescriptor {
    let status = Arc::new(
        LayoutDescriptor::builder("EffectResultStatus", 0x10)
            .u8("StatusSlot", 0x00)
            .u16("StatusId", 0x02)
            .i16("Param", 0x04)
            .f32("Time", 0x08)
            .u32("SourceId", 0x0C)
            .build(),
    );
    let entry = Arc::new(
        LayoutDescriptor::builder("EffectResultEntry", 0x58)
            .u32("ResponseId", 0x00)
            .u32("TargetId", 0x04)
            .u32("CurrentHp", 0x08)
            .u32("MaxHp", 0x0C)
            .u16("CurrentMp", 0x10)
            .u8("ClassJob", 0x13)
            .u8("Shield", 0x14)
            .u8("StatusCount", 0x15)
            .records("Status", 0x18, "StatusCount", EFFECT_STATUS_CAPACITY, &status)
            .build(),
    );

    LayoutDescriptor::builder("DOWN_EffectResult", 0x584)
        .u8("Count", 0x00)
        .records("Results", 0x04, "Count", EFFECT_RESULT_CAPACITY, &entry)
        .build()
}

fn party_update() -> LayoutDescriptor {
    let member = Arc::new(
        LayoutDescriptor::builder("PartyMember", 0x1C0)
            .bytes("NameBytes", 0x00, 32)
            .u64("AccountId", 0x20)
            .u64("CharacterId", 0x28)
            .u32("ActorId", 0x30)
            .u32("PetId", 0x34)
            .u32("BuddyId", 0x38)
            .u32("CurrentHp", 0x3C)
            .u32("MaxHp", 0x40)
            .u16("CurrentMp", 0x44)
            .u16("MaxMp", 0x46)
            .u16("HomeWorldId", 0x48)
            .u16("TerritoryId", 0x4A)
            .u8("Flag", 0x4C)
            .u8("ClassJob", 0x4D)
            .u8("Sex", 0x4E)
            .u8("Level", 0x4F)
            .u8("LevelSync", 0x50)
            .u8("PlatformType", 0x51)
            .bytes("Status", 0x54, 30 * STATUS_ENTRY_SIZE)
            .build(),
    );

    // The member count trails the member array on the wire, so the trailer is
    // declared first to be decoded before the array that depends on it.
    LayoutDescriptor::builder("DOWN_PartyUpdate", 0xE18)
        .u64("PartyId", 0xE00)
        .u64("ChatChannel", 0xE08)
        .u8("LeaderIndex", 0xE10)
        .u8("PartyCount", 0xE11)
        .records("Members", 0x00, "PartyCount", PARTY_CAPACITY, &member)
        .build()
}
