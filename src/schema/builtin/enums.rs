// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Variant tables for enum-typed fields.

use std::sync::Arc;

use crate::schema::EnumTable;

/// `ActorControlId::SetLockOn`, the discriminant the lock-on fix keys on.
pub const ACTOR_CONTROL_SET_LOCK_ON: u32 = 0x22;

/// Control ids shared by `ActorControl`, `ActorControlSelf` and `ActorControlTarget`.
pub fn actor_control_id() -> Arc<EnumTable> {
    Arc::new(EnumTable::new(
        "ActorControlId",
        vec![
            (0x04, "SetCombatState"),
            (0x05, "ChangeClassJob"),
            (0x06, "Death"),
            (0x0F, "CancelCast"),
            (0x11, "SetRecastGroupDuration"),
            (0x14, "AddStatus"),
            (0x15, "RemoveStatus"),
            (0x16, "SetStatusParam"),
            (0x17, "StatusEffect"),
            (0x18, "SetRestExp"),
            (0x1F, "SetCharacterState"),
            (ACTOR_CONTROL_SET_LOCK_ON, "SetLockOn"),
            (0x23, "SetChanneling"),
            (0x2F, "RemoveChanneling"),
            (0x30, "SetModelScale"),
            (0x31, "SetModelAttr"),
            (0x36, "SetTargetable"),
            (0x3E, "SetTimelineModelSkin"),
            (0x3F, "SetTimelineModelFlag"),
            (0x6D, "EventDirector"),
            (0x8C, "RejectEventFinish"),
            (0xEC, "SetMoveFlag2"),
            (0x197, "PlayActionTimeLine"),
            (0x19D, "SetActorTimeLine"),
            (0x1F9, "SetLimitBreak"),
            (0x2BC, "RejectSendAction"),
            (0x5F1, "InterruptCast"),
            (0x931, "FateState"),
            (0x934, "FateStart"),
            (0x935, "FateEnd"),
            (0x93C, "FateProgress"),
        ],
    ))
}

/// Movement flags carried by `UP_UpdatePositionInstance`.
pub fn instance_move_type() -> Arc<EnumTable> {
    Arc::new(EnumTable::new(
        "InstanceMoveType",
        vec![
            (0, "NormalMove0"),
            (0x10000, "NormalMove1"),
            (0x20000, "NormalMove2"),
            (0x30000, "NormalMove3"),
            (0x200000, "ActionMove0"),
            (1, "Fly0"),
            (0x10001, "Fly1"),
            (0x20001, "Fly2"),
            (0x30001, "Fly3"),
            (2, "WalkOrSlowSwim0"),
            (0x10002, "WalkOrSlowSwim1"),
            (0x20002, "WalkOrSlowSwim2"),
            (0x30002, "WalkOrSlowSwim3"),
            (3, "SlowFly0"),
            (0x10003, "SlowFly1"),
            (0x20003, "SlowFly2"),
            (0x30003, "SlowFly3"),
            (0x1000, "ActionMoveEnd0"),
            (0x404000, "SmallMove0"),
            (0x414000, "SmallMove1"),
            (0x424000, "SmallMove2"),
            (0x434000, "SmallMove3"),
            (0x404001, "SmallFlight0"),
            (0x414001, "SmallFlight1"),
            (0x424001, "SmallFlight2"),
            (0x434001, "SmallFlight3"),
            (0x100000, "Falling0"),
            (0x110000, "Falling1"),
            (0x120000, "Falling2"),
            (0x130000, "Falling3"),
            (0x400100, "JumpStart0"),
            (0x410100, "JumpStart1"),
            (0x420100, "JumpStart2"),
            (0x430100, "JumpStart3"),
            (0x504000, "JumpProcess0"),
            (0x514000, "JumpProcess1"),
            (0x524000, "JumpProcess2"),
            (0x534000, "JumpProcess3"),
            (0x510400, "JumpHighestPoint0"),
            (0x400200, "JumpEnd0"),
            (0x410200, "JumpEnd1"),
            (0x420200, "JumpEnd2"),
            (0x430200, "JumpEnd3"),
        ],
    ))
}

/// Movement flags carried by `UP_UpdatePositionHandler`.
pub fn handler_move_type() -> Arc<EnumTable> {
    // Four variants per state; the low nibble of the third byte selects it.
    let states: [(&str, u32); 14] = [
        ("NormalMove", 0),
        ("Fly", 1),
        ("WalkOrSlowSwim", 2),
        ("SlowFly", 3),
        ("JumpStart", 0x100),
        ("JumpStartWalk", 0x102),
        ("JumpEnd", 0x200),
        ("JumpEndWalk", 0x202),
        ("JumpProcess", 0x100000),
        ("JumpProcessWalk", 0x100002),
        ("JumpHighestPoint", 0x100400),
        ("JumpHighestPointWalk", 0x100402),
        ("ActionMove", 0x200000),
        ("ActionMoveEnd", 0x1000),
    ];

    let mut variants = Vec::with_capacity(56);
    for (state, base) in states {
        for step in 0..4u32 {
            variants.push((base + step * 0x10000, format!("{state}{step}")));
        }
    }
    Arc::new(EnumTable::new("HandlerMoveType", variants))
}

/// Chat channels carried by `UP_ChatHandler`.
pub fn chat_type() -> Arc<EnumTable> {
    Arc::new(EnumTable::new(
        "XivChatType",
        vec![
            (0, "None"),
            (1, "Debug"),
            (2, "Urgent"),
            (3, "Notice"),
            (10, "Say"),
            (11, "Shout"),
            (12, "TellOutgoing"),
            (13, "TellIncoming"),
            (14, "Party"),
            (15, "Alliance"),
            (16, "Ls1"),
            (17, "Ls2"),
            (18, "Ls3"),
            (19, "Ls4"),
            (20, "Ls5"),
            (21, "Ls6"),
            (22, "Ls7"),
            (23, "Ls8"),
            (24, "FreeCompany"),
            (27, "NoviceNetwork"),
            (28, "CustomEmote"),
            (29, "StandardEmote"),
            (30, "Yell"),
            (32, "CrossParty"),
            (36, "PvPTeam"),
            (37, "CrossLinkShell1"),
            (56, "Echo"),
            (57, "SystemMessage"),
            (58, "SystemError"),
            (59, "GatheringSystemMessage"),
            (60, "ErrorMessage"),
            (61, "NPCDialogue"),
            (68, "NPCDialogueAnnouncements"),
            (71, "RetainerSale"),
            (101, "CrossLinkShell2"),
            (102, "CrossLinkShell3"),
            (103, "CrossLinkShell4"),
            (104, "CrossLinkShell5"),
            (105, "CrossLinkShell6"),
            (106, "CrossLinkShell7"),
            (107, "CrossLinkShell8"),
        ],
    ))
}
