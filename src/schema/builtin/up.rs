// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Client-to-server (`UP_`) layouts.

use crate::schema::LayoutDescriptor;

use super::enums;

/// Upper bound on `arg_cnt` for the event handler layouts.
pub const EVENT_ARGS_MAX: usize = 255;

/// Length of the chat message buffer in `UP_ChatHandler`.
pub const CHAT_MESSAGE_LEN: usize = 1046;

pub fn layouts() -> Vec<LayoutDescriptor> {
    let instance_move = enums::instance_move_type();
    let handler_move = enums::handler_move_type();
    let chat_type = enums::chat_type();

    vec![
        LayoutDescriptor::builder("UP_ClientTrigger", 0x20)
            .u32("Flag", 0x0)
            .u32("arg0", 0x4)
            .u32("arg1", 0x8)
            .u32("arg2", 0xC)
            .u32("arg3", 0x10)
            .build(),
        LayoutDescriptor::builder("UP_UpdatePositionInstance", 0x30)
            .f32("Rotation", 0x0)
            .f32("RotationNew", 0x4)
            .enum_u32("flag", 0x8, &instance_move)
            .vec3("Position", 0xC)
            .vec3("PositionNew", 0x18)
            .build(),
        LayoutDescriptor::builder("UP_UpdatePositionHandler", 0x28)
            .f32("Rotation", 0x0)
            .enum_u32("Flag", 0x4, &handler_move)
            .vec3("Position", 0x8)
            .build(),
        LayoutDescriptor::builder("UP_EventStart", 0x10)
            .u64("GameObjectID", 0x0)
            .u32("EventID", 0x8)
            .build(),
        // Wire size is 0x10 + arg_cnt * 4; the registered size is the fixed part.
        LayoutDescriptor::builder("UP_EventFinish", 0x10)
            .u32("handler_id", 0x0)
            .u16("scene_id", 0x4)
            .u8("error", 0x6)
            .u8("arg_cnt", 0x7)
            .dynamic_u32("args", 0x8, "arg_cnt", EVENT_ARGS_MAX)
            .build(),
        LayoutDescriptor::builder("UP_EventAction", 0x10)
            .u32("handler_id", 0x0)
            .u16("scene_id", 0x4)
            .u8("res", 0x6)
            .u8("arg_cnt", 0x7)
            .dynamic_u32("args", 0x8, "arg_cnt", EVENT_ARGS_MAX)
            .build(),
        LayoutDescriptor::builder("UP_PingReq", 0x18)
            .u32("time_ms", 0x0)
            .build(),
        LayoutDescriptor::builder("UP_ActionSend", 0x20)
            .u8("cast_buff", 0x0)
            .u8("action_kind", 0x1)
            .u32("action_id", 0x4)
            .u16("request_id", 0x8)
            .u16("facing", 0xA)
            .u16("target_facing", 0xC)
            .u64("target_id", 0x10)
            .u32("arg", 0x18)
            .build(),
        LayoutDescriptor::builder("UP_ActionSendPos", 0x20)
            .u8("cast_buff", 0x0)
            .u8("action_kind", 0x1)
            .u32("action_id", 0x4)
            .u16("request_id", 0x8)
            .u16("facing", 0xA)
            .u16("target_facing", 0xC)
            .f32("pos_x", 0x10)
            .f32("pos_y", 0x14)
            .f32("pos_z", 0x18)
            .build(),
        LayoutDescriptor::builder("UP_InventoryModifyHandler", 0x30)
            .u32("context_id", 0x0)
            .u32("operation_type", 0x4)
            .u32("src_entity", 0x8)
            .u32("src_storage_id", 0xC)
            .i16("src_container_index", 0x10)
            .u32("src_cnt", 0x14)
            .u32("src_item_id", 0x18)
            .u32("dst_entity", 0x1C)
            .u32("dst_storage_id", 0x20)
            .i16("dst_container_index", 0x24)
            .u32("dst_cnt", 0x28)
            .u32("dst_item_id", 0x2C)
            .build(),
        LayoutDescriptor::builder("UP_DiveStart", 0x30)
            .f32("Rotation", 0x0)
            .vec3("Position", 0x4)
            .build(),
        LayoutDescriptor::builder("UP_ChatHandler", 1072)
            .i32("a1", 0)
            .u32("EntityID", 4)
            .vec3("position", 8)
            .f32("rotation", 20)
            .enum_u16("xivChatType", 24, &chat_type)
            .bytes("Utf8string", 26, CHAT_MESSAGE_LEN)
            .build(),
    ]
}
