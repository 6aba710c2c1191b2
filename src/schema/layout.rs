// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Layout descriptors: data-only tables describing one opcode's payload.
//!
//! Offsets are relative to the start of the payload (after the packet
//! header). Nothing here is checked against any buffer; the decoder does all
//! bounds checking at read time.

use std::sync::Arc;

use serde::Serialize;

/// Primitive scalar kinds, all little-endian on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScalarKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl ScalarKind {
    /// Width in bytes.
    pub fn width(&self) -> usize {
        match self {
            ScalarKind::U8 | ScalarKind::I8 => 1,
            ScalarKind::U16 | ScalarKind::I16 => 2,
            ScalarKind::U32 | ScalarKind::I32 | ScalarKind::F32 => 4,
            ScalarKind::U64 | ScalarKind::I64 | ScalarKind::F64 => 8,
        }
    }

    /// Type name as shown to users.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        }
    }

    /// Check if this is a floating-point kind.
    pub fn is_float(&self) -> bool {
        matches!(self, ScalarKind::F32 | ScalarKind::F64)
    }
}

/// Named variants of an enum-typed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumTable {
    name: String,
    variants: Vec<(u32, String)>,
}

impl EnumTable {
    /// Build a table from `(value, name)` pairs.
    pub fn new<N: Into<String>>(name: impl Into<String>, variants: Vec<(u32, N)>) -> Self {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(|(v, n)| (v, n.into())).collect(),
        }
    }

    /// Enum type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variant name for a raw value.
    pub fn variant_name(&self, value: u32) -> Option<&str> {
        self.variants
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, n)| n.as_str())
    }

    /// Raw value for a variant name (case-insensitive).
    pub fn value_of(&self, name: &str) -> Option<u32> {
        self.variants
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(v, _)| *v)
    }

    /// Iterate over `(value, name)` pairs.
    pub fn variants(&self) -> impl Iterator<Item = (u32, &str)> {
        self.variants.iter().map(|(v, n)| (*v, n.as_str()))
    }
}

/// Binary shape of one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldKind {
    Scalar(ScalarKind),
    /// Raw byte run of fixed length
    FixedBytes(usize),
    /// Inline array of `len` scalars
    FixedArray { element: ScalarKind, len: usize },
    /// `u16` resolved against a variant table
    EnumU16(Arc<EnumTable>),
    /// `u32` resolved against a variant table
    EnumU32(Arc<EnumTable>),
    /// `u32` array whose length is read from an earlier sibling field
    DynamicU32Array { count_field: String, max_count: usize },
    /// Fixed-size records whose count is read from an earlier sibling field
    NestedRecordArray {
        count_field: String,
        record_size: usize,
        /// Slots reserved by the layout; the runtime count is clamped to this
        capacity: usize,
        record: Arc<LayoutDescriptor>,
    },
}

impl FieldKind {
    /// Statically known width in bytes (the reserved width for count-gated kinds).
    pub fn static_width(&self) -> usize {
        match self {
            FieldKind::Scalar(s) => s.width(),
            FieldKind::FixedBytes(n) => *n,
            FieldKind::FixedArray { element, len } => element.width().saturating_mul(*len),
            FieldKind::EnumU16(_) => 2,
            FieldKind::EnumU32(_) => 4,
            FieldKind::DynamicU32Array { max_count, .. } => max_count.saturating_mul(4),
            FieldKind::NestedRecordArray {
                record_size,
                capacity,
                ..
            } => record_size.saturating_mul(*capacity),
        }
    }

    /// Type name as shown to users.
    pub fn type_label(&self) -> String {
        match self {
            FieldKind::Scalar(s) => s.as_str().to_string(),
            FieldKind::FixedBytes(n) => format!("u8[{n}]"),
            FieldKind::FixedArray { element, len } => format!("{}[{len}]", element.as_str()),
            FieldKind::EnumU16(t) => format!("{}:u16", t.name()),
            FieldKind::EnumU32(t) => format!("{}:u32", t.name()),
            FieldKind::DynamicU32Array {
                count_field,
                max_count,
            } => format!("u32[{count_field} <= {max_count}]"),
            FieldKind::NestedRecordArray {
                count_field,
                capacity,
                record,
                ..
            } => format!("{}[{count_field} <= {capacity}]", record.name()),
        }
    }

    /// Name of the sibling field holding this field's runtime count, if any.
    pub fn count_field(&self) -> Option<&str> {
        match self {
            FieldKind::DynamicU32Array { count_field, .. }
            | FieldKind::NestedRecordArray { count_field, .. } => Some(count_field),
            _ => None,
        }
    }
}

/// One named field at a fixed payload offset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub offset: u32,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, offset: u32, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            offset,
            kind,
        }
    }

    /// Check if a byte field should also be rendered as text.
    pub fn is_name_like(&self) -> bool {
        let lower = self.name.to_ascii_lowercase();
        lower.contains("name") || lower.contains("utf8") || lower.contains("string")
    }
}

/// One opcode's binary shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutDescriptor {
    name: String,
    total_size: u32,
    fields: Vec<FieldDescriptor>,
}

impl LayoutDescriptor {
    /// Start building a layout.
    pub fn builder(name: impl Into<String>, total_size: u32) -> LayoutBuilder {
        LayoutBuilder {
            layout: LayoutDescriptor {
                name: name.into(),
                total_size,
                fields: Vec::new(),
            },
        }
    }

    /// Start a layout that duplicates every field of `parent`.
    ///
    /// Extension fields are expected at offsets past the parent's fields.
    pub fn extend(parent: &LayoutDescriptor, name: impl Into<String>, total_size: u32) -> LayoutBuilder {
        LayoutBuilder {
            layout: LayoutDescriptor {
                name: name.into(),
                total_size,
                fields: parent.fields.clone(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the number of fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Fluent builder for [`LayoutDescriptor`].
#[derive(Debug, Clone)]
pub struct LayoutBuilder {
    layout: LayoutDescriptor,
}

impl LayoutBuilder {
    /// Add a field of any kind.
    pub fn field(mut self, name: &str, offset: u32, kind: FieldKind) -> Self {
        self.layout.fields.push(FieldDescriptor::new(name, offset, kind));
        self
    }

    pub fn u8(self, name: &str, offset: u32) -> Self {
        self.field(name, offset, FieldKind::Scalar(ScalarKind::U8))
    }

    pub fn u16(self, name: &str, offset: u32) -> Self {
        self.field(name, offset, FieldKind::Scalar(ScalarKind::U16))
    }

    pub fn u32(self, name: &str, offset: u32) -> Self {
        self.field(name, offset, FieldKind::Scalar(ScalarKind::U32))
    }

    pub fn u64(self, name: &str, offset: u32) -> Self {
        self.field(name, offset, FieldKind::Scalar(ScalarKind::U64))
    }

    pub fn i16(self, name: &str, offset: u32) -> Self {
        self.field(name, offset, FieldKind::Scalar(ScalarKind::I16))
    }

    pub fn i32(self, name: &str, offset: u32) -> Self {
        self.field(name, offset, FieldKind::Scalar(ScalarKind::I32))
    }

    pub fn i64(self, name: &str, offset: u32) -> Self {
        self.field(name, offset, FieldKind::Scalar(ScalarKind::I64))
    }

    pub fn f32(self, name: &str, offset: u32) -> Self {
        self.field(name, offset, FieldKind::Scalar(ScalarKind::F32))
    }

    pub fn f64(self, name: &str, offset: u32) -> Self {
        self.field(name, offset, FieldKind::Scalar(ScalarKind::F64))
    }

    pub fn bytes(self, name: &str, offset: u32, len: usize) -> Self {
        self.field(name, offset, FieldKind::FixedBytes(len))
    }

    pub fn array(self, name: &str, offset: u32, element: ScalarKind, len: usize) -> Self {
        self.field(name, offset, FieldKind::FixedArray { element, len })
    }

    /// Three consecutive `f32`s (x, y, z).
    pub fn vec3(self, name: &str, offset: u32) -> Self {
        self.array(name, offset, ScalarKind::F32, 3)
    }

    pub fn enum_u16(self, name: &str, offset: u32, table: &Arc<EnumTable>) -> Self {
        self.field(name, offset, FieldKind::EnumU16(Arc::clone(table)))
    }

    pub fn enum_u32(self, name: &str, offset: u32, table: &Arc<EnumTable>) -> Self {
        self.field(name, offset, FieldKind::EnumU32(Arc::clone(table)))
    }

    pub fn dynamic_u32(self, name: &str, offset: u32, count_field: &str, max_count: usize) -> Self {
        self.field(
            name,
            offset,
            FieldKind::DynamicU32Array {
                count_field: count_field.to_string(),
                max_count,
            },
        )
    }

    pub fn records(
        self,
        name: &str,
        offset: u32,
        count_field: &str,
        capacity: usize,
        record: &Arc<LayoutDescriptor>,
    ) -> Self {
        self.field(
            name,
            offset,
            FieldKind::NestedRecordArray {
                count_field: count_field.to_string(),
                record_size: record.total_size() as usize,
                capacity,
                record: Arc::clone(record),
            },
        )
    }

    pub fn build(self) -> LayoutDescriptor {
        self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_declaration_order() {
        let layout = LayoutDescriptor::builder("DOWN_UpdateHpMpGp", 0x08)
            .u32("Hp", 0x00)
            .u16("Mp", 0x04)
            .u16("Gp", 0x06)
            .build();

        assert_eq!(layout.name(), "DOWN_UpdateHpMpGp");
        assert_eq!(layout.total_size(), 8);
        let names: Vec<&str> = layout.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Hp", "Mp", "Gp"]);
        assert_eq!(layout.field("Mp").map(|f| f.offset), Some(4));
    }

    #[test]
    fn test_extend_duplicates_parent_fields() {
        let parent = LayoutDescriptor::builder("P", 0x10).u32("A", 0).u32("B", 4).build();
        let child = LayoutDescriptor::extend(&parent, "C", 0x20).u32("Ext", 0x10).build();

        assert_eq!(child.field_count(), 3);
        assert_eq!(child.field("A"), parent.field("A"));
        assert_eq!(child.total_size(), 0x20);
    }

    #[test]
    fn test_enum_table_lookup() {
        let table = EnumTable::new("Kind", vec![(1, "One"), (0x22, "SetLockOn")]);
        assert_eq!(table.variant_name(0x22), Some("SetLockOn"));
        assert_eq!(table.variant_name(3), None);
        assert_eq!(table.value_of("setlockon"), Some(0x22));
    }

    #[test]
    fn test_static_width_and_labels() {
        let record = Arc::new(LayoutDescriptor::builder("Entry", 0x10).build());
        let kind = FieldKind::NestedRecordArray {
            count_field: "Count".into(),
            record_size: 0x10,
            capacity: 4,
            record,
        };
        assert_eq!(kind.static_width(), 0x40);
        assert_eq!(kind.type_label(), "Entry[Count <= 4]");
        assert_eq!(kind.count_field(), Some("Count"));
        assert_eq!(
            FieldKind::FixedArray {
                element: ScalarKind::F32,
                len: 3
            }
            .type_label(),
            "f32[3]"
        );
    }

    #[test]
    fn test_name_like_fields() {
        assert!(FieldDescriptor::new("NameBytes", 0, FieldKind::FixedBytes(32)).is_name_like());
        assert!(FieldDescriptor::new("Utf8string", 0, FieldKind::FixedBytes(8)).is_name_like());
        assert!(!FieldDescriptor::new("Buffer", 0, FieldKind::FixedBytes(16)).is_name_like());
    }
}
