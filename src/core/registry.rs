// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Layout registry: opcode name to layout descriptor.
//!
//! Registration happens once at init time through [`LayoutRegistryBuilder`];
//! the built registry is immutable and meant to be shared behind an `Arc`.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::schema::LayoutDescriptor;

/// Source of layouts keyed by opcode name.
///
/// This is the seam the capture pipeline and inspector depend on, so tests can
/// supply a small hand-built catalogue.
pub trait LayoutSource: Send + Sync {
    /// Look up a layout by exact opcode name.
    fn layout(&self, name: &str) -> Option<&LayoutDescriptor>;

    /// Payload size registered for an opcode name.
    fn payload_size(&self, name: &str) -> Option<u32> {
        self.layout(name).map(|l| l.total_size())
    }
}

/// Immutable catalogue of layouts.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: HashMap<String, Arc<LayoutDescriptor>>,
}

impl LayoutRegistry {
    /// Start registering layouts.
    pub fn builder() -> LayoutRegistryBuilder {
        LayoutRegistryBuilder::default()
    }

    /// Process-wide catalogue of the built-in layouts.
    pub fn builtin() -> &'static Arc<LayoutRegistry> {
        static BUILTIN: OnceLock<Arc<LayoutRegistry>> = OnceLock::new();
        BUILTIN.get_or_init(|| Arc::new(crate::schema::builtin::register_all(Self::builder()).build()))
    }

    /// Exact-name lookup.
    pub fn lookup(&self, name: &str) -> Option<&LayoutDescriptor> {
        self.layouts.get(name).map(|l| l.as_ref())
    }

    /// Shared handle to a layout.
    pub fn get_arc(&self, name: &str) -> Option<Arc<LayoutDescriptor>> {
        self.layouts.get(name).cloned()
    }

    /// Check if a layout is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.layouts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over layouts in name order.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutDescriptor> {
        self.names()
            .into_iter()
            .filter_map(move |name| self.lookup(name))
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

impl LayoutSource for LayoutRegistry {
    fn layout(&self, name: &str) -> Option<&LayoutDescriptor> {
        self.lookup(name)
    }
}

/// Builder for [`LayoutRegistry`].
#[derive(Debug, Default)]
pub struct LayoutRegistryBuilder {
    layouts: HashMap<String, Arc<LayoutDescriptor>>,
}

impl LayoutRegistryBuilder {
    /// Register a layout under its own name.
    ///
    /// A later registration with the same name replaces the earlier one.
    pub fn register(mut self, layout: LayoutDescriptor) -> Self {
        self.layouts.insert(layout.name().to_string(), Arc::new(layout));
        self
    }

    /// Register an already shared layout.
    pub fn register_arc(mut self, layout: Arc<LayoutDescriptor>) -> Self {
        self.layouts.insert(layout.name().to_string(), layout);
        self
    }

    pub fn build(self) -> LayoutRegistry {
        debug!(layouts = self.layouts.len(), "layout registry built");
        LayoutRegistry {
            layouts: self.layouts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_exact_name() {
        let registry = LayoutRegistry::builder()
            .register(LayoutDescriptor::builder("DOWN_Test", 0x18).u32("A", 0).build())
            .build();

        assert!(registry.lookup("DOWN_Test").is_some());
        assert!(registry.lookup("down_test").is_none());
        assert_eq!(registry.payload_size("DOWN_Test"), Some(0x18));
        assert_eq!(registry.payload_size("DOWN_Missing"), None);
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = LayoutRegistry::builder()
            .register(LayoutDescriptor::builder("UP_X", 0x10).build())
            .register(LayoutDescriptor::builder("UP_X", 0x20).build())
            .build();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("UP_X").map(|l| l.total_size()), Some(0x20));
    }

    #[test]
    fn test_names_sorted() {
        let registry = LayoutRegistry::builder()
            .register(LayoutDescriptor::builder("UP_B", 1).build())
            .register(LayoutDescriptor::builder("DOWN_A", 1).build())
            .build();
        assert_eq!(registry.names(), vec!["DOWN_A", "UP_B"]);
        assert_eq!(registry.iter().count(), 2);
    }

    #[test]
    fn test_builtin_is_shared() {
        let a = LayoutRegistry::builtin();
        let b = LayoutRegistry::builtin();
        assert!(Arc::ptr_eq(a, b));
        assert!(a.contains("DOWN_ActorControl"));
        assert!(a.contains("UP_ChatHandler"));
    }
}
