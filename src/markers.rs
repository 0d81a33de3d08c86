//! Structural markers used to classify declarations
//!
//! The analyzed framework tags components and systems through their base list.
//! Every literal the extractors match on lives here.

use crate::model::Declaration;

/// Handle type whose generic argument names a component a system reads or writes
pub const COMPONENT_TYPE_HANDLE: &str = "ComponentTypeHandle";
/// Random-access lookup type whose generic argument names a component
pub const COMPONENT_LOOKUP: &str = "ComponentLookup";
/// Handle generics that reveal a component dependency
pub const HANDLE_GENERICS: &[&str] = &[COMPONENT_TYPE_HANDLE, COMPONENT_LOOKUP];

/// Nested struct that collects a system's handle fields
pub const TYPE_HANDLE_STRUCT: &str = "TypeHandle";
/// Lifecycle method where systems acquire other systems
pub const ON_CREATE: &str = "OnCreate";
/// Call that acquires another system
pub const GET_OR_CREATE_SYSTEM: &str = "GetOrCreateSystemManaged";
/// Systems whose FQN contains this are skipped when debug skipping is on
pub const DEBUG_MARKER: &str = "Debug";

/// Base-type tag classifying a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    ComponentData,
    GameSystem,
}

impl Marker {
    pub fn name(self) -> &'static str {
        match self {
            Marker::ComponentData => "IComponentData",
            Marker::GameSystem => "GameSystemBase",
        }
    }
}

/// Reduce a base-type or type-argument text to its short name
///
/// Drops `global::`, any namespace qualification, and generic arguments:
/// `global::Unity.Entities.IComponentData` becomes `IComponentData`.
pub fn short_type_name(text: &str) -> &str {
    let text = text.trim();
    let without_generics = match text.find('<') {
        Some(idx) => &text[..idx],
        None => text,
    };
    let without_alias = without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics);
    without_alias
        .rsplit('.')
        .next()
        .unwrap_or(without_alias)
        .trim()
}

impl Declaration {
    /// Whether any base type of this declaration is the given marker
    pub fn implements(&self, marker: Marker) -> bool {
        self.base_type_names
            .iter()
            .any(|base| short_type_name(base) == marker.name())
    }
}
