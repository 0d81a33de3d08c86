// Backlink Maps
//
// Reverse edges of the dependency graph. Built in one single-threaded pass over
// the discovered systems after discovery has finished; read-only afterwards.

use crate::model::FoundSystem;
use serde::Serialize;
use std::collections::BTreeMap;

/// component FQN -> systems holding a handle to it;
/// system FQN -> systems that acquire it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BacklinkMaps {
    pub components: BTreeMap<String, Vec<String>>,
    pub systems: BTreeMap<String, Vec<String>>,
}

impl BacklinkMaps {
    /// Reduce a list of systems into both maps, in system order
    pub fn from_systems(systems: &[FoundSystem]) -> Self {
        let mut maps = BacklinkMaps::default();
        for system in systems {
            maps.record(system);
        }
        maps
    }

    /// Append one reverse edge per forward reference of `system`
    pub fn record(&mut self, system: &FoundSystem) {
        for component in &system.component_types {
            self.components
                .entry(component.clone())
                .or_default()
                .push(system.name.clone());
        }
        for used in &system.uses_system {
            self.systems
                .entry(used.clone())
                .or_default()
                .push(system.name.clone());
        }
    }

    /// Systems referencing a component; empty when none do
    pub fn component_users(&self, component: &str) -> &[String] {
        self.components
            .get(component)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Systems acquiring a system; empty when none do
    pub fn system_users(&self, system: &str) -> &[String] {
        self.systems.get(system).map(Vec::as_slice).unwrap_or(&[])
    }
}
