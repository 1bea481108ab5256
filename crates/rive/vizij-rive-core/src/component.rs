//! Component bookkeeping shared by every node of the dependency graph.

use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};
use vizij_rive_codec::PropertyValue;

use crate::core::keys::property_key;
use crate::ids::ObjectId;

/// Bitmask of stale aspects of a component.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentDirt(pub u16);

impl ComponentDirt {
    pub const NONE: ComponentDirt = ComponentDirt(0);
    pub const COLLAPSED: ComponentDirt = ComponentDirt(1 << 0);
    pub const DEPENDENTS: ComponentDirt = ComponentDirt(1 << 1);
    /// Set on the artboard when any component needs an update.
    pub const COMPONENTS: ComponentDirt = ComponentDirt(1 << 2);
    pub const DRAW_ORDER: ComponentDirt = ComponentDirt(1 << 3);
    pub const PATH: ComponentDirt = ComponentDirt(1 << 4);
    pub const PAINT: ComponentDirt = ComponentDirt(1 << 5);
    pub const RENDER_OPACITY: ComponentDirt = ComponentDirt(1 << 6);
    pub const TRANSFORM: ComponentDirt = ComponentDirt(1 << 7);
    pub const WORLD_TRANSFORM: ComponentDirt = ComponentDirt(1 << 8);
    pub const FILTHY: ComponentDirt = ComponentDirt(0xffff);

    #[inline]
    pub fn contains(self, other: ComponentDirt) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn intersects(self, other: ComponentDirt) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn remove(&mut self, other: ComponentDirt) {
        self.0 &= !other.0;
    }
}

impl BitOr for ComponentDirt {
    type Output = ComponentDirt;
    fn bitor(self, rhs: Self) -> Self::Output {
        ComponentDirt(self.0 | rhs.0)
    }
}

impl BitOrAssign for ComponentDirt {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ComponentDirt {
    type Output = ComponentDirt;
    fn bitand(self, rhs: Self) -> Self::Output {
        ComponentDirt(self.0 & rhs.0)
    }
}

/// Serialized fields and graph state common to all components.
///
/// `parent` is a plain id; ownership stays with the artboard arena.
#[derive(Clone, Debug, Default)]
pub struct ComponentBase {
    pub name: String,
    pub parent_id: u32,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) dependents: Vec<ObjectId>,
    pub(crate) graph_order: usize,
    pub(crate) dirt: ComponentDirt,
}

impl ComponentBase {
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn dependents(&self) -> &[ObjectId] {
        &self.dependents
    }

    pub fn graph_order(&self) -> usize {
        self.graph_order
    }

    pub fn dirt(&self) -> ComponentDirt {
        self.dirt
    }

    #[inline]
    pub fn has_dirt(&self, dirt: ComponentDirt) -> bool {
        self.dirt.intersects(dirt)
    }

    pub(crate) fn add_dependent(&mut self, id: ObjectId) {
        if !self.dependents.contains(&id) {
            self.dependents.push(id);
        }
    }

    pub(crate) fn own_property(&self, key: u16) -> Option<PropertyValue> {
        match key {
            property_key::NAME => Some(PropertyValue::String(self.name.clone())),
            property_key::PARENT_ID => Some(PropertyValue::Uint(self.parent_id)),
            _ => None,
        }
    }

    pub(crate) fn set_own_property(&mut self, key: u16, value: PropertyValue) -> bool {
        match (key, value) {
            (property_key::NAME, PropertyValue::String(v)) => self.name = v,
            (property_key::PARENT_ID, PropertyValue::Uint(v)) => self.parent_id = v,
            _ => return false,
        }
        true
    }
}
