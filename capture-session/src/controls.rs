//! Typed control assignments passed to the device on start.

use smallvec::SmallVec;

use capture_core::Rectangle;

/// Identifier of a device control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlId {
    /// Sensor sub-rectangle to read out.
    ScalerCrop,
}

/// Value assigned to a control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlValue {
    Rectangle(Rectangle),
}

/// An ordered list of control assignments. Setting an id that is already
/// present replaces its value.
#[derive(Clone, Debug, Default)]
pub struct ControlList {
    entries: SmallVec<[(ControlId, ControlValue); 4]>,
}

impl ControlList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: ControlId, value: ControlValue) {
        if let Some(entry) = self.entries.iter_mut().find(|(eid, _)| *eid == id) {
            entry.1 = value;
        } else {
            self.entries.push((id, value));
        }
    }

    pub fn get(&self, id: ControlId) -> Option<&ControlValue> {
        self.entries
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ControlId, ControlValue)> {
        self.entries.iter()
    }
}
