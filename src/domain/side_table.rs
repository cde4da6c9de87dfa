//! Side Assignment Table
//!
//! Maps device sides to activities. Side 0 always resolves to the synthetic
//! Idle activity and no activity id is ever bound to more than one side.

use crate::domain::models::{Activity, Side};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct SideTable {
    sides: BTreeMap<Side, Activity>,
}

impl SideTable {
    /// Build the table from the remote catalog, keyed by each activity's
    /// declared side. Activities without a side (or declaring 0/out of range)
    /// are left out; side 0 is reserved for Idle regardless.
    pub fn from_catalog(activities: &[Activity]) -> Self {
        let mut table = Self::default();
        for activity in activities {
            let Some(raw) = activity.device_side else {
                continue;
            };
            let side = Side::normalize(raw);
            if side.is_idle() {
                continue;
            }
            table.assign(side, activity.clone());
        }
        table
    }

    /// Resolve a side to its activity. Side 0 is always Idle.
    pub fn resolve(&self, side: Side) -> Option<Activity> {
        if side.is_idle() {
            return Some(Activity::idle());
        }
        self.sides.get(&side).cloned()
    }

    /// Bind `activity` to `side`, dropping any stale binding of the same id.
    /// Assigning side 0 only removes the activity from the table.
    pub fn assign(&mut self, side: Side, activity: Activity) {
        self.sides.retain(|_, a| a.id != activity.id);
        if side.is_idle() {
            return;
        }
        self.sides.insert(side, activity);
    }

    /// Side currently bound to `activity_id`, if any
    pub fn side_of(&self, activity_id: &str) -> Option<Side> {
        self.sides
            .iter()
            .find(|(_, a)| a.id == activity_id)
            .map(|(side, _)| *side)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, &Activity)> {
        self.sides.iter().map(|(side, a)| (*side, a))
    }

    pub fn len(&self) -> usize {
        self.sides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sides.is_empty()
    }
}
