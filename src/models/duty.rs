//! Duty roster artifact produced by the rosterer.
//!
//! Assignments are keyed (date, slot, room id). Duty counts accumulate
//! across the whole run; the per-slot exclusivity (one room per person
//! per slot) is enforced during rostering, not here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Invigilator;

/// The invigilators covering one room in one slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDuty {
    /// Room name, for printouts.
    pub room_name: String,
    /// Assigned invigilators, in assignment order.
    pub invigilators: Vec<Invigilator>,
}

/// All room duties for one slot of a day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotDuty {
    /// 1-based slot label.
    pub slot_label: String,
    /// Duties keyed by room id.
    pub rooms: BTreeMap<String, RoomDuty>,
}

/// Duty totals split by category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DutySummary {
    pub faculty: BTreeMap<String, u32>,
    pub staff: BTreeMap<String, u32>,
}

/// A complete invigilation roster for one seating plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyRoster {
    /// Per date, one entry per slot that had active rooms.
    pub days: BTreeMap<NaiveDate, Vec<SlotDuty>>,
    /// Total duties per invigilator name.
    pub duty_count: BTreeMap<String, u32>,
    /// Duty totals split faculty/staff.
    pub duty_summary: DutySummary,
    /// Relaxation and understaffing warnings, in emission order.
    pub warnings: Vec<String>,
}

impl DutyRoster {
    /// Duties assigned to a person across the run.
    pub fn duties_for(&self, name: &str) -> u32 {
        self.duty_count.get(name).copied().unwrap_or(0)
    }

    /// Every invigilator name appearing in a given (date, slot label).
    pub fn names_in_slot(&self, date: NaiveDate, slot_label: &str) -> Vec<&str> {
        let mut names = Vec::new();
        if let Some(slots) = self.days.get(&date) {
            for slot in slots.iter().filter(|s| s.slot_label == slot_label) {
                for duty in slot.rooms.values() {
                    names.extend(duty.invigilators.iter().map(|i| i.name.as_str()));
                }
            }
        }
        names
    }
}
