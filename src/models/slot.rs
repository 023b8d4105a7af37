//! Exam slot and calendar models.
//!
//! A slot is a (day index, slot index) pair within the exam window. An
//! unscheduled course carries no slot at all — candidate solutions store
//! `Option<ExamSlot>`, so "exactly one slot or none" holds by construction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A specific exam time window: day index and slot index within the day.
///
/// Both indices are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExamSlot {
    /// Zero-based day index into the calendar's date list.
    pub day: usize,
    /// Zero-based slot index within the day.
    pub slot: usize,
}

impl ExamSlot {
    /// Creates a slot key.
    pub fn new(day: usize, slot: usize) -> Self {
        Self { day, slot }
    }
}

/// The exam window: the ordered list of exam dates and the number of
/// slots per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamCalendar {
    /// Exam days, in chronological order.
    pub dates: Vec<NaiveDate>,
    /// Slots per day (e.g., 2 for end-semester, 4 for mid-semester).
    pub slots_per_day: usize,
}

impl ExamCalendar {
    /// Creates a calendar from exam dates and a slots-per-day count.
    pub fn new(dates: Vec<NaiveDate>, slots_per_day: usize) -> Self {
        Self {
            dates,
            slots_per_day,
        }
    }

    /// Number of exam days.
    #[inline]
    pub fn num_days(&self) -> usize {
        self.dates.len()
    }

    /// Total number of slots in the window.
    #[inline]
    pub fn num_positions(&self) -> usize {
        self.num_days() * self.slots_per_day
    }

    /// Whether a slot key falls inside the calendar.
    pub fn contains(&self, slot: ExamSlot) -> bool {
        slot.day < self.num_days() && slot.slot < self.slots_per_day
    }

    /// The date of a given day index, if in range.
    pub fn date(&self, day: usize) -> Option<NaiveDate> {
        self.dates.get(day).copied()
    }

    /// Human-facing slot label: 1-based ("1", "2", ...).
    pub fn slot_label(slot: usize) -> String {
        (slot + 1).to_string()
    }
}
