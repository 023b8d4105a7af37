//! Seating artifacts produced by the allocator.
//!
//! One `SlotSeatingResult` is produced independently for each (date, slot)
//! in a timetable; the allocator shares no state across slots. Within one
//! room for one slot, every non-empty section holds seats from exactly one
//! course, and a room never hosts more than three distinct courses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{SectionId, StudentId};

/// A single occupied seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatAssignment {
    /// Seat label within the section (e.g., "A1", "D12").
    pub seat_label: String,
    /// Seated student.
    pub student: StudentId,
    /// Course the student sits here.
    pub course_code: String,
    /// Course name, for roster printouts.
    pub course_name: String,
}

/// One room's filled sections for one slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomArrangement {
    /// Catalog room id.
    pub room_id: String,
    /// Room name.
    pub room_name: String,
    /// Catalog capacity.
    pub capacity: u32,
    /// Building block.
    pub block: String,
    /// Preference rank, when the room is profiled.
    pub preference: Option<u32>,
    /// Seats per section, indexed A, B, C, D.
    pub sections: [Vec<SeatAssignment>; 4],
    /// Capacity per section, indexed A, B, C, D.
    pub section_capacities: [u32; 4],
}

impl RoomArrangement {
    /// The seats in a section.
    #[inline]
    pub fn section(&self, id: SectionId) -> &[SeatAssignment] {
        &self.sections[id.index()]
    }

    /// The course seated in a section, or `None` when empty.
    pub fn section_course(&self, id: SectionId) -> Option<&str> {
        self.sections[id.index()]
            .first()
            .map(|seat| seat.course_code.as_str())
    }

    /// Distinct course codes across all four sections.
    pub fn distinct_courses(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = Vec::new();
        for id in SectionId::ALL {
            if let Some(code) = self.section_course(id) {
                if !codes.contains(&code) {
                    codes.push(code);
                }
            }
        }
        codes
    }

    /// Free seats remaining in a section.
    pub fn free_in(&self, id: SectionId) -> u32 {
        self.section_capacities[id.index()].saturating_sub(self.sections[id.index()].len() as u32)
    }

    /// Whether any section holds a seat.
    pub fn is_occupied(&self) -> bool {
        self.sections.iter().any(|s| !s.is_empty())
    }

    /// Total students seated in this room.
    pub fn students_placed(&self) -> usize {
        self.sections.iter().map(Vec::len).sum()
    }
}

/// Students the allocator could not seat, grouped by course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnassignedCourse {
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
    /// The unseated part of the roster.
    pub students: Vec<StudentId>,
}

/// Seating outcome for one (date, slot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSeatingResult {
    /// 1-based slot label ("1", "2", ...).
    pub slot_label: String,
    /// Rooms with at least one occupied section; empty rooms are dropped.
    pub arrangements: Vec<RoomArrangement>,
    /// Students actually seated in this slot.
    pub total_students: usize,
    /// Capacity across every selected room, profiled or catalog.
    pub total_capacity: u32,
    /// Seated ÷ capacity, as a percentage rounded to 2 decimals.
    pub utilization_rate: f64,
    /// Per-course unseated students.
    pub unassigned_students: Vec<UnassignedCourse>,
}

impl SlotSeatingResult {
    /// Count of unseated students across all courses.
    pub fn unassigned_count(&self) -> usize {
        self.unassigned_students.iter().map(|u| u.students.len()).sum()
    }

    /// Per-slot statistics derived from this result.
    pub fn stats(&self) -> SlotSeatingStats {
        SlotSeatingStats {
            total_students: self.total_students,
            total_capacity: self.total_capacity,
            utilization_rate: self.utilization_rate,
            rooms_used: self
                .arrangements
                .iter()
                .map(|room| RoomUsage {
                    name: room.room_name.clone(),
                    capacity: room.capacity,
                    students_placed: room.students_placed(),
                })
                .collect(),
            unassigned_count: self.unassigned_count(),
        }
    }
}

/// Summary statistics for one slot's seating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSeatingStats {
    pub total_students: usize,
    pub total_capacity: u32,
    pub utilization_rate: f64,
    pub rooms_used: Vec<RoomUsage>,
    pub unassigned_count: usize,
}

/// One room's contribution to a slot, for statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomUsage {
    pub name: String,
    pub capacity: u32,
    pub students_placed: usize,
}

/// A full seating plan: one result per (date, slot) of the timetable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatingPlan {
    /// Per date, one result per slot (index = slot index).
    pub days: BTreeMap<NaiveDate, Vec<SlotSeatingResult>>,
}

impl SeatingPlan {
    /// The seating result for a (date, slot index), if present.
    pub fn slot(&self, date: NaiveDate, slot: usize) -> Option<&SlotSeatingResult> {
        self.days.get(&date).and_then(|slots| slots.get(slot))
    }

    /// Total unseated students across the whole plan.
    pub fn total_unassigned(&self) -> usize {
        self.days
            .values()
            .flat_map(|slots| slots.iter())
            .map(SlotSeatingResult::unassigned_count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(label: &str, student: &str, course: &str) -> SeatAssignment {
        SeatAssignment {
            seat_label: label.into(),
            student: student.into(),
            course_code: course.into(),
            course_name: format!("{course} name"),
        }
    }

    fn arrangement() -> RoomArrangement {
        RoomArrangement {
            room_id: "1".into(),
            room_name: "H-101".into(),
            capacity: 60,
            block: "H".into(),
            preference: Some(1),
            sections: [
                vec![seat("A1", "s1", "CS101"), seat("A2", "s2", "CS101")],
                vec![seat("B1", "s3", "MA202")],
                vec![],
                vec![],
            ],
            section_capacities: [15, 15, 15, 15],
        }
    }

    #[test]
    fn test_section_course() {
        let room = arrangement();
        assert_eq!(room.section_course(SectionId::A), Some("CS101"));
        assert_eq!(room.section_course(SectionId::C), None);
    }

    #[test]
    fn test_distinct_courses_and_occupancy() {
        let room = arrangement();
        assert_eq!(room.distinct_courses(), vec!["CS101", "MA202"]);
        assert!(room.is_occupied());
        assert_eq!(room.students_placed(), 3);
        assert_eq!(room.free_in(SectionId::A), 13);
        assert_eq!(room.free_in(SectionId::C), 15);
    }

    #[test]
    fn test_slot_stats() {
        let result = SlotSeatingResult {
            slot_label: "1".into(),
            arrangements: vec![arrangement()],
            total_students: 3,
            total_capacity: 60,
            utilization_rate: 5.0,
            unassigned_students: vec![UnassignedCourse {
                course_code: "PH303".into(),
                course_name: "Optics".into(),
                students: vec!["s9".into(), "s10".into()],
            }],
        };

        assert_eq!(result.unassigned_count(), 2);
        let stats = result.stats();
        assert_eq!(stats.rooms_used.len(), 1);
        assert_eq!(stats.rooms_used[0].students_placed, 3);
        assert_eq!(stats.unassigned_count, 2);
    }
}
