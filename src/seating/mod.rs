//! Greedy seating allocation.
//!
//! Seats each slot of a timetable independently, largest course first,
//! into sectioned rooms. Sections A–C fill in the first pass; section D
//! is a backup that only opens in the second pass. Within one slot:
//!
//! - a non-empty section holds students of exactly one course
//! - a room hosts at most three distinct courses
//! - a course occupies at most one of A–C per room
//! - D never opens beside an A or C section of the same course
//!
//! Students who fit nowhere are reported per course, never dropped
//! silently.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::PipelineError;
use crate::models::{
    ExamCalendar, Room, RoomArrangement, RoomProfileTable, ScheduledExam, SeatAssignment,
    SeatingPlan, SectionId, SlotSeatingResult, Timetable, UnassignedCourse,
};
use crate::validation::validate_seating_input;

/// Allocates seating for every (date, slot) of a timetable.
///
/// Only rooms whose ids appear in `selected_room_ids` are used. Rooms
/// fill in preference-rank order (unranked rooms last, names break ties).
pub fn allocate_seating(
    timetable: &Timetable,
    rooms: &[Room],
    selected_room_ids: &[String],
    profiles: &RoomProfileTable,
) -> Result<SeatingPlan, PipelineError> {
    validate_seating_input(rooms, selected_room_ids).map_err(PipelineError::invalid_input)?;

    let mut selected: Vec<&Room> = rooms
        .iter()
        .filter(|room| selected_room_ids.contains(&room.id))
        .collect();
    selected.sort_by(|a, b| {
        match (
            profiles.preference_rank(&a.name),
            profiles.preference_rank(&b.name),
        ) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.name.cmp(&b.name)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        }
    });

    let mut days = BTreeMap::new();
    for (date, slots) in &timetable.days {
        let results = slots
            .iter()
            .enumerate()
            .map(|(idx, exams)| allocate_slot(ExamCalendar::slot_label(idx), exams, &selected, profiles))
            .collect();
        days.insert(*date, results);
    }

    let plan = SeatingPlan { days };
    if plan.total_unassigned() > 0 {
        tracing::warn!(
            unassigned = plan.total_unassigned(),
            "seating left students without seats"
        );
    }
    Ok(plan)
}

/// Seats one slot's exams into the given rooms, in room order.
pub fn allocate_slot(
    slot_label: String,
    exams: &[ScheduledExam],
    rooms: &[&Room],
    profiles: &RoomProfileTable,
) -> SlotSeatingResult {
    let mut arrangements: Vec<RoomArrangement> = rooms
        .iter()
        .map(|room| RoomArrangement {
            room_id: room.id.clone(),
            room_name: room.name.clone(),
            capacity: room.capacity,
            block: room.block.clone(),
            preference: profiles.preference_rank(&room.name),
            sections: Default::default(),
            section_capacities: profiles.section_capacities(&room.name, room.capacity),
        })
        .collect();
    let total_capacity: u32 = rooms
        .iter()
        .map(|room| profiles.total_capacity(&room.name, room.capacity))
        .sum();

    // Largest roster first; stable sort keeps timetable order on ties.
    let mut order: Vec<&ScheduledExam> = exams.iter().collect();
    order.sort_by(|a, b| b.students.len().cmp(&a.students.len()));

    let mut unassigned = Vec::new();
    for exam in order {
        let mut cursor = 0;
        first_pass(&mut arrangements, exam, &mut cursor);
        if cursor < exam.students.len() {
            backup_pass(&mut arrangements, exam, &mut cursor);
        }
        if cursor < exam.students.len() {
            unassigned.push(UnassignedCourse {
                course_code: exam.code.clone(),
                course_name: exam.name.clone(),
                students: exam.students[cursor..].to_vec(),
            });
        }
    }

    arrangements.retain(RoomArrangement::is_occupied);
    let total_students: usize = arrangements.iter().map(RoomArrangement::students_placed).sum();
    let utilization_rate = if total_capacity > 0 {
        (total_students as f64 / f64::from(total_capacity) * 10_000.0).round() / 100.0
    } else {
        0.0
    };

    SlotSeatingResult {
        slot_label,
        arrangements,
        total_students,
        total_capacity,
        utilization_rate,
        unassigned_students: unassigned,
    }
}

/// Fills sections A–C across the rooms. A course takes at most one
/// first-pass section per room: its existing one when present, else the
/// first empty one if the room still has a course vacancy.
fn first_pass(arrangements: &mut [RoomArrangement], exam: &ScheduledExam, cursor: &mut usize) {
    for room in arrangements.iter_mut() {
        if *cursor >= exam.students.len() {
            return;
        }
        let existing = SectionId::FIRST_PASS
            .into_iter()
            .find(|&s| room.section_course(s) == Some(exam.code.as_str()));
        match existing {
            Some(section) => fill_section(room, section, exam, cursor),
            None if room.distinct_courses().len() < 3 => {
                if let Some(section) = SectionId::FIRST_PASS
                    .into_iter()
                    .find(|&s| room.section(s).is_empty() && room.free_in(s) > 0)
                {
                    fill_section(room, section, exam, cursor);
                }
            }
            None => {}
        }
    }
}

/// Opens section D for overflow. Preference order:
///
/// 1. A D already seating this course
/// 2. An empty D behind a B section of the same course
/// 3. Any empty D, provided neither A nor C holds the course and the
///    room still has a course vacancy
fn backup_pass(arrangements: &mut [RoomArrangement], exam: &ScheduledExam, cursor: &mut usize) {
    let code = exam.code.as_str();

    for room in arrangements.iter_mut() {
        if *cursor >= exam.students.len() {
            return;
        }
        if room.section_course(SectionId::D) == Some(code) {
            fill_section(room, SectionId::D, exam, cursor);
        }
    }

    for room in arrangements.iter_mut() {
        if *cursor >= exam.students.len() {
            return;
        }
        if room.section(SectionId::D).is_empty() && room.section_course(SectionId::B) == Some(code) {
            fill_section(room, SectionId::D, exam, cursor);
        }
    }

    for room in arrangements.iter_mut() {
        if *cursor >= exam.students.len() {
            return;
        }
        let hosts_course = room.distinct_courses().contains(&code);
        if room.section(SectionId::D).is_empty()
            && room.section_course(SectionId::A) != Some(code)
            && room.section_course(SectionId::C) != Some(code)
            && (hosts_course || room.distinct_courses().len() < 3)
        {
            fill_section(room, SectionId::D, exam, cursor);
        }
    }
}

/// Seats students into one section until it fills or the roster runs out.
/// Seat labels are `{section}{n}` with `n` counting from 1.
fn fill_section(
    room: &mut RoomArrangement,
    section: SectionId,
    exam: &ScheduledExam,
    cursor: &mut usize,
) {
    while *cursor < exam.students.len() && room.free_in(section) > 0 {
        let n = room.sections[section.index()].len() + 1;
        room.sections[section.index()].push(SeatAssignment {
            seat_label: format!("{section}{n}"),
            student: exam.students[*cursor].clone(),
            course_code: exam.code.clone(),
            course_name: exam.name.clone(),
        });
        *cursor += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoomProfile, Timetable, TimetableStats};
    use chrono::NaiveDate;

    fn exam(code: &str, n: usize) -> ScheduledExam {
        ScheduledExam {
            code: code.into(),
            name: format!("{code} name"),
            students: (0..n).map(|i| format!("{code}-s{i}")).collect(),
        }
    }

    fn two_rooms() -> (Vec<Room>, RoomProfileTable) {
        let rooms = vec![Room::new("1", "H-101", 60), Room::new("2", "H-201", 96)];
        let profiles = RoomProfileTable::new()
            .with_profile("H-101", RoomProfile::new([15, 15, 15, 15], 1))
            .with_profile("H-201", RoomProfile::new([24, 24, 24, 24], 2));
        (rooms, profiles)
    }

    fn refs(rooms: &[Room]) -> Vec<&Room> {
        rooms.iter().collect()
    }

    #[test]
    fn test_largest_course_first_conservation() {
        // 40 + 30 + 10 students into 60 + 96 seats.
        let (rooms, profiles) = two_rooms();
        let exams = vec![exam("Z", 10), exam("X", 40), exam("Y", 30)];

        let result = allocate_slot("1".into(), &exams, &refs(&rooms), &profiles);

        let seated = result.total_students;
        let unseated = result.unassigned_count();
        assert_eq!(seated + unseated, 80);
        assert_eq!(result.total_capacity, 156);

        // Largest course seats first: X got the A sections.
        let first = &result.arrangements[0];
        assert_eq!(first.room_name, "H-101");
        assert_eq!(first.section_course(SectionId::A), Some("X"));
    }

    #[test]
    fn test_section_holds_one_course() {
        let (rooms, profiles) = two_rooms();
        let exams = vec![exam("X", 40), exam("Y", 30), exam("Z", 10)];

        let result = allocate_slot("1".into(), &exams, &refs(&rooms), &profiles);
        for room in &result.arrangements {
            for section in SectionId::ALL {
                let codes: std::collections::HashSet<_> = room
                    .section(section)
                    .iter()
                    .map(|seat| seat.course_code.as_str())
                    .collect();
                assert!(codes.len() <= 1, "section {section} mixes courses");
            }
        }
    }

    #[test]
    fn test_room_course_cap() {
        let rooms = vec![Room::new("1", "H-101", 400)];
        let profiles =
            RoomProfileTable::new().with_profile("H-101", RoomProfile::new([100, 100, 100, 100], 1));
        let exams = vec![exam("A", 5), exam("B", 5), exam("C", 5), exam("D4", 5)];

        let result = allocate_slot("1".into(), &exams, &refs(&rooms), &profiles);
        let room = &result.arrangements[0];
        assert!(room.distinct_courses().len() <= 3);
        // The fourth course finds no room.
        assert_eq!(result.unassigned_count(), 5);
    }

    #[test]
    fn test_section_capacity_respected() {
        let (rooms, profiles) = two_rooms();
        let exams = vec![exam("X", 200)];

        let result = allocate_slot("1".into(), &exams, &refs(&rooms), &profiles);
        for room in &result.arrangements {
            for section in SectionId::ALL {
                assert!(
                    room.section(section).len() as u32 <= room.section_capacities[section.index()]
                );
            }
        }
    }

    #[test]
    fn test_backup_skips_own_a_section() {
        // One room, A holds the course, so its overflow cannot open D
        // there and goes unassigned.
        let rooms = vec![Room::new("1", "H-101", 40)];
        let profiles =
            RoomProfileTable::new().with_profile("H-101", RoomProfile::new([10, 10, 10, 10], 1));
        let exams = vec![exam("X", 25)];

        let result = allocate_slot("1".into(), &exams, &refs(&rooms), &profiles);
        let room = &result.arrangements[0];
        assert_eq!(room.section_course(SectionId::A), Some("X"));
        assert!(room.section(SectionId::D).is_empty());
        assert_eq!(result.unassigned_count(), 15);
    }

    #[test]
    fn test_backup_follows_b_section() {
        // X fills A exactly; Y lands in B and overflows into the D
        // behind its own B section.
        let rooms = vec![Room::new("1", "H-101", 50)];
        let profiles =
            RoomProfileTable::new().with_profile("H-101", RoomProfile::new([20, 10, 10, 10], 1));
        let exams = vec![exam("X", 20), exam("Y", 15)];

        let result = allocate_slot("1".into(), &exams, &refs(&rooms), &profiles);
        let room = &result.arrangements[0];
        assert_eq!(room.section_course(SectionId::B), Some("Y"));
        assert_eq!(room.section_course(SectionId::D), Some("Y"));
        assert_eq!(room.section(SectionId::D).len(), 5);
        assert_eq!(result.unassigned_count(), 0);
    }

    #[test]
    fn test_seat_labels() {
        let rooms = vec![Room::new("1", "H-101", 40)];
        let profiles =
            RoomProfileTable::new().with_profile("H-101", RoomProfile::new([10, 10, 10, 10], 1));
        let exams = vec![exam("X", 3)];

        let result = allocate_slot("1".into(), &exams, &refs(&rooms), &profiles);
        let labels: Vec<_> = result.arrangements[0]
            .section(SectionId::A)
            .iter()
            .map(|seat| seat.seat_label.as_str())
            .collect();
        assert_eq!(labels, vec!["A1", "A2", "A3"]);
    }

    #[test]
    fn test_empty_rooms_filtered_and_utilization_rounded() {
        let (rooms, profiles) = two_rooms();
        let exams = vec![exam("X", 10)];

        let result = allocate_slot("1".into(), &exams, &refs(&rooms), &profiles);
        assert_eq!(result.arrangements.len(), 1);
        // 10 / 156 = 6.4102...% rounds to 6.41.
        assert_eq!(result.utilization_rate, 6.41);
    }

    #[test]
    fn test_plan_covers_every_slot() {
        let (rooms, profiles) = two_rooms();
        let d1 = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let mut days = BTreeMap::new();
        days.insert(d1, vec![vec![exam("X", 5)], vec![]]);
        let timetable = Timetable {
            days,
            stats: TimetableStats {
                total_courses: 1,
                scheduled_courses: 1,
                unscheduled_courses: 0,
                num_days: 1,
                num_slots: 2,
                slot_utilization: vec![],
            },
        };
        let ids = vec!["1".to_string(), "2".to_string()];

        let plan = allocate_seating(&timetable, &rooms, &ids, &profiles).unwrap();
        let slots = &plan.days[&d1];
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].slot_label, "1");
        assert_eq!(slots[0].total_students, 5);
        assert_eq!(slots[1].total_students, 0);
        assert!(slots[1].arrangements.is_empty());
    }

    #[test]
    fn test_room_ordering_unranked_last() {
        let rooms = vec![
            Room::new("1", "Z-hall", 40),
            Room::new("2", "A-hall", 40),
            Room::new("3", "M-hall", 40),
        ];
        // Only M-hall is profiled; it must fill first despite its name.
        let profiles =
            RoomProfileTable::new().with_profile("M-hall", RoomProfile::new([10, 10, 10, 10], 1));
        let d1 = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let mut days = BTreeMap::new();
        days.insert(d1, vec![vec![exam("X", 5)]]);
        let timetable = Timetable {
            days,
            stats: TimetableStats {
                total_courses: 1,
                scheduled_courses: 1,
                unscheduled_courses: 0,
                num_days: 1,
                num_slots: 1,
                slot_utilization: vec![],
            },
        };
        let ids: Vec<String> = vec!["1".into(), "2".into(), "3".into()];

        let plan = allocate_seating(&timetable, &rooms, &ids, &profiles).unwrap();
        let slot = &plan.days[&d1][0];
        assert_eq!(slot.arrangements[0].room_name, "M-hall");
    }

    #[test]
    fn test_invalid_selection_rejected() {
        let (rooms, profiles) = two_rooms();
        let timetable = Timetable {
            days: BTreeMap::new(),
            stats: TimetableStats {
                total_courses: 0,
                scheduled_courses: 0,
                unscheduled_courses: 0,
                num_days: 0,
                num_slots: 0,
                slot_utilization: vec![],
            },
        };
        let err = allocate_seating(&timetable, &rooms, &[], &profiles).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput { .. }));
    }
}
