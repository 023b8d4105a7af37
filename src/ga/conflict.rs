//! Student conflict model.
//!
//! Scores a candidate course→slot assignment as a penalty sum. Lower is
//! better; zero is a conflict-free, perfectly balanced timetable. The
//! weights keep the terms strictly tiered: any unplaced course dominates
//! any overlap, and any overlap dominates all comfort terms combined.
//!
//! # Reference
//!
//! - Carter, Laporte & Lee (1996), "Examination Timetabling: Algorithmic
//!   Strategies and Applications", on proximity-weighted conflict costs

use crate::models::{Course, ExamSlot};

/// Penalty per course left without a slot.
pub const UNSCHEDULED_PENALTY: f64 = 75_000.0;

/// Penalty per extra exam a student sits in one slot.
pub const OVERLAP_PENALTY: f64 = 15_000.0;

/// Penalty per distinct slot beyond two a student occupies in one day.
pub const EXCESS_DAILY_PENALTY: f64 = 100.0;

/// Penalty per back-to-back pair in a student's day, including the pair
/// formed by the last slot of one day and the first slot of the next.
pub const ADJACENT_PENALTY: f64 = 50.0;

/// Weight on each slot's absolute deviation from its day's mean
/// occupancy.
pub const SPREAD_WEIGHT: f64 = 100.0;

/// Course rosters reindexed for fast conflict scoring.
///
/// Student ids are interned to dense `u32` indices once per run; the
/// fitness loop then never touches strings.
#[derive(Debug, Clone)]
pub struct CourseRosters {
    /// Per course, the interned indices of its students.
    pub by_course: Vec<Vec<u32>>,
    /// Number of distinct students across all rosters.
    pub num_students: usize,
}

impl CourseRosters {
    /// Interns student ids across the course list.
    pub fn from_courses(courses: &[Course]) -> Self {
        let mut index = std::collections::HashMap::new();
        let mut by_course = Vec::with_capacity(courses.len());
        for course in courses {
            let mut roster = Vec::with_capacity(course.students.len());
            for student in &course.students {
                let next = index.len() as u32;
                let id = *index.entry(student.as_str()).or_insert(next);
                roster.push(id);
            }
            by_course.push(roster);
        }
        Self {
            num_students: index.len(),
            by_course,
        }
    }
}

/// Scores an assignment against the conflict model.
///
/// `slots[i]` is the placement of course `i`, `None` when unplaced.
/// Pure: same inputs, same score.
pub fn conflict_penalty(
    slots: &[Option<ExamSlot>],
    rosters: &CourseRosters,
    num_days: usize,
    num_slots: usize,
) -> f64 {
    let positions = num_days * num_slots;
    let mut penalty = 0.0;

    // Per-student exam counts per (day, slot) position, plus the number
    // of distinct students sitting in each position.
    let mut counts = vec![0u8; rosters.num_students * positions];
    let mut occupancy = vec![0u32; positions];

    for (course, slot) in slots.iter().enumerate() {
        match slot {
            Some(s) => {
                let pos = s.day * num_slots + s.slot;
                for &student in &rosters.by_course[course] {
                    let cell = &mut counts[student as usize * positions + pos];
                    if *cell == 0 {
                        occupancy[pos] += 1;
                    }
                    *cell = cell.saturating_add(1);
                }
            }
            None => penalty += UNSCHEDULED_PENALTY,
        }
    }

    for student in 0..rosters.num_students {
        let row = &counts[student * positions..(student + 1) * positions];
        let mut prev_day_last = false;
        for day in 0..num_days {
            let day_row = &row[day * num_slots..(day + 1) * num_slots];

            // Occupancy mask over the day's slots; `MAX_SLOTS_PER_DAY`
            // keeps this within one u64.
            let mut mask = 0u64;
            for (slot, &count) in day_row.iter().enumerate() {
                if count > 0 {
                    mask |= 1 << slot;
                }
                if count > 1 {
                    penalty += OVERLAP_PENALTY * f64::from(count - 1);
                }
            }

            // Daily load counts distinct slots, not exams; a same-slot
            // overlap is already charged above.
            let distinct_slots = mask.count_ones();
            if distinct_slots > 2 {
                penalty += EXCESS_DAILY_PENALTY * f64::from(distinct_slots - 2);
            }
            penalty += ADJACENT_PENALTY * f64::from((mask & (mask >> 1)).count_ones());
            if prev_day_last && mask & 1 != 0 {
                penalty += ADJACENT_PENALTY;
            }
            prev_day_last = mask >> (num_slots - 1) & 1 != 0;
        }
    }

    // Load balance within each day: every slot's distinct-student count
    // against that day's own mean. Days interact with each other only
    // through the hard terms above.
    for day in 0..num_days {
        let day_occupancy = &occupancy[day * num_slots..(day + 1) * num_slots];
        let day_total: u32 = day_occupancy.iter().sum();
        let mean = f64::from(day_total) / num_slots as f64;
        for &students in day_occupancy {
            penalty += SPREAD_WEIGHT * (f64::from(students) - mean).abs();
        }
    }

    penalty
}
