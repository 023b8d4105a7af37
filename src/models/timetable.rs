//! Timetable artifact produced by the synthesizer.
//!
//! A timetable lists, per date and slot, every course examined there
//! together with its full roster, plus run statistics. It is produced
//! fresh by each synthesis run and never mutated afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ExamCalendar, StudentId};

/// A course placed into a specific slot, with its roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledExam {
    /// Course code.
    pub code: String,
    /// Course name.
    pub name: String,
    /// Enrolled students sitting this exam.
    pub students: Vec<StudentId>,
}

/// A complete exam timetable with run statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timetable {
    /// Per date, one entry per slot (index = slot index), each listing
    /// the exams held there.
    pub days: BTreeMap<NaiveDate, Vec<Vec<ScheduledExam>>>,
    /// Synthesis statistics.
    pub stats: TimetableStats,
}

/// Statistics for one synthesis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableStats {
    /// Courses supplied to the run.
    pub total_courses: usize,
    /// Courses that received a valid slot.
    pub scheduled_courses: usize,
    /// Courses the search left unplaced.
    pub unscheduled_courses: usize,
    /// Number of exam days.
    pub num_days: usize,
    /// Slots per day.
    pub num_slots: usize,
    /// Per-day course counts per slot.
    pub slot_utilization: Vec<DayUtilization>,
}

/// Course count per slot for one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayUtilization {
    /// The exam date.
    pub date: NaiveDate,
    /// Courses examined per slot (index = slot index).
    pub counts: Vec<usize>,
}

impl Timetable {
    /// The exams held in a given (date, slot index), empty when out of range.
    pub fn exams_at(&self, date: NaiveDate, slot: usize) -> &[ScheduledExam] {
        self.days
            .get(&date)
            .and_then(|slots| slots.get(slot))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Finds where a course was placed.
    pub fn placement_of(&self, code: &str) -> Option<(NaiveDate, usize)> {
        for (date, slots) in &self.days {
            for (idx, exams) in slots.iter().enumerate() {
                if exams.iter().any(|e| e.code == code) {
                    return Some((*date, idx));
                }
            }
        }
        None
    }

    /// 1-based display label for a slot index.
    pub fn slot_label(slot: usize) -> String {
        ExamCalendar::slot_label(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Timetable {
        let d1 = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        let mut days = BTreeMap::new();
        days.insert(
            d1,
            vec![
                vec![ScheduledExam {
                    code: "CS101".into(),
                    name: "Algorithms".into(),
                    students: vec!["s1".into()],
                }],
                vec![],
            ],
        );
        days.insert(d2, vec![vec![], vec![]]);
        Timetable {
            days,
            stats: TimetableStats {
                total_courses: 1,
                scheduled_courses: 1,
                unscheduled_courses: 0,
                num_days: 2,
                num_slots: 2,
                slot_utilization: vec![
                    DayUtilization {
                        date: d1,
                        counts: vec![1, 0],
                    },
                    DayUtilization {
                        date: d2,
                        counts: vec![0, 0],
                    },
                ],
            },
        }
    }

    #[test]
    fn test_exams_at() {
        let tt = sample();
        let d1 = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert_eq!(tt.exams_at(d1, 0).len(), 1);
        assert!(tt.exams_at(d1, 1).is_empty());
        assert!(tt.exams_at(d1, 5).is_empty());
    }

    #[test]
    fn test_placement_lookup() {
        let tt = sample();
        let d1 = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert_eq!(tt.placement_of("CS101"), Some((d1, 0)));
        assert_eq!(tt.placement_of("XX999"), None);
    }
}
