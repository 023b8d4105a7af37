//! Examination scheduling domain models.
//!
//! Static inputs (`Course`, `ExamCalendar`, `Room`, `Invigilator`) are
//! loaded once per run and never mutated; each pipeline stage produces a
//! fresh artifact (`Timetable`, `SeatingPlan`, `DutyRoster`) consumed by
//! the next stage.
//!
//! | Stage | Consumes | Produces |
//! |-------|----------|----------|
//! | Synthesizer | courses, calendar | `Timetable` |
//! | Seating allocator | `Timetable`, rooms | `SeatingPlan` |
//! | Duty rosterer | `SeatingPlan`, invigilators | `DutyRoster` |

mod course;
mod duty;
mod invigilator;
mod room;
mod seating;
mod slot;
mod timetable;

pub use course::{Course, StudentId};
pub use duty::{DutyRoster, DutySummary, RoomDuty, SlotDuty};
pub use invigilator::{Invigilator, InvigilatorCategory};
pub use room::{Room, RoomProfile, RoomProfileTable, SectionId};
pub use seating::{
    RoomArrangement, RoomUsage, SeatAssignment, SeatingPlan, SlotSeatingResult, SlotSeatingStats,
    UnassignedCourse,
};
pub use slot::{ExamCalendar, ExamSlot};
pub use timetable::{DayUtilization, ScheduledExam, Timetable, TimetableStats};
