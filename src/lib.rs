//! Examination scheduling core.
//!
//! Assigns exams to time slots, seats enrolled students into sectioned
//! rooms, and rosters invigilators over the resulting room occupancy.
//! The three stages run strictly in order and communicate only through
//! their output artifacts, so a pipeline is resumable at any stage.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Course`, `ExamCalendar`, `Room`,
//!   `Invigilator`, plus the stage artifacts `Timetable`, `SeatingPlan`,
//!   `DutyRoster`
//! - **`ga`**: Timetable synthesis via a genetic search over course→slot
//!   assignments, with a parallel fitness pipeline
//! - **`seating`**: Greedy largest-course-first packing into room sections
//! - **`duty`**: Invigilator rostering under per-person duty caps
//! - **`validation`**: Input integrity checks (empty inputs, duplicate codes,
//!   degenerate calendars)
//!
//! # References
//!
//! - Carter, Laporte & Lee (1996), "Examination Timetabling: Algorithmic
//!   Strategies and Applications"
//! - Burke & Newall (1999), "A Multistage Evolutionary Algorithm for the
//!   Timetable Problem"

pub mod duty;
pub mod error;
pub mod ga;
pub mod models;
pub mod seating;
pub mod validation;

pub use duty::roster_duties;
pub use error::PipelineError;
pub use ga::{synthesize_timetable, SynthesisOutcome, SynthesizerConfig};
pub use seating::allocate_seating;
