//! Timetable synthesis.
//!
//! Genetic search over course→slot assignments. The pieces:
//!
//! - [`conflict`]: the penalty model scoring a candidate assignment
//! - [`solution`]: candidates and the crossover/mutation operators
//! - [`cache`]: shared LRU fitness cache
//! - [`engine`]: the generational loop and its worker pool
//!
//! Entry point: [`synthesize_timetable`].

pub mod cache;
pub mod conflict;
pub mod engine;
pub mod solution;

pub use conflict::{conflict_penalty, CourseRosters};
pub use engine::{synthesize_timetable, SynthesisOutcome, SynthesizerConfig};
pub use solution::CandidateSolution;
