//! Input validation for scheduling runs.
//!
//! Checks structural integrity of courses, calendars, room selections, and
//! invigilator pools before a stage runs. Detects:
//! - Empty inputs (no courses, no rooms, no invigilators)
//! - Duplicate identifiers
//! - Degenerate calendars (zero days, zero or oversized slot counts)
//!
//! Partial infeasibility (unplaced courses, unseated students, understaffed
//! rooms) is not validated here — the stages report it structurally.

use std::collections::HashSet;

use crate::models::{Course, ExamCalendar, Invigilator, Room};

/// Slots per day beyond this cannot be represented by the conflict model's
/// per-day occupancy masks.
pub const MAX_SLOTS_PER_DAY: usize = 64;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No courses supplied.
    EmptyCourseList,
    /// Two courses share a code.
    DuplicateCourseCode,
    /// Zero days, zero slots, or more slots than the model supports.
    InvalidCalendar,
    /// No room ids selected, or none matched the catalog.
    EmptyRoomSelection,
    /// Two selected rooms share an id.
    DuplicateRoomId,
    /// No invigilators supplied.
    EmptyInvigilatorPool,
    /// Two invigilators share a name.
    DuplicateInvigilatorName,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates inputs to the timetable synthesizer.
///
/// Checks:
/// 1. At least one course
/// 2. No duplicate course codes
/// 3. At least one exam day and 1..=64 slots per day
pub fn validate_synthesis_input(courses: &[Course], calendar: &ExamCalendar) -> ValidationResult {
    let mut errors = Vec::new();

    if courses.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCourseList,
            "no courses to schedule",
        ));
    }

    let mut codes = HashSet::new();
    for course in courses {
        if !codes.insert(course.code.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateCourseCode,
                format!("duplicate course code: {}", course.code),
            ));
        }
    }

    if calendar.num_days() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidCalendar,
            "calendar has no exam days",
        ));
    }
    if calendar.slots_per_day == 0 || calendar.slots_per_day > MAX_SLOTS_PER_DAY {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidCalendar,
            format!(
                "slots per day must be 1..={MAX_SLOTS_PER_DAY}, got {}",
                calendar.slots_per_day
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates inputs to the seating allocator.
///
/// Checks:
/// 1. A non-empty room-id selection
/// 2. At least one selected id present in the catalog
/// 3. No duplicate ids among the matched rooms
pub fn validate_seating_input(rooms: &[Room], selected_room_ids: &[String]) -> ValidationResult {
    let mut errors = Vec::new();

    if selected_room_ids.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyRoomSelection,
            "no rooms selected for seating",
        ));
    } else if !rooms.iter().any(|r| selected_room_ids.contains(&r.id)) {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyRoomSelection,
            "none of the selected room ids exist in the catalog",
        ));
    }

    let mut ids = HashSet::new();
    for room in rooms.iter().filter(|r| selected_room_ids.contains(&r.id)) {
        if !ids.insert(room.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateRoomId,
                format!("duplicate room id: {}", room.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the invigilator pool for rostering.
///
/// Checks:
/// 1. A non-empty pool
/// 2. No duplicate names (duty counts are keyed by name)
pub fn validate_roster_input(invigilators: &[Invigilator]) -> ValidationResult {
    let mut errors = Vec::new();

    if invigilators.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInvigilatorPool,
            "no invigilators available",
        ));
    }

    let mut names = HashSet::new();
    for person in invigilators {
        if !names.insert(person.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateInvigilatorName,
                format!("duplicate invigilator name: {}", person.name),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
