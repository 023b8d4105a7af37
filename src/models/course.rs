//! Course model.
//!
//! A course couples an exam (identified by its course code) with the
//! roster of students who sit it. Rosters are immutable once loaded for
//! a scheduling run; the synthesizer and seating allocator only read them.

use serde::{Deserialize, Serialize};

/// Roll number or equivalent unique student identifier.
pub type StudentId = String;

/// A course with its enrolled-student roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course code (e.g., "CS1.301").
    pub code: String,
    /// Human-readable course name.
    pub name: String,
    /// Enrolled students. Order is preserved into seat assignments.
    pub students: Vec<StudentId>,
}

impl Course {
    /// Creates a course with an empty roster.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            students: Vec::new(),
        }
    }

    /// Sets the full roster.
    pub fn with_students<I, S>(mut self, students: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StudentId>,
    {
        self.students = students.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a single student.
    pub fn with_student(mut self, student: impl Into<StudentId>) -> Self {
        self.students.push(student.into());
        self
    }

    /// Number of enrolled students.
    #[inline]
    pub fn roster_size(&self) -> usize {
        self.students.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_builder() {
        let c = Course::new("CS101", "Algorithms")
            .with_students(["s1", "s2"])
            .with_student("s3");

        assert_eq!(c.code, "CS101");
        assert_eq!(c.name, "Algorithms");
        assert_eq!(c.roster_size(), 3);
        assert_eq!(c.students[2], "s3");
    }

    #[test]
    fn test_empty_roster() {
        let c = Course::new("MA202", "Linear Algebra");
        assert_eq!(c.roster_size(), 0);
    }
}
