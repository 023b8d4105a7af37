//! Invigilator model.

use serde::{Deserialize, Serialize};

/// Invigilator classification. Every proctored room should get one
/// faculty member plus one staff member where the pool allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvigilatorCategory {
    Faculty,
    Staff,
}

/// A person eligible for invigilation duty. Static per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invigilator {
    /// Unique name; duty counts are keyed by it.
    pub name: String,
    /// Faculty or staff.
    pub category: InvigilatorCategory,
}

impl Invigilator {
    /// Creates a faculty invigilator.
    pub fn faculty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: InvigilatorCategory::Faculty,
        }
    }

    /// Creates a staff invigilator.
    pub fn staff(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: InvigilatorCategory::Staff,
        }
    }

    /// Whether this person is faculty.
    #[inline]
    pub fn is_faculty(&self) -> bool {
        self.category == InvigilatorCategory::Faculty
    }
}
