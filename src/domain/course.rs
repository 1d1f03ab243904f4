use serde::Serialize;
use std::fmt;

use crate::domain::model::{InstructorRef, Semester};
use crate::utils::error::Result;
use crate::utils::validation::errors_to_result;

/// Named fields for building a [`Course`].
#[derive(Debug, Clone)]
pub struct CourseSpec {
    pub code: String,
    pub title: String,
    pub credits: u32,
    pub department: String,
    pub semester: Semester,
    pub instructor: Option<InstructorRef>,
}

/// Immutable course offering. Only [`Course::new`] produces one, so credits are
/// always positive and code/title are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    code: String,
    title: String,
    credits: u32,
    department: String,
    semester: Semester,
    instructor: Option<InstructorRef>,
}

impl Course {
    pub fn new(spec: CourseSpec) -> Result<Self> {
        let mut errors = Vec::new();
        if spec.code.trim().is_empty() {
            errors.push("Course code cannot be empty".to_string());
        }
        if spec.title.trim().is_empty() {
            errors.push("Course title cannot be empty".to_string());
        }
        if spec.credits == 0 {
            errors.push("Course credits must be positive".to_string());
        }
        errors_to_result(&format!("Course '{}'", spec.code), errors)?;

        Ok(Self {
            code: spec.code.trim().to_string(),
            title: spec.title,
            credits: spec.credits,
            department: spec.department,
            semester: spec.semester,
            instructor: spec.instructor,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn semester(&self) -> Semester {
        self.semester
    }

    pub fn instructor(&self) -> Option<&InstructorRef> {
        self.instructor.as_ref()
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Course [{}: {}, Credits: {}, Department: {}, Semester: {}, Instructor: {}]",
            self.code,
            self.title,
            self.credits,
            self.department,
            self.semester,
            self.instructor
                .as_ref()
                .map(|i| i.full_name.as_str())
                .unwrap_or("TBD")
        )
    }
}
