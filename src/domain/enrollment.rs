use chrono::{Local, NaiveDate};
use std::fmt;
use std::sync::Arc;

use crate::domain::course::Course;
use crate::domain::model::{EnrollmentId, Grade, StudentId};

/// A student's seat in a course. Only the registry creates these; the student
/// and course never change afterwards, the grade may be set and reset.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment {
    id: EnrollmentId,
    student_id: StudentId,
    student_reg_no: String,
    course: Arc<Course>,
    enrolled_on: NaiveDate,
    grade: Option<Grade>,
}

impl Enrollment {
    pub(crate) fn new(
        id: EnrollmentId,
        student_id: StudentId,
        student_reg_no: String,
        course: Arc<Course>,
    ) -> Self {
        Self {
            id,
            student_id,
            student_reg_no,
            course,
            enrolled_on: Local::now().date_naive(),
            grade: None,
        }
    }

    pub fn id(&self) -> EnrollmentId {
        self.id
    }

    pub fn student_id(&self) -> StudentId {
        self.student_id
    }

    pub fn student_reg_no(&self) -> &str {
        &self.student_reg_no
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn course_handle(&self) -> Arc<Course> {
        Arc::clone(&self.course)
    }

    pub fn enrolled_on(&self) -> NaiveDate {
        self.enrolled_on
    }

    pub fn grade(&self) -> Option<Grade> {
        self.grade
    }

    pub fn is_graded(&self) -> bool {
        self.grade.is_some()
    }

    pub(crate) fn set_grade(&mut self, grade: Grade) {
        self.grade = Some(grade);
    }

    pub(crate) fn matches(&self, student_id: StudentId, course_code: &str) -> bool {
        self.student_id == student_id && self.course.code() == course_code
    }
}

impl fmt::Display for Enrollment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Enrollment {} [Student: {}, Course: {}, Date: {}, Grade: {}]",
            self.id,
            self.student_reg_no,
            self.course.code(),
            self.enrolled_on,
            self.grade
                .map(|g| g.to_string())
                .unwrap_or_else(|| "Not Assigned".to_string())
        )
    }
}
