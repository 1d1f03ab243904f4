use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::domain::enrollment::Enrollment;
use crate::domain::model::{EnrollmentId, Profile, StudentId, StudentStatus};
use crate::utils::error::Result;
use crate::utils::validation::{errors_to_result, looks_like_email, Validate};

/// A registered student and the enrollments the registry has granted them,
/// in the order they were granted.
#[derive(Debug, Clone, Serialize)]
pub struct Student {
    id: StudentId,
    full_name: String,
    email: String,
    reg_no: String,
    status: StudentStatus,
    registration_date: NaiveDate,
    #[serde(skip)]
    enrollments: Vec<Enrollment>,
}

impl Student {
    /// New active student registered today.
    pub fn new(
        id: u64,
        full_name: impl Into<String>,
        email: impl Into<String>,
        reg_no: impl Into<String>,
    ) -> Self {
        Self {
            id: StudentId(id),
            full_name: full_name.into(),
            email: email.into(),
            reg_no: reg_no.into(),
            status: StudentStatus::Active,
            registration_date: Local::now().date_naive(),
            enrollments: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: StudentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_registration_date(mut self, date: NaiveDate) -> Self {
        self.registration_date = date;
        self
    }

    pub fn student_id(&self) -> StudentId {
        self.id
    }

    pub fn reg_no(&self) -> &str {
        &self.reg_no
    }

    pub fn status(&self) -> StudentStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }

    pub fn registration_date(&self) -> NaiveDate {
        self.registration_date
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    pub fn set_full_name(&mut self, full_name: impl Into<String>) {
        self.full_name = full_name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_status(&mut self, status: StudentStatus) {
        self.status = status;
    }

    pub(crate) fn push_enrollment(&mut self, enrollment: Enrollment) {
        self.enrollments.push(enrollment);
    }

    pub(crate) fn remove_enrollments_for(&mut self, course_code: &str) -> usize {
        let before = self.enrollments.len();
        self.enrollments
            .retain(|e| e.course().code() != course_code);
        before - self.enrollments.len()
    }

    pub(crate) fn enrollment_mut(&mut self, id: EnrollmentId) -> Option<&mut Enrollment> {
        self.enrollments.iter_mut().find(|e| e.id() == id)
    }

    /// Violated structural constraints, empty when the record is valid.
    pub fn validation_errors(&self) -> Vec<String> {
        self.validation_errors_as_of(Local::now().date_naive())
    }

    pub fn validation_errors_as_of(&self, today: NaiveDate) -> Vec<String> {
        let mut errors = Vec::new();

        if self.id.0 == 0 {
            errors.push("Student ID must be positive".to_string());
        }
        if self.full_name.trim().is_empty() {
            errors.push("Student name cannot be empty".to_string());
        }
        if !looks_like_email(&self.email) {
            errors.push("Valid email is required".to_string());
        }
        if self.reg_no.trim().is_empty() {
            errors.push("Registration number cannot be empty".to_string());
        }
        if self.registration_date > today {
            errors.push("Registration date cannot be in the future".to_string());
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validation_errors().is_empty()
    }
}

impl Profile for Student {
    fn id(&self) -> u64 {
        self.id.0
    }

    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn profile(&self) -> String {
        format!(
            "Student Profile - {}, Registration: {}, Status: {}, Courses: {}",
            self.identity_line(),
            self.reg_no,
            self.status,
            self.enrollments.len()
        )
    }
}

impl Validate for Student {
    fn validate(&self) -> Result<()> {
        errors_to_result(&format!("Student {}", self.reg_no), self.validation_errors())
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Student [{}, RegNo: {}, Status: {}, Registered: {}]",
            self.identity_line(),
            self.reg_no,
            self.status,
            self.registration_date
        )
    }
}
