use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::ports::ConfigProvider;
use crate::domain::{Course, Enrollment, EnrollmentId, Grade, Semester, Student};
use crate::utils::error::RegistryError;

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

pub const DEFAULT_MAX_CREDITS: u32 = 24;

const ALLOWED_CREDIT_VALUES: [u32; 6] = [1, 2, 3, 4, 5, 6];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Upper bound on a student's credits within one semester.
    pub max_credits: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_credits: DEFAULT_MAX_CREDITS,
        }
    }
}

impl RegistryConfig {
    pub fn from_provider<C: ConfigProvider + ?Sized>(provider: &C) -> Self {
        Self {
            max_credits: provider.max_credits(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    New,
    Restored,
}

/// Owns the enrollment ledger and admits new enrollments only when every
/// registration rule holds.
///
/// The ledger is append-only in creation order; drops remove entries without
/// reordering the rest. All mutations take `&mut self`, so sharing a registry
/// between threads requires an outer lock such as `Mutex<EnrollmentRegistry>`.
#[derive(Debug, Clone)]
pub struct EnrollmentRegistry {
    config: RegistryConfig,
    ledger: Vec<Enrollment>,
    next_id: u64,
}

impl Default for EnrollmentRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl EnrollmentRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            ledger: Vec::new(),
            next_id: 1,
        }
    }

    pub fn max_credits(&self) -> u32 {
        self.config.max_credits
    }

    /// Enrolls `student` in `course`.
    ///
    /// Checks run in order and the first failure wins: identity of both
    /// entities, positive credits, active status, no existing enrollment for
    /// the pair, and the per-semester credit limit.
    pub fn enroll(
        &mut self,
        student: &mut Student,
        course: &Arc<Course>,
    ) -> RegistryResult<Enrollment> {
        self.admit(student, course, Admission::New)
    }

    /// Re-creates an enrollment read back from saved history.
    ///
    /// Identity checks and the one-enrollment-per-pair rule still apply. The
    /// active-status gate and the credit limit apply to new registrations only.
    pub(crate) fn restore(
        &mut self,
        student: &mut Student,
        course: &Arc<Course>,
    ) -> RegistryResult<Enrollment> {
        self.admit(student, course, Admission::Restored)
    }

    fn admit(
        &mut self,
        student: &mut Student,
        course: &Arc<Course>,
        admission: Admission,
    ) -> RegistryResult<Enrollment> {
        if student.student_id().0 == 0 || student.reg_no().trim().is_empty() {
            return Err(RegistryError::invalid_argument(
                "student must have a positive id and a registration number",
            ));
        }
        if course.code().trim().is_empty() {
            return Err(RegistryError::invalid_argument("course must have a code"));
        }
        if course.credits() == 0 {
            return Err(RegistryError::invalid_argument(format!(
                "course {} has no credits",
                course.code()
            )));
        }

        if admission == Admission::New && !student.is_active() {
            tracing::debug!(
                reg_no = student.reg_no(),
                "rejecting enrollment of inactive student"
            );
            return Err(RegistryError::InactiveStudent {
                reg_no: student.reg_no().to_string(),
            });
        }

        if self.find(student, course.code()).is_some() {
            tracing::debug!(
                reg_no = student.reg_no(),
                course = course.code(),
                "rejecting duplicate enrollment"
            );
            return Err(RegistryError::DuplicateEnrollment {
                reg_no: student.reg_no().to_string(),
                course_code: course.code().to_string(),
            });
        }

        let current = self.semester_credits(student, course.semester());
        let total = current.saturating_add(course.credits());
        if admission == Admission::New && total > self.config.max_credits {
            tracing::debug!(
                reg_no = student.reg_no(),
                course = course.code(),
                current,
                limit = self.config.max_credits,
                "rejecting enrollment over credit limit"
            );
            return Err(RegistryError::CreditLimitExceeded {
                current,
                candidate: course.credits(),
                limit: self.config.max_credits,
            });
        }

        let id = EnrollmentId(self.next_id);
        self.next_id += 1;

        let enrollment = Enrollment::new(
            id,
            student.student_id(),
            student.reg_no().to_string(),
            Arc::clone(course),
        );
        self.ledger.push(enrollment.clone());
        student.push_enrollment(enrollment.clone());

        tracing::info!(
            enrollment = %id,
            reg_no = student.reg_no(),
            course = course.code(),
            semester_credits = total,
            restored = admission == Admission::Restored,
            "student enrolled"
        );

        Ok(enrollment)
    }

    /// Removes the enrollment for the pair from the ledger and from the
    /// student. Returns whether anything was removed.
    pub fn drop_course(&mut self, student: &mut Student, course: &Course) -> bool {
        let before = self.ledger.len();
        self.ledger
            .retain(|e| !e.matches(student.student_id(), course.code()));
        let removed = self.ledger.len() < before;

        if removed {
            student.remove_enrollments_for(course.code());
            tracing::info!(
                reg_no = student.reg_no(),
                course = course.code(),
                "course dropped"
            );
        } else {
            tracing::debug!(
                reg_no = student.reg_no(),
                course = course.code(),
                "nothing to drop"
            );
        }

        removed
    }

    /// Sets or replaces the grade of one of the student's enrollments.
    pub fn assign_grade(
        &mut self,
        student: &mut Student,
        enrollment: EnrollmentId,
        grade: Grade,
    ) -> RegistryResult<()> {
        let student_id = student.student_id();
        let entry = self
            .ledger
            .iter_mut()
            .find(|e| e.id() == enrollment && e.student_id() == student_id)
            .ok_or_else(|| {
                RegistryError::invalid_argument(format!(
                    "enrollment {} does not belong to student {}",
                    enrollment,
                    student.reg_no()
                ))
            })?;
        let owned = student.enrollment_mut(enrollment).ok_or_else(|| {
            RegistryError::invalid_argument(format!(
                "student {} does not hold enrollment {}",
                entry.student_reg_no(),
                enrollment
            ))
        })?;

        if let Some(previous) = entry.grade() {
            tracing::debug!(enrollment = %enrollment, %previous, new = %grade, "regrading");
        }
        entry.set_grade(grade);
        owned.set_grade(grade);

        tracing::info!(enrollment = %enrollment, %grade, "grade assigned");
        Ok(())
    }

    /// Grades the student's enrollment in the course with the given code.
    pub fn assign_grade_for(
        &mut self,
        student: &mut Student,
        course_code: &str,
        grade: Grade,
    ) -> RegistryResult<()> {
        let id = self
            .find(student, course_code)
            .map(Enrollment::id)
            .ok_or_else(|| {
                RegistryError::invalid_argument(format!(
                    "student {} is not enrolled in {}",
                    student.reg_no(),
                    course_code
                ))
            })?;
        self.assign_grade(student, id, grade)
    }

    pub fn get(&self, id: EnrollmentId) -> Option<&Enrollment> {
        self.ledger.iter().find(|e| e.id() == id)
    }

    pub fn find(&self, student: &Student, course_code: &str) -> Option<&Enrollment> {
        self.ledger
            .iter()
            .find(|e| e.matches(student.student_id(), course_code))
    }

    pub fn enrollments_for_student(&self, student: &Student) -> Vec<Enrollment> {
        self.ledger
            .iter()
            .filter(|e| e.student_id() == student.student_id())
            .cloned()
            .collect()
    }

    pub fn enrollments_for_course(&self, course: &Course) -> Vec<Enrollment> {
        self.ledger
            .iter()
            .filter(|e| e.course().code() == course.code())
            .cloned()
            .collect()
    }

    pub fn all_enrollments(&self) -> Vec<Enrollment> {
        self.ledger.clone()
    }

    /// Credits the student currently holds in `semester`.
    pub fn semester_credits(&self, student: &Student, semester: Semester) -> u32 {
        self.ledger
            .iter()
            .filter(|e| e.student_id() == student.student_id() && e.course().semester() == semester)
            .fold(0u32, |acc, e| acc.saturating_add(e.course().credits()))
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    /// Credit counts a new course may carry.
    pub fn allowed_credit_values() -> BTreeSet<u32> {
        ALLOWED_CREDIT_VALUES.into_iter().collect()
    }

    pub fn is_credit_value_allowed(credits: u32) -> bool {
        Self::allowed_credit_values().contains(&credits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CourseSpec, StudentStatus};

    fn course(code: &str, credits: u32, semester: Semester) -> Arc<Course> {
        Arc::new(
            Course::new(CourseSpec {
                code: code.to_string(),
                title: format!("Course {}", code),
                credits,
                department: "CS".to_string(),
                semester,
                instructor: None,
            })
            .unwrap(),
        )
    }

    fn student(id: u64) -> Student {
        Student::new(
            id,
            format!("Student {}", id),
            format!("s{}@campus.edu", id),
            format!("REG{:03}", id),
        )
    }

    #[test]
    fn test_enroll_records_in_ledger_and_student() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig::default());
        let mut s = student(1);
        let c = course("CS101", 3, Semester::Fall);

        let enrollment = registry.enroll(&mut s, &c).unwrap();

        assert_eq!(enrollment.course().code(), "CS101");
        assert!(enrollment.grade().is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(s.enrollments().len(), 1);
        assert_eq!(s.enrollments()[0].id(), enrollment.id());
    }

    #[test]
    fn test_check_order_invalid_before_inactive() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig::default());
        let mut s = Student::new(0, "Nobody", "n@campus.edu", "REG000")
            .with_status(StudentStatus::Inactive);
        let c = course("CS101", 3, Semester::Fall);

        let err = registry.enroll(&mut s, &c).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidArgument { .. }));
    }

    #[test]
    fn test_inactive_wins_over_duplicate_and_limit() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig { max_credits: 3 });
        let mut s = student(1);
        let c = course("CS101", 3, Semester::Fall);
        registry.enroll(&mut s, &c).unwrap();

        s.set_status(StudentStatus::Inactive);
        let err = registry.enroll(&mut s, &c).unwrap_err();
        assert_eq!(
            err,
            RegistryError::InactiveStudent {
                reg_no: "REG001".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_wins_over_credit_limit() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig { max_credits: 3 });
        let mut s = student(1);
        let c = course("CS101", 3, Semester::Fall);
        registry.enroll(&mut s, &c).unwrap();

        let err = registry.enroll(&mut s, &c).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateEnrollment { .. }));
    }

    #[test]
    fn test_credit_limit_is_per_semester() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig { max_credits: 6 });
        let mut s = student(1);
        registry.enroll(&mut s, &course("A", 6, Semester::Fall)).unwrap();
        registry.enroll(&mut s, &course("B", 6, Semester::Spring)).unwrap();

        assert_eq!(registry.semester_credits(&s, Semester::Fall), 6);
        assert_eq!(registry.semester_credits(&s, Semester::Summer), 0);
    }

    #[test]
    fn test_credit_limit_is_per_student() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig { max_credits: 4 });
        let mut first = student(1);
        let mut second = student(2);
        let c = course("CS101", 4, Semester::Fall);

        registry.enroll(&mut first, &c).unwrap();
        registry.enroll(&mut second, &c).unwrap();
        assert_eq!(registry.enrollments_for_course(&c).len(), 2);
    }

    #[test]
    fn test_drop_keeps_relative_order() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig::default());
        let mut s = student(1);
        let a = course("A", 3, Semester::Fall);
        let b = course("B", 3, Semester::Fall);
        let c = course("C", 3, Semester::Fall);
        for course in [&a, &b, &c] {
            registry.enroll(&mut s, course).unwrap();
        }

        assert!(registry.drop_course(&mut s, &b));
        let codes: Vec<String> = registry
            .all_enrollments()
            .iter()
            .map(|e| e.course().code().to_string())
            .collect();
        assert_eq!(codes, vec!["A", "C"]);
        let owned: Vec<&str> = s.enrollments().iter().map(|e| e.course().code()).collect();
        assert_eq!(owned, vec!["A", "C"]);
    }

    #[test]
    fn test_assign_grade_updates_both_views_and_allows_regrade() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig::default());
        let mut s = student(1);
        let c = course("CS101", 3, Semester::Fall);
        let enrollment = registry.enroll(&mut s, &c).unwrap();

        registry.assign_grade(&mut s, enrollment.id(), Grade::B).unwrap();
        registry.assign_grade(&mut s, enrollment.id(), Grade::A).unwrap();

        assert_eq!(s.enrollments()[0].grade(), Some(Grade::A));
        assert_eq!(registry.enrollments_for_student(&s)[0].grade(), Some(Grade::A));
    }

    #[test]
    fn test_assign_grade_rejects_foreign_enrollment() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig::default());
        let mut owner = student(1);
        let mut other = student(2);
        let c = course("CS101", 3, Semester::Fall);
        let enrollment = registry.enroll(&mut owner, &c).unwrap();

        let err = registry
            .assign_grade(&mut other, enrollment.id(), Grade::S)
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidArgument { .. }));
        assert!(registry.all_enrollments()[0].grade().is_none());
    }

    #[test]
    fn test_returned_views_are_copies() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig::default());
        let mut s = student(1);
        registry.enroll(&mut s, &course("CS101", 3, Semester::Fall)).unwrap();

        let mut view = registry.enrollments_for_student(&s);
        view.clear();
        assert_eq!(registry.enrollments_for_student(&s).len(), 1);
    }

    #[test]
    fn test_oversized_course_hits_credit_limit() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig::default());
        let mut s = student(1);
        registry.enroll(&mut s, &course("CS101", 3, Semester::Fall)).unwrap();

        let err = registry
            .enroll(&mut s, &course("HUGE", u32::MAX, Semester::Fall))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::CreditLimitExceeded {
                current: 3,
                candidate: u32::MAX,
                limit: 24
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_semester_credits_saturate() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig::default());
        let mut s = student(1);
        registry
            .restore(&mut s, &course("BIG1", u32::MAX, Semester::Fall))
            .unwrap();
        registry
            .restore(&mut s, &course("BIG2", u32::MAX, Semester::Fall))
            .unwrap();

        assert_eq!(registry.semester_credits(&s, Semester::Fall), u32::MAX);
    }

    #[test]
    fn test_restore_skips_status_gate_but_not_duplicates() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig { max_credits: 3 });
        let mut s = student(1).with_status(StudentStatus::Inactive);
        let c = course("CS101", 3, Semester::Fall);

        registry.restore(&mut s, &c).unwrap();
        registry
            .restore(&mut s, &course("CS102", 3, Semester::Fall))
            .unwrap();
        assert!(matches!(
            registry.restore(&mut s, &c),
            Err(RegistryError::DuplicateEnrollment { .. })
        ));
        assert!(matches!(
            registry.enroll(&mut s, &course("CS103", 1, Semester::Spring)),
            Err(RegistryError::InactiveStudent { .. })
        ));
        assert_eq!(registry.len(), 2);
        assert_eq!(s.enrollments().len(), 2);
    }

    #[test]
    fn test_rejected_duplicate_leaves_ledger_unchanged() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig::default());
        let mut s = student(1);
        let c = course("CS101", 3, Semester::Fall);
        let first = registry.enroll(&mut s, &c).unwrap();

        assert!(registry.enroll(&mut s, &c).is_err());
        assert_eq!(registry.all_enrollments(), vec![first.clone()]);
        assert_eq!(s.enrollments(), &[first][..]);
    }

    #[test]
    fn test_drop_of_unknown_pair_leaves_ledger_unchanged() {
        let mut registry = EnrollmentRegistry::new(RegistryConfig::default());
        let mut s = student(1);
        let mut other = student(2);
        let held = course("CS101", 3, Semester::Fall);
        let not_held = course("CS102", 3, Semester::Fall);
        registry.enroll(&mut s, &held).unwrap();
        registry.enroll(&mut other, &not_held).unwrap();
        let before = registry.all_enrollments();

        assert!(!registry.drop_course(&mut s, &not_held));
        assert_eq!(registry.all_enrollments(), before);
        assert_eq!(s.enrollments().len(), 1);
    }

    #[test]
    fn test_allowed_credit_values() {
        let allowed = EnrollmentRegistry::allowed_credit_values();
        assert_eq!(allowed.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
        assert!(EnrollmentRegistry::is_credit_value_allowed(1));
        assert!(EnrollmentRegistry::is_credit_value_allowed(6));
        assert!(!EnrollmentRegistry::is_credit_value_allowed(0));
        assert!(!EnrollmentRegistry::is_credit_value_allowed(7));
    }
}
