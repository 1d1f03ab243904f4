use std::sync::Arc;

use crate::core::catalog::{CourseCatalog, StudentDirectory};
use crate::core::registry::{EnrollmentRegistry, RegistryConfig};
use crate::core::transcript::{self, Transcript, TranscriptSummary};
use crate::core::RecordSource;
use crate::domain::ports::EnrollmentRequest;
use crate::domain::{Course, Enrollment, Grade, Student, StudentId};
use crate::utils::error::{CampusError, Result};

/// Outcome of replaying one enrollment row.
#[derive(Debug)]
pub enum ReplayOutcome {
    Enrolled {
        line: u64,
        enrollment: Enrollment,
    },
    Rejected {
        line: u64,
        error: CampusError,
    },
}

#[derive(Debug, Default)]
pub struct ReplayReport {
    pub outcomes: Vec<ReplayOutcome>,
}

impl ReplayReport {
    pub fn rejections(&self) -> impl Iterator<Item = (u64, &CampusError)> {
        self.outcomes.iter().filter_map(|o| match o {
            ReplayOutcome::Rejected { line, error } => Some((*line, error)),
            ReplayOutcome::Enrolled { .. } => None,
        })
    }

    /// Fails when any row was rejected, listing each by line.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.rejected() == 0 {
            return Ok(());
        }
        let lines: Vec<String> = self
            .rejections()
            .map(|(line, error)| format!("line {}: {}", line, error))
            .collect();
        Err(CampusError::validation(format!(
            "{} enrollment row(s) rejected: {}",
            lines.len(),
            lines.join("; ")
        )))
    }

    pub fn accepted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ReplayOutcome::Enrolled { .. }))
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes.len() - self.accepted()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplayMode {
    /// New registrations; every rule applies.
    Activity,
    /// Enrollments read back from saved history.
    History,
}

/// Ties the student directory, course catalog and enrollment registry together
/// for callers that work with keys instead of entity references.
#[derive(Debug)]
pub struct CampusEngine {
    students: StudentDirectory,
    courses: CourseCatalog,
    registry: EnrollmentRegistry,
}

impl CampusEngine {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            students: StudentDirectory::new(),
            courses: CourseCatalog::new(),
            registry: EnrollmentRegistry::new(config),
        }
    }

    /// Builds an engine from the students and courses of `source`. Enrollment
    /// activity is not replayed here; see [`CampusEngine::replay`].
    pub async fn load<R: RecordSource + ?Sized>(
        source: &R,
        config: RegistryConfig,
    ) -> Result<Self> {
        let mut engine = Self::new(config);

        for student in source.load_students().await? {
            engine.students.add(student)?;
        }
        for course in source.load_courses().await? {
            engine.courses.add(course)?;
        }

        tracing::info!(
            students = engine.students.len(),
            courses = engine.courses.len(),
            max_credits = config.max_credits,
            "campus data loaded"
        );
        Ok(engine)
    }

    pub fn students(&self) -> &StudentDirectory {
        &self.students
    }

    pub fn students_mut(&mut self) -> &mut StudentDirectory {
        &mut self.students
    }

    pub fn courses(&self) -> &CourseCatalog {
        &self.courses
    }

    pub fn courses_mut(&mut self) -> &mut CourseCatalog {
        &mut self.courses
    }

    pub fn registry(&self) -> &EnrollmentRegistry {
        &self.registry
    }

    pub fn student(&self, key: &str) -> Result<&Student> {
        self.students
            .lookup(key)
            .ok_or_else(|| CampusError::not_found("student", key))
    }

    fn course(&self, code: &str) -> Result<Arc<Course>> {
        self.courses
            .find_by_code(code)
            .ok_or_else(|| CampusError::not_found("course", code))
    }

    /// Resolves an id or registration number to the student's id.
    pub fn student_id(&self, key: &str) -> Result<StudentId> {
        self.student(key).map(Student::student_id)
    }

    pub fn enroll(&mut self, student_id: StudentId, course_code: &str) -> Result<Enrollment> {
        self.admit(student_id, course_code, ReplayMode::Activity)
    }

    fn admit(
        &mut self,
        student_id: StudentId,
        course_code: &str,
        mode: ReplayMode,
    ) -> Result<Enrollment> {
        let course = self.course(course_code)?;
        let student = self
            .students
            .find_by_id_mut(student_id)
            .ok_or_else(|| CampusError::not_found("student", student_id.to_string()))?;
        let enrollment = match mode {
            ReplayMode::Activity => self.registry.enroll(student, &course)?,
            ReplayMode::History => self.registry.restore(student, &course)?,
        };
        Ok(enrollment)
    }

    pub fn drop_course(&mut self, student_id: StudentId, course_code: &str) -> Result<bool> {
        let course = self.course(course_code)?;
        let student = self
            .students
            .find_by_id_mut(student_id)
            .ok_or_else(|| CampusError::not_found("student", student_id.to_string()))?;
        Ok(self.registry.drop_course(student, &course))
    }

    pub fn assign_grade(
        &mut self,
        student_id: StudentId,
        course_code: &str,
        grade: Grade,
    ) -> Result<()> {
        let student = self
            .students
            .find_by_id_mut(student_id)
            .ok_or_else(|| CampusError::not_found("student", student_id.to_string()))?;
        Ok(self.registry.assign_grade_for(student, course_code, grade)?)
    }

    /// Applies each request in order as a new registration. A rejected row is
    /// recorded and the replay continues with the next one.
    pub fn replay(&mut self, requests: Vec<EnrollmentRequest>) -> ReplayReport {
        self.apply_all(requests, ReplayMode::Activity)
    }

    /// Rebuilds saved enrollment history. Unlike [`CampusEngine::replay`] this
    /// keeps the courses and grades of students who have since become
    /// inactive, and does not re-check the credit limit. Duplicate rows and
    /// unknown keys are still rejected.
    pub fn restore_history(&mut self, requests: Vec<EnrollmentRequest>) -> ReplayReport {
        self.apply_all(requests, ReplayMode::History)
    }

    fn apply_all(&mut self, requests: Vec<EnrollmentRequest>, mode: ReplayMode) -> ReplayReport {
        let mut report = ReplayReport::default();

        for request in requests {
            let outcome = self.replay_one(&request, mode);

            match outcome {
                Ok(enrollment) => report.outcomes.push(ReplayOutcome::Enrolled {
                    line: request.line,
                    enrollment,
                }),
                Err(error) => {
                    tracing::warn!(line = request.line, %error, "enrollment row rejected");
                    report.outcomes.push(ReplayOutcome::Rejected {
                        line: request.line,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            accepted = report.accepted(),
            rejected = report.rejected(),
            history = mode == ReplayMode::History,
            "enrollment replay finished"
        );
        report
    }

    fn replay_one(&mut self, request: &EnrollmentRequest, mode: ReplayMode) -> Result<Enrollment> {
        let student_id = StudentId(request.student_id);
        let enrollment = self.admit(student_id, &request.course_code, mode)?;
        let Some(grade) = request.grade else {
            return Ok(enrollment);
        };

        self.assign_grade(student_id, &request.course_code, grade)?;
        self.registry
            .get(enrollment.id())
            .cloned()
            .ok_or_else(|| CampusError::not_found("enrollment", enrollment.id().to_string()))
    }

    pub fn enrollments_for_student(&self, key: &str) -> Result<Vec<Enrollment>> {
        Ok(self.registry.enrollments_for_student(self.student(key)?))
    }

    pub fn enrollments_for_course(&self, code: &str) -> Result<Vec<Enrollment>> {
        Ok(self.registry.enrollments_for_course(&*self.course(code)?))
    }

    pub fn gpa(&self, key: &str) -> Result<f64> {
        Ok(transcript::gpa(self.student(key)?))
    }

    pub fn transcript(&self, key: &str) -> Result<Transcript> {
        Ok(transcript::transcript(self.student(key)?))
    }

    pub fn summary(&self, key: &str) -> Result<TranscriptSummary> {
        Ok(transcript::summary(self.student(key)?))
    }

    pub async fn save<R: RecordSource + ?Sized>(&self, target: &R) -> Result<()> {
        target
            .save(&self.students.all(), &self.courses.all())
            .await
    }
}
