use std::sync::Arc;

use crate::domain::{Course, Profile, Semester, Student, StudentId};
use crate::utils::error::{CampusError, Result};

/// Registered students, unique by id and by registration number.
#[derive(Debug, Default)]
pub struct StudentDirectory {
    students: Vec<Student>,
}

impl StudentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, student: Student) -> Result<()> {
        if self.is_duplicate(&student) {
            return Err(CampusError::validation(format!(
                "Student {} (id {}) is already registered",
                student.reg_no(),
                student.student_id()
            )));
        }
        tracing::debug!(reg_no = student.reg_no(), "student registered");
        self.students.push(student);
        Ok(())
    }

    pub fn find_by_id(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.student_id() == id)
    }

    pub fn find_by_id_mut(&mut self, id: StudentId) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.student_id() == id)
    }

    pub fn find_by_reg_no(&self, reg_no: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.reg_no() == reg_no)
    }

    /// Looks a student up by numeric id first, then by registration number.
    pub fn lookup(&self, key: &str) -> Option<&Student> {
        key.parse::<u64>()
            .ok()
            .and_then(|id| self.find_by_id(StudentId(id)))
            .or_else(|| self.find_by_reg_no(key))
    }

    /// Copies name, email and status onto the stored student with the same id.
    /// Enrollments are owned by the registry and stay as stored. Returns false
    /// when absent.
    pub fn update(&mut self, student: &Student) -> bool {
        match self.find_by_id_mut(student.student_id()) {
            Some(stored) => {
                stored.set_full_name(student.full_name());
                stored.set_email(student.email());
                stored.set_status(student.status());
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: StudentId) -> bool {
        let before = self.students.len();
        self.students.retain(|s| s.student_id() != id);
        self.students.len() < before
    }

    pub fn all(&self) -> Vec<Student> {
        self.students.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    fn is_duplicate(&self, student: &Student) -> bool {
        self.students
            .iter()
            .any(|s| s.student_id() == student.student_id() || s.reg_no() == student.reg_no())
    }
}

/// Course offerings, unique by course code. Courses are shared with the ledger.
#[derive(Debug, Default)]
pub struct CourseCatalog {
    courses: Vec<Arc<Course>>,
}

impl CourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, course: Course) -> Result<Arc<Course>> {
        if self.find_by_code(course.code()).is_some() {
            return Err(CampusError::validation(format!(
                "Course {} already exists",
                course.code()
            )));
        }
        let course = Arc::new(course);
        self.courses.push(Arc::clone(&course));
        Ok(course)
    }

    pub fn find_by_code(&self, code: &str) -> Option<Arc<Course>> {
        self.courses.iter().find(|c| c.code() == code).cloned()
    }

    pub fn search<P>(&self, filter: P) -> Vec<Arc<Course>>
    where
        P: Fn(&Course) -> bool,
    {
        self.courses
            .iter()
            .filter(|c| filter(c.as_ref()))
            .cloned()
            .collect()
    }

    pub fn by_department(&self, department: &str) -> Vec<Arc<Course>> {
        self.search(|c| c.department().eq_ignore_ascii_case(department))
    }

    pub fn by_semester(&self, semester: Semester) -> Vec<Arc<Course>> {
        self.search(|c| c.semester() == semester)
    }

    pub fn by_instructor(&self, instructor_id: u64) -> Vec<Arc<Course>> {
        self.search(|c| c.instructor().is_some_and(|i| i.id == instructor_id))
    }

    pub fn with_min_credits(&self, min_credits: u32) -> Vec<Arc<Course>> {
        self.search(|c| c.credits() >= min_credits)
    }

    pub fn sorted_by_title(&self) -> Vec<Arc<Course>> {
        let mut sorted = self.courses.clone();
        sorted.sort_by_key(|c| c.title().to_lowercase());
        sorted
    }

    pub fn remove(&mut self, code: &str) -> bool {
        let before = self.courses.len();
        self.courses.retain(|c| c.code() != code);
        self.courses.len() < before
    }

    pub fn all(&self) -> Vec<Arc<Course>> {
        self.courses.clone()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn total_credits(&self) -> u32 {
        self.courses.iter().map(|c| c.credits()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::EnrollmentRegistry;
    use crate::domain::{CourseSpec, InstructorRef, StudentStatus};

    fn course(
        code: &str,
        title: &str,
        credits: u32,
        department: &str,
        semester: Semester,
    ) -> Course {
        Course::new(CourseSpec {
            code: code.to_string(),
            title: title.to_string(),
            credits,
            department: department.to_string(),
            semester,
            instructor: (code == "CS101").then(|| InstructorRef {
                id: 9,
                full_name: "Dr. Knuth".to_string(),
            }),
        })
        .unwrap()
    }

    fn catalog() -> CourseCatalog {
        let mut catalog = CourseCatalog::new();
        catalog
            .add(course("CS101", "programming", 4, "CS", Semester::Fall))
            .unwrap();
        catalog
            .add(course("MA101", "Calculus", 3, "Math", Semester::Spring))
            .unwrap();
        catalog
            .add(course("CS201", "Algorithms", 2, "cs", Semester::Spring))
            .unwrap();
        catalog
    }

    #[test]
    fn test_directory_rejects_duplicate_id_or_reg_no() {
        let mut directory = StudentDirectory::new();
        directory
            .add(Student::new(1, "Ada", "ada@campus.edu", "REG001"))
            .unwrap();

        assert!(directory
            .add(Student::new(1, "Other", "o@campus.edu", "REG999"))
            .is_err());
        assert!(directory
            .add(Student::new(2, "Other", "o@campus.edu", "REG001"))
            .is_err());
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_directory_lookup_update_remove() {
        let mut directory = StudentDirectory::new();
        directory
            .add(Student::new(1, "Ada", "ada@campus.edu", "REG001"))
            .unwrap();

        assert!(directory.lookup("1").is_some());
        assert!(directory.lookup("REG001").is_some());
        assert!(directory.lookup("REG404").is_none());

        let mut changed = directory.find_by_id(StudentId(1)).cloned().unwrap();
        changed.set_email("ada@new.edu");
        assert!(directory.update(&changed));
        assert_eq!(
            directory.find_by_reg_no("REG001").unwrap().email(),
            "ada@new.edu"
        );

        assert!(directory.remove(StudentId(1)));
        assert!(!directory.remove(StudentId(1)));
        assert!(directory.is_empty());
    }

    #[test]
    fn test_update_keeps_registry_enrollments() {
        let mut registry = EnrollmentRegistry::default();
        let mut directory = StudentDirectory::new();
        directory
            .add(Student::new(1, "Ada", "ada@campus.edu", "REG001"))
            .unwrap();
        let stale = directory.find_by_id(StudentId(1)).cloned().unwrap();

        let cs101 = Arc::new(course("CS101", "Programming", 3, "CS", Semester::Fall));
        let stored = directory.find_by_id_mut(StudentId(1)).unwrap();
        registry.enroll(stored, &cs101).unwrap();

        let mut edited = stale;
        edited.set_full_name("Ada Lovelace");
        edited.set_status(StudentStatus::Inactive);
        assert!(directory.update(&edited));

        let stored = directory.find_by_id(StudentId(1)).unwrap();
        assert_eq!(stored.full_name(), "Ada Lovelace");
        assert!(!stored.is_active());
        assert_eq!(stored.enrollments().len(), 1);
        assert_eq!(registry.enrollments_for_student(stored).len(), 1);
    }

    #[test]
    fn test_catalog_rejects_duplicate_code() {
        let mut catalog = catalog();
        assert!(catalog
            .add(course("CS101", "Again", 1, "CS", Semester::Fall))
            .is_err());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_catalog_queries() {
        let catalog = catalog();

        assert_eq!(catalog.by_department("cs").len(), 2);
        assert_eq!(catalog.by_semester(Semester::Spring).len(), 2);
        assert_eq!(catalog.by_instructor(9).len(), 1);
        assert_eq!(catalog.with_min_credits(3).len(), 2);
        assert_eq!(catalog.total_credits(), 9);

        let titles: Vec<String> = catalog
            .sorted_by_title()
            .iter()
            .map(|c| c.title().to_string())
            .collect();
        assert_eq!(titles, vec!["Algorithms", "Calculus", "programming"]);
    }

    #[test]
    fn test_catalog_remove() {
        let mut catalog = catalog();
        assert!(catalog.remove("MA101"));
        assert!(catalog.find_by_code("MA101").is_none());
        assert!(!catalog.remove("MA101"));
    }
}
