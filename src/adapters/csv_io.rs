//! CSV import/export of students, courses and enrollment activity.
//!
//! Malformed rows are reported as [`CampusError::ImportError`] with the file
//! and line, and never reach the registry.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;

use crate::core::{RecordSource, Storage};
use crate::domain::ports::EnrollmentRequest;
use crate::domain::{
    Course, CourseSpec, Grade, InstructorRef, Profile, Semester, Student, StudentStatus,
};
use crate::utils::error::{CampusError, Result};

pub const STUDENT_FILE: &str = "students.csv";
pub const COURSE_FILE: &str = "courses.csv";
pub const ENROLLMENT_FILE: &str = "enrollments.csv";

const DATE_FORMAT: &str = "%Y-%m-%d";
const NO_INSTRUCTOR: &str = "TBD";

#[derive(Debug, Serialize, Deserialize)]
struct StudentRecord {
    #[serde(rename = "ID")]
    id: u64,
    #[serde(rename = "FullName")]
    full_name: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "RegNo")]
    reg_no: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "RegistrationDate")]
    registration_date: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CourseRecord {
    #[serde(rename = "CourseCode")]
    code: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Credits")]
    credits: u32,
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Semester")]
    semester: String,
    #[serde(rename = "InstructorID")]
    instructor_id: u64,
    #[serde(rename = "InstructorName")]
    instructor_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct EnrollmentRecord {
    #[serde(rename = "StudentID")]
    student_id: u64,
    #[serde(rename = "CourseCode")]
    course_code: String,
    #[serde(rename = "Grade")]
    grade: Option<String>,
}

impl TryFrom<StudentRecord> for Student {
    type Error = CampusError;

    fn try_from(record: StudentRecord) -> Result<Self> {
        let status = record.status.parse::<StudentStatus>()?;
        let registration_date = NaiveDate::parse_from_str(&record.registration_date, DATE_FORMAT)
            .map_err(|e| {
                CampusError::validation(format!(
                    "bad registration date '{}': {}",
                    record.registration_date, e
                ))
            })?;

        Ok(
            Student::new(record.id, record.full_name, record.email, record.reg_no)
                .with_status(status)
                .with_registration_date(registration_date),
        )
    }
}

impl TryFrom<CourseRecord> for Course {
    type Error = CampusError;

    fn try_from(record: CourseRecord) -> Result<Self> {
        let instructor = (record.instructor_id > 0).then(|| InstructorRef {
            id: record.instructor_id,
            full_name: record.instructor_name,
        });

        Course::new(CourseSpec {
            code: record.code,
            title: record.title,
            credits: record.credits,
            department: record.department,
            semester: record.semester.parse::<Semester>()?,
            instructor,
        })
    }
}

impl From<&Student> for StudentRecord {
    fn from(student: &Student) -> Self {
        Self {
            id: student.student_id().0,
            full_name: student.full_name().to_string(),
            email: student.email().to_string(),
            reg_no: student.reg_no().to_string(),
            status: student.status().to_string(),
            registration_date: student.registration_date().format(DATE_FORMAT).to_string(),
        }
    }
}

impl From<&Course> for CourseRecord {
    fn from(course: &Course) -> Self {
        Self {
            code: course.code().to_string(),
            title: course.title().to_string(),
            credits: course.credits(),
            department: course.department().to_string(),
            semester: course.semester().to_string(),
            instructor_id: course.instructor().map(|i| i.id).unwrap_or(0),
            instructor_name: course
                .instructor()
                .map(|i| i.full_name.clone())
                .unwrap_or_else(|| NO_INSTRUCTOR.to_string()),
        }
    }
}

/// Reads every data row of `data`, converting each with `convert`, which also
/// receives the 1-based line number of the row.
fn parse_rows<R, T, F>(file: &str, data: &[u8], convert: F) -> Result<Vec<T>>
where
    R: DeserializeOwned,
    F: Fn(R, u64) -> Result<T>,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| CampusError::ImportError {
            file: file.to_string(),
            line: e.position().map(|p| p.line()).unwrap_or(0),
            message: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let import_error = |message: String| CampusError::ImportError {
            file: file.to_string(),
            line,
            message,
        };

        let raw: R = record
            .deserialize(Some(&headers))
            .map_err(|e| import_error(e.to_string()))?;
        rows.push(convert(raw, line).map_err(|e| import_error(e.to_string()))?);
    }

    tracing::debug!(file, rows = rows.len(), "parsed csv");
    Ok(rows)
}

pub fn parse_students(data: &[u8]) -> Result<Vec<Student>> {
    parse_rows(STUDENT_FILE, data, |record: StudentRecord, _| {
        Student::try_from(record)
    })
}

pub fn parse_courses(data: &[u8]) -> Result<Vec<Course>> {
    parse_rows(COURSE_FILE, data, |record: CourseRecord, _| {
        Course::try_from(record)
    })
}

pub fn parse_enrollment_requests(data: &[u8]) -> Result<Vec<EnrollmentRequest>> {
    parse_rows(ENROLLMENT_FILE, data, |record: EnrollmentRecord, line| {
        let grade = match record.grade.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(text.parse::<Grade>()?),
        };
        Ok(EnrollmentRequest {
            line,
            student_id: record.student_id,
            course_code: record.course_code,
            grade,
        })
    })
}

fn write_rows<R: Serialize>(
    records: impl IntoIterator<Item = R>,
    header: &[&str],
) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| CampusError::IoError(e.into_error()))
}

pub fn write_students(students: &[Student]) -> Result<Vec<u8>> {
    write_rows(
        students.iter().map(StudentRecord::from),
        &["ID", "FullName", "Email", "RegNo", "Status", "RegistrationDate"],
    )
}

pub fn write_courses(courses: &[Arc<Course>]) -> Result<Vec<u8>> {
    write_rows(
        courses.iter().map(|c| CourseRecord::from(c.as_ref())),
        &[
            "CourseCode",
            "Title",
            "Credits",
            "Department",
            "Semester",
            "InstructorID",
            "InstructorName",
        ],
    )
}

/// One row per enrollment the students hold, with the grade when assigned.
pub fn write_enrollments(students: &[Student]) -> Result<Vec<u8>> {
    write_rows(
        students.iter().flat_map(|s| {
            s.enrollments().iter().map(|e| EnrollmentRecord {
                student_id: e.student_id().0,
                course_code: e.course().code().to_string(),
                grade: e.grade().map(|g| g.to_string()),
            })
        }),
        &["StudentID", "CourseCode", "Grade"],
    )
}

/// CSV files in a data directory reached through a [`Storage`] backend.
#[derive(Debug, Clone)]
pub struct CsvDataStore<S: Storage> {
    storage: S,
}

impl<S: Storage> CsvDataStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[async_trait]
impl<S: Storage> RecordSource for CsvDataStore<S> {
    async fn load_students(&self) -> Result<Vec<Student>> {
        let data = self.storage.read_file(STUDENT_FILE).await?;
        parse_students(&data)
    }

    async fn load_courses(&self) -> Result<Vec<Course>> {
        let data = self.storage.read_file(COURSE_FILE).await?;
        parse_courses(&data)
    }

    async fn load_enrollment_requests(&self) -> Result<Vec<EnrollmentRequest>> {
        if !self.storage.exists(ENROLLMENT_FILE).await {
            tracing::debug!("no {} present, nothing to replay", ENROLLMENT_FILE);
            return Ok(Vec::new());
        }
        let data = self.storage.read_file(ENROLLMENT_FILE).await?;
        parse_enrollment_requests(&data)
    }

    async fn save(&self, students: &[Student], courses: &[Arc<Course>]) -> Result<()> {
        let student_csv = write_students(students)?;
        let course_csv = write_courses(courses)?;
        let enrollment_csv = write_enrollments(students)?;

        self.storage.write_file(STUDENT_FILE, &student_csv).await?;
        self.storage.write_file(COURSE_FILE, &course_csv).await?;
        self.storage
            .write_file(ENROLLMENT_FILE, &enrollment_csv)
            .await?;

        tracing::info!(
            students = students.len(),
            courses = courses.len(),
            "data exported"
        );
        Ok(())
    }
}
