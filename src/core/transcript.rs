use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::domain::{Enrollment, Grade, Profile, Semester, Student};

const DATE_FORMAT: &str = "%d-%m-%Y";
const IN_PROGRESS: &str = "IP";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CreditTotals {
    enrolled: u32,
    graded: u32,
    weighted_points: f64,
}

impl CreditTotals {
    fn over(enrollments: &[Enrollment]) -> Self {
        enrollments.iter().fold(Self::default(), |mut acc, e| {
            let credits = e.course().credits();
            acc.enrolled = acc.enrolled.saturating_add(credits);
            if let Some(grade) = e.grade() {
                acc.graded = acc.graded.saturating_add(credits);
                acc.weighted_points += grade.grade_point() * f64::from(credits);
            }
            acc
        })
    }

    fn gpa(&self) -> f64 {
        if self.graded == 0 {
            0.0
        } else {
            self.weighted_points / f64::from(self.graded)
        }
    }
}

/// Credit-weighted grade-point average over the student's graded enrollments.
/// Ungraded enrollments are ignored; with nothing graded the result is `0.0`.
pub fn gpa(student: &Student) -> f64 {
    CreditTotals::over(student.enrollments()).gpa()
}

pub fn transcript(student: &Student) -> Transcript {
    Transcript::generated_on(student, Local::now().date_naive())
}

pub fn summary(student: &Student) -> TranscriptSummary {
    TranscriptSummary {
        full_name: student.full_name().to_string(),
        reg_no: student.reg_no().to_string(),
        course_count: student.enrollments().len(),
        gpa: gpa(student),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptRow {
    pub course_code: String,
    pub title: String,
    pub credits: u32,
    pub semester: Semester,
    pub grade: Option<Grade>,
}

impl From<&Enrollment> for TranscriptRow {
    fn from(e: &Enrollment) -> Self {
        Self {
            course_code: e.course().code().to_string(),
            title: e.course().title().to_string(),
            credits: e.course().credits(),
            semester: e.course().semester(),
            grade: e.grade(),
        }
    }
}

/// Full grade report for one student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub profile: String,
    pub registration_date: NaiveDate,
    pub generated_on: NaiveDate,
    pub rows: Vec<TranscriptRow>,
    pub total_credits: u32,
    pub graded_credits: u32,
    pub gpa: f64,
}

impl Transcript {
    pub fn generated_on(student: &Student, date: NaiveDate) -> Self {
        let totals = CreditTotals::over(student.enrollments());
        Self {
            profile: student.profile(),
            registration_date: student.registration_date(),
            generated_on: date,
            rows: student.enrollments().iter().map(TranscriptRow::from).collect(),
            total_credits: totals.enrolled,
            graded_credits: totals.graded,
            gpa: totals.gpa(),
        }
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let banner = "=".repeat(60);
        let rule = "-".repeat(30);

        writeln!(f, "{}", banner)?;
        writeln!(f, "OFFICIAL TRANSCRIPT")?;
        writeln!(f, "Campus Course Registration Management System")?;
        writeln!(f, "{}", banner)?;
        writeln!(f)?;

        writeln!(f, "STUDENT INFORMATION:")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Student Profile: {}", self.profile)?;
        writeln!(
            f,
            "Registration Date: {}",
            self.registration_date.format(DATE_FORMAT)
        )?;
        writeln!(f, "Generated On: {}", self.generated_on.format(DATE_FORMAT))?;
        writeln!(f)?;

        writeln!(f, "ENROLLED COURSES:")?;
        writeln!(f, "{}", rule)?;

        if self.rows.is_empty() {
            writeln!(f, "No courses enrolled.")?;
        } else {
            writeln!(
                f,
                "{:<10} {:<30} {:<8} {:<10} {:<5}",
                "CODE", "TITLE", "CREDITS", "SEMESTER", "GRADE"
            )?;
            writeln!(f, "{}", "-".repeat(70))?;
            for row in &self.rows {
                let grade = row
                    .grade
                    .map(|g| g.letter())
                    .unwrap_or(IN_PROGRESS);
                writeln!(
                    f,
                    "{:<10} {:<30} {:<8} {:<10} {:<5}",
                    row.course_code,
                    row.title,
                    row.credits,
                    row.semester.as_str(),
                    grade
                )?;
            }
            writeln!(f, "{}", "-".repeat(70))?;
            writeln!(f, "Total Credits Enrolled: {}", self.total_credits)?;
            writeln!(f, "Graded Credits: {}", self.graded_credits)?;
            writeln!(f, "Cumulative GPA: {:.2}", self.gpa)?;
        }

        writeln!(f)?;
        writeln!(f, "{}", banner)?;
        writeln!(f, "End of Transcript")?;
        writeln!(f, "{}", banner)
    }
}

/// Condensed view derived from the same totals as [`gpa`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptSummary {
    pub full_name: String,
    pub reg_no: String,
    pub course_count: usize,
    pub gpa: f64,
}

impl fmt::Display for TranscriptSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TRANSCRIPT SUMMARY")?;
        writeln!(f, "{}", "-".repeat(20))?;
        writeln!(f, "Student: {}", self.full_name)?;
        writeln!(f, "Reg No: {}", self.reg_no)?;
        writeln!(f, "Total Courses: {}", self.course_count)?;
        writeln!(f, "GPA: {:.2}", self.gpa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::EnrollmentRegistry;
    use crate::domain::{Course, CourseSpec};
    use std::sync::Arc;

    fn course(code: &str, title: &str, credits: u32) -> Arc<Course> {
        Arc::new(
            Course::new(CourseSpec {
                code: code.to_string(),
                title: title.to_string(),
                credits,
                department: "CS".to_string(),
                semester: Semester::Spring,
                instructor: None,
            })
            .unwrap(),
        )
    }

    #[test]
    fn test_empty_transcript() {
        let student = Student::new(1, "Grace Hopper", "grace@campus.edu", "REG001");
        let report = Transcript::generated_on(&student, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        let text = report.to_string();

        assert!(text.contains("No courses enrolled."));
        assert!(text.contains("Generated On: 09-03-2024"));
        assert!(!text.contains("Cumulative GPA"));
        assert_eq!(gpa(&student), 0.0);
    }

    #[test]
    fn test_transcript_rows_and_totals() {
        let mut registry = EnrollmentRegistry::default();
        let mut student = Student::new(1, "Grace Hopper", "grace@campus.edu", "REG001");
        let compilers = course("CS301", "Compilers", 4);
        let seminar = course("CS399", "Seminar", 2);
        registry.enroll(&mut student, &compilers).unwrap();
        registry.enroll(&mut student, &seminar).unwrap();
        registry
            .assign_grade_for(&mut student, "CS301", Grade::S)
            .unwrap();

        let report = transcript(&student);
        assert_eq!(report.total_credits, 6);
        assert_eq!(report.graded_credits, 4);
        assert_eq!(report.gpa, 10.0);

        let text = report.to_string();
        assert!(text.contains(&format!(
            "{:<10} {:<30} {:<8} {:<10} {:<5}",
            "CS399", "Seminar", 2, "SPRING", "IP"
        )));
        assert!(text.contains("Total Credits Enrolled: 6"));
        assert!(text.contains("Graded Credits: 4"));
        assert!(text.contains("Cumulative GPA: 10.00"));
    }

    #[test]
    fn test_totals_saturate_on_oversized_courses() {
        let mut registry = EnrollmentRegistry::default();
        let mut student = Student::new(3, "Edsger Dijkstra", "ewd@campus.edu", "REG003");
        registry
            .restore(&mut student, &course("BIG1", "Marathon", u32::MAX))
            .unwrap();
        registry
            .restore(&mut student, &course("BIG2", "Ultra", u32::MAX))
            .unwrap();
        registry
            .assign_grade_for(&mut student, "BIG1", Grade::A)
            .unwrap();

        let report = transcript(&student);
        assert_eq!(report.total_credits, u32::MAX);
        assert_eq!(report.graded_credits, u32::MAX);
        assert_eq!(report.gpa, 9.0);
    }

    #[test]
    fn test_summary_matches_gpa() {
        let mut registry = EnrollmentRegistry::default();
        let mut student = Student::new(2, "Alan Turing", "alan@campus.edu", "REG002");
        registry.enroll(&mut student, &course("MA101", "Calculus", 3)).unwrap();
        registry
            .assign_grade_for(&mut student, "MA101", Grade::C)
            .unwrap();

        let s = summary(&student);
        assert_eq!(s.course_count, 1);
        assert_eq!(s.gpa, gpa(&student));
        assert_eq!(
            s.to_string(),
            "TRANSCRIPT SUMMARY\n--------------------\nStudent: Alan Turing\nReg No: REG002\nTotal Courses: 1\nGPA: 7.00\n"
        );
    }
}
