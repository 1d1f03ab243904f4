use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::CampusError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u64);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ledger-assigned key of an enrollment; unique for the lifetime of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentId(pub u64);

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Letter grade with its fixed grade-point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub const ALL: [Grade; 6] = [Grade::S, Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    pub fn grade_point(self) -> f64 {
        match self {
            Grade::S => 10.0,
            Grade::A => 9.0,
            Grade::B => 8.0,
            Grade::C => 7.0,
            Grade::D => 6.0,
            Grade::F => 0.0,
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

impl FromStr for Grade {
    type Err = CampusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Grade::ALL
            .into_iter()
            .find(|g| g.letter().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CampusError::validation(format!("Unknown grade: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Semester {
    Spring,
    Summer,
    Fall,
}

impl Semester {
    pub const ALL: [Semester; 3] = [Semester::Spring, Semester::Summer, Semester::Fall];

    pub fn as_str(self) -> &'static str {
        match self {
            Semester::Spring => "SPRING",
            Semester::Summer => "SUMMER",
            Semester::Fall => "FALL",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Semester {
    type Err = CampusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Semester::ALL
            .into_iter()
            .find(|sem| sem.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CampusError::validation(format!("Unknown semester: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
}

impl StudentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StudentStatus::Active => "ACTIVE",
            StudentStatus::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentStatus {
    type Err = CampusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(StudentStatus::Active),
            "INACTIVE" => Ok(StudentStatus::Inactive),
            _ => Err(CampusError::validation(format!("Unknown student status: {}", s))),
        }
    }
}

/// Anything with a person-like identity that can describe itself.
pub trait Profile {
    fn id(&self) -> u64;
    fn full_name(&self) -> &str;
    fn email(&self) -> &str;

    /// Role-specific profile line, e.g. for transcript headers.
    fn profile(&self) -> String;

    fn identity_line(&self) -> String {
        format!(
            "ID: {}, Name: {}, Email: {}",
            self.id(),
            self.full_name(),
            self.email()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub department: String,
}

impl Instructor {
    pub fn new(
        id: u64,
        full_name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
            department: department.into(),
        }
    }

    /// Non-owning handle a course keeps for this instructor.
    pub fn to_ref(&self) -> InstructorRef {
        InstructorRef {
            id: self.id,
            full_name: self.full_name.clone(),
        }
    }
}

impl Profile for Instructor {
    fn id(&self) -> u64 {
        self.id
    }

    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn profile(&self) -> String {
        format!(
            "Instructor Profile - {}, Department: {}",
            self.identity_line(),
            self.department
        )
    }
}

/// Reference from a course to its instructor. Courses do not own instructors,
/// so only the identifying fields are kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstructorRef {
    pub id: u64,
    pub full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_points() {
        assert_eq!(Grade::S.grade_point(), 10.0);
        assert_eq!(Grade::A.grade_point(), 9.0);
        assert_eq!(Grade::B.grade_point(), 8.0);
        assert_eq!(Grade::C.grade_point(), 7.0);
        assert_eq!(Grade::D.grade_point(), 6.0);
        assert_eq!(Grade::F.grade_point(), 0.0);
    }

    #[test]
    fn test_parse_enums_case_insensitive() {
        assert_eq!("b".parse::<Grade>().unwrap(), Grade::B);
        assert_eq!("fall".parse::<Semester>().unwrap(), Semester::Fall);
        assert_eq!(" Inactive ".parse::<StudentStatus>().unwrap(), StudentStatus::Inactive);
        assert!("E".parse::<Grade>().is_err());
        assert!("WINTER".parse::<Semester>().is_err());
    }

    #[test]
    fn test_instructor_profile() {
        let instructor = Instructor::new(7, "Ada Lovelace", "ada@campus.edu", "CS");
        assert_eq!(
            instructor.profile(),
            "Instructor Profile - ID: 7, Name: Ada Lovelace, Email: ada@campus.edu, Department: CS"
        );
        assert_eq!(instructor.to_ref().id, 7);
    }
}
