// Domain layer: entities and ports. No I/O here.

pub mod course;
pub mod enrollment;
pub mod model;
pub mod ports;
pub mod student;

pub use course::{Course, CourseSpec};
pub use enrollment::Enrollment;
pub use model::{
    EnrollmentId, Grade, Instructor, InstructorRef, Profile, Semester, StudentId, StudentStatus,
};
pub use student::Student;
