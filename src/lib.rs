pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AppConfig;

pub use adapters::{BackupService, CsvDataStore, LocalStorage};
pub use core::transcript::{gpa, summary, transcript, Transcript, TranscriptSummary};
pub use core::{CampusEngine, EnrollmentRegistry, RegistryConfig};
pub use domain::{Course, CourseSpec, Enrollment, Grade, Semester, Student, StudentStatus};
pub use utils::error::{CampusError, RegistryError, Result};
