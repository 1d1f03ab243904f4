pub mod catalog;
pub mod engine;
pub mod registry;
pub mod transcript;

pub use crate::domain::ports::{ConfigProvider, RecordSource, Storage};
pub use crate::utils::error::Result;
pub use catalog::{CourseCatalog, StudentDirectory};
pub use engine::{CampusEngine, ReplayOutcome, ReplayReport};
pub use registry::{EnrollmentRegistry, RegistryConfig, RegistryResult};
