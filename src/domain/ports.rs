use crate::domain::course::Course;
use crate::domain::model::Grade;
use crate::domain::student::Student;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_path(&self) -> &str;
    fn backup_path(&self) -> &str;
    fn max_credits(&self) -> u32;
}

/// A row of enrollment activity to replay through the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentRequest {
    pub line: u64,
    pub student_id: u64,
    pub course_code: String,
    pub grade: Option<Grade>,
}

/// Where students, courses and enrollment activity are loaded from and saved to.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn load_students(&self) -> Result<Vec<Student>>;
    async fn load_courses(&self) -> Result<Vec<Course>>;
    async fn load_enrollment_requests(&self) -> Result<Vec<EnrollmentRequest>>;
    async fn save(&self, students: &[Student], courses: &[Arc<Course>]) -> Result<()>;
}
