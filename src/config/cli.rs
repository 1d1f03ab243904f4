use crate::config::toml_config::AppConfig;
use crate::domain::Grade;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "campus")]
#[command(about = "Course registration: enrollment rules, transcripts and GPA")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the data directory from the configuration
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Override the per-semester credit limit from the configuration
    #[arg(long, global = true)]
    pub max_credits: Option<u32>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check imported students and courses for structural problems
    Validate,
    /// Enroll one student, or replay enrollments.csv as new registrations
    Enroll(EnrollArgs),
    /// Drop a student's enrollment in a course
    Drop(PairArgs),
    /// Assign or replace a grade
    Grade {
        #[command(flatten)]
        pair: PairArgs,
        #[arg(short, long, value_parser = parse_grade)]
        grade: Grade,
    },
    /// List the enrollments of a student or of a course
    Enrollments(EnrollmentQuery),
    /// Print a student's transcript
    Transcript(StudentArgs),
    /// Print a student's GPA
    Gpa(StudentArgs),
    /// List courses, optionally filtered
    Courses {
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        semester: Option<String>,
    },
    /// Write students and courses as CSV into another directory
    Export {
        #[arg(long)]
        out: PathBuf,
    },
    /// Manage zip backups of the data directory
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },
    /// Show the allowed credit values, or check one
    Credits { value: Option<u32> },
}

#[derive(Debug, Clone, Args)]
pub struct StudentArgs {
    /// Student id or registration number
    #[arg(short, long)]
    pub student: String,

    /// Print the condensed summary instead of the full report
    #[arg(long)]
    pub summary: bool,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct EnrollArgs {
    /// Student id or registration number; without it every row is replayed
    #[arg(long, requires = "course")]
    pub student: Option<String>,

    #[arg(long, requires = "student")]
    pub course: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct PairArgs {
    /// Student id or registration number
    #[arg(short, long)]
    pub student: String,

    #[arg(long)]
    pub course: String,
}

#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct EnrollmentQuery {
    #[arg(short, long)]
    pub student: Option<String>,

    #[arg(long)]
    pub course: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum BackupAction {
    Create,
    List,
    Cleanup {
        /// Archives to keep; falls back to backup.keep, then 5
        #[arg(long)]
        keep: Option<usize>,
    },
    Size,
}

fn parse_grade(value: &str) -> std::result::Result<Grade, String> {
    value.parse::<Grade>().map_err(|e| e.to_string())
}

impl CliConfig {
    /// Loads the configuration file (or defaults) and applies flag overrides.
    pub fn resolve_app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        if let Some(data_dir) = &self.data_dir {
            config.paths.data = data_dir.clone();
        }
        if let Some(max_credits) = self.max_credits {
            config.registry.max_credits = max_credits;
        }
        Ok(config)
    }
}
