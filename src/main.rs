use campus_registry::config::cli::{BackupAction, Command, EnrollArgs, StudentArgs};
use campus_registry::core::{ConfigProvider, RecordSource, ReplayOutcome};
use campus_registry::domain::{Profile, Semester};
use campus_registry::utils::error::ErrorSeverity;
use campus_registry::utils::{logger, validation::Validate};
use campus_registry::{
    AppConfig, BackupService, CampusEngine, CampusError, CliConfig, CsvDataStore,
    EnrollmentRegistry, LocalStorage, RegistryConfig, Result,
};
use clap::Parser;

const DEFAULT_BACKUP_KEEP: usize = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose, cli.log_format);

    tracing::info!("Starting campus CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(cli: &CliConfig) -> Result<()> {
    let config = cli.resolve_app_config()?;
    config.validate()?;

    match &cli.command {
        Command::Credits { value } => {
            print_credit_values(*value);
            Ok(())
        }
        Command::Backup { action } => run_backup(&config, action),
        command => {
            let store = CsvDataStore::new(LocalStorage::new(config.data_path()));
            let mut engine =
                CampusEngine::load(&store, RegistryConfig::from_provider(&config)).await?;

            match command {
                Command::Validate => validate_records(&engine),
                Command::Enroll(EnrollArgs {
                    student: Some(student),
                    course: Some(course),
                }) => {
                    load_history(&mut engine, &store, true).await?;
                    let id = engine.student_id(student)?;
                    let enrollment = engine.enroll(id, course)?;
                    engine.save(&store).await?;
                    println!("✅ {}", enrollment);
                    Ok(())
                }
                Command::Enroll(_) => {
                    let report = engine.replay(store.load_enrollment_requests().await?);
                    for outcome in &report.outcomes {
                        match outcome {
                            ReplayOutcome::Enrolled { line, enrollment } => {
                                println!("✅ line {}: {}", line, enrollment);
                            }
                            ReplayOutcome::Rejected { line, error } => {
                                println!("❌ line {}: {}", line, error);
                            }
                        }
                    }
                    println!(
                        "{} accepted, {} rejected",
                        report.accepted(),
                        report.rejected()
                    );
                    Ok(())
                }
                Command::Drop(pair) => {
                    load_history(&mut engine, &store, true).await?;
                    let id = engine.student_id(&pair.student)?;
                    if engine.drop_course(id, &pair.course)? {
                        engine.save(&store).await?;
                        println!("🗑️  {} dropped {}", pair.student, pair.course);
                    } else {
                        println!("{} is not enrolled in {}", pair.student, pair.course);
                    }
                    Ok(())
                }
                Command::Grade { pair, grade } => {
                    load_history(&mut engine, &store, true).await?;
                    let id = engine.student_id(&pair.student)?;
                    engine.assign_grade(id, &pair.course, *grade)?;
                    engine.save(&store).await?;
                    println!("✅ {} graded {} in {}", pair.student, grade, pair.course);
                    Ok(())
                }
                Command::Enrollments(query) => {
                    load_history(&mut engine, &store, false).await?;
                    let enrollments = match (&query.student, &query.course) {
                        (Some(student), _) => engine.enrollments_for_student(student)?,
                        (None, Some(course)) => engine.enrollments_for_course(course)?,
                        (None, None) => Vec::new(),
                    };
                    if enrollments.is_empty() {
                        println!("No enrollments found.");
                    }
                    for enrollment in enrollments {
                        println!("{}", enrollment);
                    }
                    Ok(())
                }
                Command::Transcript(args) => {
                    load_history(&mut engine, &store, false).await?;
                    print_transcript(&engine, args)
                }
                Command::Gpa(args) => {
                    load_history(&mut engine, &store, false).await?;
                    let student = engine.student(&args.student)?;
                    let gpa = engine.gpa(&args.student)?;
                    if args.json {
                        let value = serde_json::json!({
                            "reg_no": student.reg_no(),
                            "full_name": student.full_name(),
                            "gpa": gpa,
                        });
                        println!("{}", serde_json::to_string_pretty(&value)?);
                    } else {
                        println!("{} ({}): {:.2}", student.full_name(), student.reg_no(), gpa);
                    }
                    Ok(())
                }
                Command::Courses {
                    department,
                    semester,
                } => list_courses(&engine, department.as_deref(), semester.as_deref()),
                Command::Export { out } => {
                    load_history(&mut engine, &store, true).await?;
                    let target = CsvDataStore::new(LocalStorage::new(out.clone()));
                    engine.save(&target).await?;
                    println!("📁 Exported to {}", out.display());

                    if config.auto_backup_enabled() {
                        let archive = backup_service(&config).create_backup()?;
                        println!("📦 Backup saved to {}", archive.display());
                    }
                    Ok(())
                }
                Command::Credits { .. } | Command::Backup { .. } => Ok(()),
            }
        }
    }
}

/// Rebuilds saved enrollments. Commands that write the data back pass
/// `strict`, so a rejected row aborts instead of being lost on save; the
/// others print each rejected row and carry on.
async fn load_history(
    engine: &mut CampusEngine,
    store: &CsvDataStore<LocalStorage>,
    strict: bool,
) -> Result<()> {
    let report = engine.restore_history(store.load_enrollment_requests().await?);
    if strict {
        return report.ensure_complete();
    }
    for (line, error) in report.rejections() {
        eprintln!("⚠️  enrollments.csv line {}: {}", line, error);
    }
    Ok(())
}

fn backup_service(config: &AppConfig) -> BackupService {
    BackupService::new(config.data_path(), config.backup_path())
}

fn run_backup(config: &AppConfig, action: &BackupAction) -> Result<()> {
    let service = backup_service(config);
    match action {
        BackupAction::Create => {
            let archive = service.create_backup()?;
            println!("📦 Backup saved to {}", archive.display());
        }
        BackupAction::List => {
            let backups = service.list_backups()?;
            if backups.is_empty() {
                println!("No backups found.");
            }
            for backup in backups {
                println!("{}", backup.display());
            }
        }
        BackupAction::Cleanup { keep } => {
            let keep = keep.or(config.backup.keep).unwrap_or(DEFAULT_BACKUP_KEEP);
            let removed = service.cleanup_old_backups(keep)?;
            println!("🧹 Removed {} old backup(s), kept {}", removed, keep);
        }
        BackupAction::Size => {
            println!("{} bytes", service.backup_size()?);
        }
    }
    Ok(())
}

fn validate_records(engine: &CampusEngine) -> Result<()> {
    let mut problems = 0;
    for student in engine.students().iter() {
        for error in student.validation_errors() {
            println!("❌ {}: {}", student.reg_no(), error);
            problems += 1;
        }
    }
    for course in engine.courses().all() {
        if !EnrollmentRegistry::is_credit_value_allowed(course.credits()) {
            println!(
                "⚠️  {}: {} credits is outside the usual values",
                course.code(),
                course.credits()
            );
        }
    }

    if problems > 0 {
        return Err(CampusError::validation(format!(
            "{} student record(s) failed validation",
            problems
        )));
    }
    println!(
        "✅ {} students and {} courses are valid",
        engine.students().len(),
        engine.courses().len()
    );
    Ok(())
}

fn print_transcript(engine: &CampusEngine, args: &StudentArgs) -> Result<()> {
    if args.summary {
        let summary = engine.summary(&args.student)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print!("{}", summary);
        }
    } else {
        let transcript = engine.transcript(&args.student)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&transcript)?);
        } else {
            print!("{}", transcript);
        }
    }
    Ok(())
}

fn list_courses(
    engine: &CampusEngine,
    department: Option<&str>,
    semester: Option<&str>,
) -> Result<()> {
    let semester = semester
        .map(|s| s.parse::<Semester>())
        .transpose()?;

    let courses = engine.courses().search(|course| {
        department.map_or(true, |d| course.department().eq_ignore_ascii_case(d))
            && semester.map_or(true, |s| course.semester() == s)
    });

    if courses.is_empty() {
        println!("No courses match.");
    }
    for course in courses {
        println!("{}", course);
    }
    Ok(())
}

fn print_credit_values(value: Option<u32>) {
    let allowed = EnrollmentRegistry::allowed_credit_values();
    match value {
        Some(credits) if allowed.contains(&credits) => println!("✅ {} is allowed", credits),
        Some(credits) => println!("❌ {} is not an allowed credit value", credits),
        None => {
            let values: Vec<String> = allowed.iter().map(u32::to_string).collect();
            println!("Allowed credit values: {}", values.join(", "));
        }
    }
}
