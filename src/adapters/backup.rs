use chrono::Local;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::{FileOptions, ZipWriter};
use zip::ZipArchive;

use crate::utils::error::{CampusError, Result};

const BACKUP_PREFIX: &str = "backup_";
const BACKUP_EXTENSION: &str = "zip";

/// Zip snapshots of the data directory. Works on files only; the in-memory
/// registry is never involved.
#[derive(Debug, Clone)]
pub struct BackupService {
    data_dir: PathBuf,
    backup_dir: PathBuf,
}

impl BackupService {
    pub fn new(data_dir: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            backup_dir: backup_dir.into(),
        }
    }

    /// Archives every file under the data directory into a new timestamped zip
    /// and returns its path.
    pub fn create_backup(&self) -> Result<PathBuf> {
        if !self.data_dir.is_dir() {
            return Err(CampusError::not_found(
                "data directory",
                self.data_dir.display().to_string(),
            ));
        }

        let mut files = Vec::new();
        collect_files(&self.data_dir, &mut files)?;
        files.sort();

        let zip_data = {
            let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
            for file in &files {
                let name = file
                    .strip_prefix(&self.data_dir)
                    .unwrap_or(file)
                    .to_string_lossy()
                    .replace('\\', "/");
                zip.start_file::<_, ()>(name, FileOptions::default())?;
                zip.write_all(&fs::read(file)?)?;
            }
            zip.finish()?.into_inner()
        };

        fs::create_dir_all(&self.backup_dir)?;
        let archive = self.backup_dir.join(format!(
            "{}{}.{}",
            BACKUP_PREFIX,
            Local::now().format("%Y%m%d_%H%M%S_%3f"),
            BACKUP_EXTENSION
        ));
        fs::write(&archive, &zip_data)?;

        tracing::info!(
            archive = %archive.display(),
            files = files.len(),
            bytes = zip_data.len(),
            "backup created"
        );
        Ok(archive)
    }

    /// Backup archives, newest first.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups: Vec<PathBuf> = fs::read_dir(&self.backup_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_backup_archive(path))
            .collect();
        backups.sort();
        backups.reverse();
        Ok(backups)
    }

    /// Deletes all but the `keep` newest archives. Returns how many were removed.
    pub fn cleanup_old_backups(&self, keep: usize) -> Result<usize> {
        let backups = self.list_backups()?;
        let mut removed = 0;
        for stale in backups.iter().skip(keep) {
            fs::remove_file(stale)?;
            tracing::debug!(archive = %stale.display(), "old backup removed");
            removed += 1;
        }
        if removed > 0 {
            tracing::info!(removed, keep, "old backups cleaned up");
        }
        Ok(removed)
    }

    /// Total bytes used by the backup directory.
    pub fn backup_size(&self) -> Result<u64> {
        directory_size(&self.backup_dir)
    }

    /// Unpacks an archive into `target`, overwriting files of the same name.
    pub fn restore(&self, archive: &Path, target: &Path) -> Result<usize> {
        let data = fs::read(archive)?;
        let mut zip = ZipArchive::new(Cursor::new(data))?;
        let count = zip.len();
        fs::create_dir_all(target)?;
        zip.extract(target)?;
        tracing::info!(archive = %archive.display(), files = count, "backup restored");
        Ok(count)
    }
}

fn is_backup_archive(path: &Path) -> bool {
    path.is_file()
        && path.extension().and_then(|e| e.to_str()) == Some(BACKUP_EXTENSION)
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(BACKUP_PREFIX))
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

fn directory_size(path: &Path) -> Result<u64> {
    if !path.exists() {
        return Ok(0);
    }
    if path.is_file() {
        return Ok(fs::metadata(path)?.len());
    }

    let mut total = 0;
    for entry in fs::read_dir(path)? {
        total += directory_size(&entry?.path())?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded_data_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("students.csv"), "ID,FullName\n1,Ada\n").unwrap();
        fs::create_dir_all(dir.path().join("archive")).unwrap();
        fs::write(dir.path().join("archive/old.csv"), "x").unwrap();
        dir
    }

    #[test]
    fn test_backup_contains_nested_files() {
        let data = seeded_data_dir();
        let backups = TempDir::new().unwrap();
        let service = BackupService::new(data.path(), backups.path().join("b"));

        let archive = service.create_backup().unwrap();
        let mut zip = ZipArchive::new(Cursor::new(fs::read(&archive).unwrap())).unwrap();
        let mut names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();

        assert_eq!(names, vec!["archive/old.csv", "students.csv"]);
        assert!(service.backup_size().unwrap() > 0);
    }

    #[test]
    fn test_missing_data_dir_is_not_found() {
        let backups = TempDir::new().unwrap();
        let service = BackupService::new(backups.path().join("nope"), backups.path());
        assert!(matches!(
            service.create_backup(),
            Err(CampusError::NotFound { .. })
        ));
    }

    #[test]
    fn test_restore_round_trip() {
        let data = seeded_data_dir();
        let backups = TempDir::new().unwrap();
        let restored = TempDir::new().unwrap();
        let service = BackupService::new(data.path(), backups.path());

        let archive = service.create_backup().unwrap();
        assert_eq!(service.restore(&archive, restored.path()).unwrap(), 2);
        assert_eq!(
            fs::read_to_string(restored.path().join("students.csv")).unwrap(),
            "ID,FullName\n1,Ada\n"
        );
    }
}
