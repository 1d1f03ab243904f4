use std::thread::sleep;
use std::time::Duration;

use campus_registry::BackupService;
use tempfile::TempDir;

#[test]
fn test_cleanup_keeps_newest_backups() {
    let data = TempDir::new().unwrap();
    std::fs::write(data.path().join("students.csv"), "ID\n1\n").unwrap();
    let backups = TempDir::new().unwrap();
    let service = BackupService::new(data.path(), backups.path());

    let mut created = Vec::new();
    for _ in 0..4 {
        created.push(service.create_backup().unwrap());
        sleep(Duration::from_millis(5));
    }
    std::fs::write(backups.path().join("notes.txt"), "not a backup").unwrap();

    let listed = service.list_backups().unwrap();
    assert_eq!(listed.len(), 4);
    assert_eq!(listed[0], created[3]);

    assert_eq!(service.cleanup_old_backups(2).unwrap(), 2);
    let remaining = service.list_backups().unwrap();
    assert_eq!(remaining, vec![created[3].clone(), created[2].clone()]);
    assert!(backups.path().join("notes.txt").exists());

    assert_eq!(service.cleanup_old_backups(5).unwrap(), 0);
}

#[test]
fn test_empty_backup_dir() {
    let data = TempDir::new().unwrap();
    let backups = TempDir::new().unwrap();
    let service = BackupService::new(data.path(), backups.path().join("missing"));

    assert!(service.list_backups().unwrap().is_empty());
    assert_eq!(service.backup_size().unwrap(), 0);
    assert_eq!(service.cleanup_old_backups(1).unwrap(), 0);
}
