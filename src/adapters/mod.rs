pub mod backup;
pub mod csv_io;
pub mod storage;

pub use backup::BackupService;
pub use csv_io::CsvDataStore;
pub use storage::LocalStorage;
