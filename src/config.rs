// ⚙️ Import configuration
//
// The district is an explicit value handed to the reconciler. Every CSV this
// importer sees belongs to that one district.

use std::path::PathBuf;

pub const DEFAULT_DISTRICT_NAME: &str = "SchooLinks";
pub const DEFAULT_DATABASE_PATH: &str = "applications.db";
pub const DEFAULT_CSV_PATH: &str = "applications.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Name of the district that owns every student in the file
    pub district_name: String,

    /// SQLite database file
    pub database_path: PathBuf,

    /// CSV export to import
    pub csv_path: PathBuf,
}

impl ImportConfig {
    pub fn new(district_name: impl Into<String>) -> Self {
        ImportConfig {
            district_name: district_name.into(),
            ..Self::default()
        }
    }

    /// Builder pattern: override the database file
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Builder pattern: override the CSV file
    pub fn with_csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = path.into();
        self
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            district_name: DEFAULT_DISTRICT_NAME.to_string(),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
        }
    }
}
