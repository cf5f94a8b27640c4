// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture helper for creating temporary directories with init SQL files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Create an init file with given content
    pub fn create_init_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        self.create_raw_file(relative_path, content.as_bytes())
    }

    /// Create a file with arbitrary bytes (for encoding tests)
    pub fn create_raw_file<P: AsRef<Path>>(&self, relative_path: P, content: &[u8]) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// SQLite URL for a database file inside the fixture
    pub fn database_url(&self, name: &str) -> String {
        format!("sqlite://{}", self.root_path.join(name).display())
    }

    /// Stats output path inside the fixture
    pub fn stats_path(&self) -> PathBuf {
        self.root_path.join("init_stats.json")
    }
}

/// Extension setup script with comments in every position
pub const EXTENSION_INIT: &str = "-- Configure extensions
SET autoinstall_known_extensions = 1;
/* Load the httpfs extension
   for remote file access */
LOAD httpfs;
-- Done";

/// SQLite schema + seed script exercising strings with terminators and escaped quotes
pub const SQLITE_INIT: &str = "-- schema
CREATE TABLE users (
    id INTEGER PRIMARY KEY, -- surrogate key
    name TEXT NOT NULL,
    note TEXT
);

/* seed rows; the note column holds
   text that looks like SQL */
INSERT INTO users (name, note) VALUES ('alice', 'likes ; semicolons');
INSERT INTO users (name, note) VALUES ('bob', 'it''s -- not a comment');
INSERT INTO users (name, note) VALUES ('carol', '/* not a comment either */');

CREATE INDEX users_name ON users (name)";
