// Test fixtures for integration testing

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Alice's CV: Rust and embedded work
#[allow(dead_code)] // Used in integration tests
pub const ALICE_CV: &str = "Alice Martin - Embedded Engineer\n\
Seven years writing Rust firmware for industrial sensors.\n\
Experience with RTOS, CAN bus and low-power design.\n\
Speaks English and French.";

/// Bob's CV: marketing
#[allow(dead_code)] // Used in integration tests
pub const BOB_CV: &str = "Bob Chen - Marketing Lead\n\
Ran growth campaigns for consumer apps.\n\
Skilled in analytics, branding and public speaking.";

/// Directory of CV documents for loading tests
#[allow(dead_code)] // Used in integration tests
pub struct CvSet {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

impl CvSet {
    /// Two CVs plus a file the default patterns ignore
    #[allow(dead_code)] // Used in integration tests
    pub fn standard() -> Self {
        Self::with_files(&[
            ("alice.txt", ALICE_CV),
            ("bob.md", BOB_CV),
            ("notes.json", "{\"ignored\": true}"),
        ])
    }

    /// Create a set with specific files
    #[allow(dead_code)] // Used in integration tests
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut paths = Vec::new();

        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create directories");
            }
            std::fs::write(&path, content).expect("Failed to write file");
            paths.push(path);
        }

        Self { dir, files: paths }
    }

    /// Add a file with raw bytes
    #[allow(dead_code)] // Used in integration tests
    pub fn add_bytes(&mut self, name: &str, bytes: &[u8]) {
        let path = self.dir.path().join(name);
        std::fs::write(&path, bytes).expect("Failed to write file");
        self.files.push(path);
    }

    #[allow(dead_code)] // Used in integration tests
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
