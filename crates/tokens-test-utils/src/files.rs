//! On-disk input fixtures

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// A temporary directory of JSON inputs
///
/// # Example
///
/// ```rust,no_run
/// use serde_json::json;
/// use tokens_test_utils::TestFiles;
///
/// let files = TestFiles::new();
/// let path = files.write_json("tokens.json", &json!({ "size": { "$type": "number", "$value": 4 } }));
/// assert!(path.exists());
/// ```
pub struct TestFiles {
    temp_dir: TempDir,
}

impl Default for TestFiles {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFiles {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root of the temporary directory
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `name` inside the directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Write pretty-printed JSON and return its path.
    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        let content = serde_json::to_string_pretty(value).unwrap();
        self.write(name, &content)
    }

    /// Write raw text and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Read a file back as text.
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name))
            .unwrap_or_else(|e| panic!("TestFiles::read: {}: {}", name, e))
    }
}
