//! [`TestMappings`] builder for mapping source trees.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory holding mapping sources inside the fixture root.
pub const MAPPINGS_DIR: &str = "mappings";

/// A temporary project root with a `mappings/` source tree.
///
/// # Example
///
/// ```rust,no_run
/// use mapping_test_utils::TestMappings;
///
/// let fixture = TestMappings::new();
/// fixture.write_tenant("settings", "acme", "ui:\n  retries: [1, 2, 3]\n");
/// fixture.write_generic("settings", "ui:\n  theme: dark\n");
/// ```
pub struct TestMappings {
    temp_dir: TempDir,
}

impl Default for TestMappings {
    fn default() -> Self {
        Self::new()
    }
}

impl TestMappings {
    /// Create an empty temporary root.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The `mappings/` source directory.
    pub fn directory(&self) -> PathBuf {
        self.root().join(MAPPINGS_DIR)
    }

    /// Write `{type dir}/tenants/{tenant}.yaml`.
    pub fn write_tenant(&self, type_dir: &str, tenant: &str, yaml: &str) -> PathBuf {
        self.write_file(&format!("{MAPPINGS_DIR}/{type_dir}/tenants/{tenant}.yaml"), yaml)
    }

    /// Write `{type dir}/generics/{tenant type}.yaml`.
    pub fn write_type_generic(&self, type_dir: &str, tenant_type: &str, yaml: &str) -> PathBuf {
        self.write_file(
            &format!("{MAPPINGS_DIR}/{type_dir}/generics/{tenant_type}.yaml"),
            yaml,
        )
    }

    /// Write `{type dir}/generics/generic.yaml`.
    pub fn write_generic(&self, type_dir: &str, yaml: &str) -> PathBuf {
        self.write_file(&format!("{MAPPINGS_DIR}/{type_dir}/generics/generic.yaml"), yaml)
    }

    /// Write `content` at `relative`, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write `mapping.toml` at the root with `body` appended after the
    /// `directory` line.
    pub fn write_config(&self, body: &str) -> PathBuf {
        let config = format!("directory = \"{MAPPINGS_DIR}\"\n{body}");
        self.write_file("mapping.toml", &config)
    }

    /// Assert that `relative` exists under the root.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let full_path = self.root().join(relative);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
