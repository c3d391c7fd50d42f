//! Descriptor loader.
//!
//! Descriptors are static configuration: one JSON file per named descriptor
//! version, read at startup and held in an in-memory registry. Registered
//! versions are immutable; shape changes ship as a new version so multiple
//! descriptor versions can coexist during a migration.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::descriptor::Descriptor;

/// Result type for descriptor loading.
pub type LoaderResult<T> = Result<T, DescriptorLoadError>;

/// Failure while reading or registering descriptor configuration.
#[derive(Debug, Error)]
pub enum DescriptorLoadError {
    /// A descriptor file could not be read or parsed.
    #[error("malformed descriptor '{path}': {reason}")]
    Malformed {
        /// File path, or `<in-memory>` for programmatic registration.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// A (name, version) pair was registered twice.
    #[error("descriptor '{name}' version '{version}' is immutable")]
    Immutable {
        /// Descriptor name.
        name: String,
        /// Descriptor version.
        version: String,
    },
}

impl DescriptorLoadError {
    fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        DescriptorLoadError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A descriptor together with its configuration identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedDescriptor {
    /// Descriptor name (e.g. `"register"`).
    pub name: String,
    /// Descriptor version.
    pub version: String,
    /// The root descriptor.
    #[serde(flatten)]
    pub root: Descriptor,
}

impl NamedDescriptor {
    /// Wrap a descriptor with its configuration identity.
    pub fn new(name: impl Into<String>, version: impl Into<String>, root: Descriptor) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            root,
        }
    }
}

/// Reads descriptor files from a directory and keeps them indexed by
/// (name, version).
pub struct DescriptorLoader {
    descriptor_dir: PathBuf,
    descriptors: HashMap<(String, String), NamedDescriptor>,
}

impl DescriptorLoader {
    /// Creates a loader rooted at the given configuration directory.
    pub fn new(descriptor_dir: &Path) -> Self {
        Self {
            descriptor_dir: descriptor_dir.to_path_buf(),
            descriptors: HashMap::new(),
        }
    }

    /// Loads every `*.json` descriptor file in the configuration directory.
    pub fn load_all(&mut self) -> LoaderResult<()> {
        if !self.descriptor_dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.descriptor_dir).map_err(|e| {
            DescriptorLoadError::malformed(
                self.descriptor_dir.display().to_string(),
                format!("failed to read descriptor directory: {}", e),
            )
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                DescriptorLoadError::malformed(
                    self.descriptor_dir.display().to_string(),
                    format!("failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            self.load_file(&path)?;
        }

        Ok(())
    }

    fn load_file(&mut self, path: &Path) -> LoaderResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            DescriptorLoadError::malformed(
                path.display().to_string(),
                format!("failed to read file: {}", e),
            )
        })?;

        let descriptor: NamedDescriptor = serde_json::from_str(&content).map_err(|e| {
            DescriptorLoadError::malformed(path.display().to_string(), format!("invalid JSON: {}", e))
        })?;

        self.insert(descriptor)
    }

    /// Registers a descriptor directly (for tests or programmatic setup).
    pub fn register(&mut self, descriptor: NamedDescriptor) -> LoaderResult<()> {
        self.insert(descriptor)
    }

    fn insert(&mut self, descriptor: NamedDescriptor) -> LoaderResult<()> {
        let key = (descriptor.name.clone(), descriptor.version.clone());
        if self.descriptors.contains_key(&key) {
            return Err(DescriptorLoadError::Immutable {
                name: descriptor.name,
                version: descriptor.version,
            });
        }
        self.descriptors.insert(key, descriptor);
        Ok(())
    }

    /// Gets a descriptor by name and version.
    pub fn get(&self, name: &str, version: &str) -> Option<&Descriptor> {
        self.descriptors
            .get(&(name.to_string(), version.to_string()))
            .map(|d| &d.root)
    }

    /// Checks whether a (name, version) pair is registered.
    pub fn exists(&self, name: &str, version: &str) -> bool {
        self.descriptors
            .contains_key(&(name.to_string(), version.to_string()))
    }

    /// Number of registered descriptors.
    pub fn count(&self) -> usize {
        self.descriptors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_descriptor() -> NamedDescriptor {
        NamedDescriptor::new(
            "register",
            "v1",
            Descriptor::new().with_fields(["name", "url"]),
        )
    }

    #[test]
    fn test_register_and_get() {
        let tmp = TempDir::new().unwrap();
        let mut loader = DescriptorLoader::new(tmp.path());

        loader.register(sample_descriptor()).unwrap();

        let descriptor = loader.get("register", "v1").unwrap();
        assert!(descriptor.fields.contains(&"name".to_string()));
        assert!(loader.exists("register", "v1"));
        assert!(!loader.exists("register", "v2"));
    }

    #[test]
    fn test_registered_version_is_immutable() {
        let tmp = TempDir::new().unwrap();
        let mut loader = DescriptorLoader::new(tmp.path());

        loader.register(sample_descriptor()).unwrap();

        let result = loader.register(sample_descriptor());
        assert!(matches!(
            result,
            Err(DescriptorLoadError::Immutable { .. })
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("register_v1.json");
        fs::write(
            &path,
            r#"{
                "name": "register",
                "version": "v1",
                "fields": ["name"],
                "lists": ["tags"]
            }"#,
        )
        .unwrap();

        let mut loader = DescriptorLoader::new(tmp.path());
        loader.load_all().unwrap();

        assert_eq!(loader.count(), 1);
        let descriptor = loader.get("register", "v1").unwrap();
        assert!(descriptor.lists.contains(&"tags".to_string()));
    }

    #[test]
    fn test_malformed_file_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.json"), "{not json").unwrap();

        let mut loader = DescriptorLoader::new(tmp.path());
        let result = loader.load_all();
        assert!(matches!(
            result,
            Err(DescriptorLoadError::Malformed { .. })
        ));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let mut loader = DescriptorLoader::new(&tmp.path().join("nowhere"));

        loader.load_all().unwrap();
        assert_eq!(loader.count(), 0);
    }

    #[test]
    fn test_non_json_files_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), "not a descriptor").unwrap();

        let mut loader = DescriptorLoader::new(tmp.path());
        loader.load_all().unwrap();
        assert_eq!(loader.count(), 0);
    }
}
