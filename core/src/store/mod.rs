//! File-backed configuration store.
//!
//! A [`Configuration`] owns one parsed document together with the file it
//! came from and the format used to read it. Reads go straight to the
//! in-memory tree. Every write serializes the whole tree, overwrites the
//! file, and re-reads it, so the tree the store holds is always the one
//! last parsed from disk.
//!
//! There is no locking. Two stores on the same file, or another process
//! writing it, can silently lose each other's updates.

pub mod errors;
pub mod format;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::path::access::{self, Lookup};

pub use errors::{CodecError, ConfigError};
pub use format::Format;


/// A configuration file loaded into memory.
#[derive(Debug, Clone)]
pub struct Configuration {
    path: PathBuf,
    format: Format,
    tree: Value,
}

impl Configuration {
    /// Open and parse the file at `path`, picking the format from its
    /// extension (`.json`, `.yml`, `.yaml`; anything else reads as JSON).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        Self::open_with_format(path, Format::from_path(path))
    }

    /// Open and parse the file at `path` with an explicit format,
    /// ignoring the extension.
    pub fn open_with_format(path: impl AsRef<Path>, format: Format) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        fs::metadata(&path).map_err(|source| ConfigError::NotFound {
            path: path.clone(),
            source,
        })?;

        let tree = read_tree(&path, format)?;
        Ok(Configuration { path, format, tree })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The format the file is read and written in.
    pub fn format(&self) -> Format {
        self.format
    }

    /// The whole document as last read from disk.
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Read the value at a dotted path, or `default` if it is missing.
    ///
    /// Empty and blocked paths return `None` regardless of `default`.
    pub fn get<'a>(&'a self, path: &str, default: Option<&'a Value>) -> Option<&'a Value> {
        access::get(&self.tree, path, default)
    }

    /// Read the value at a dotted path and deserialize it into `T`.
    ///
    /// Returns `Ok(None)` when the path is missing, empty or blocked.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ConfigError> {
        match access::lookup(&self.tree, path) {
            Lookup::Found(value) => T::deserialize(value)
                .map(Some)
                .map_err(|source| ConfigError::Convert {
                    key: path.to_string(),
                    source,
                }),
            Lookup::Missing | Lookup::Invalid => Ok(None),
        }
    }

    /// True if a value exists at the dotted path.
    pub fn has(&self, path: &str) -> bool {
        access::has(&self.tree, path)
    }

    /// Assign a value at a dotted path and write the file.
    ///
    /// On a write failure the error is returned and the store keeps the
    /// tree it last read; the file itself may be partially written.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<&mut Self, ConfigError> {
        let mut working = self.tree.clone();
        access::set(&mut working, path, value.into());
        self.persist(&working)?;
        Ok(self)
    }

    /// Remove the key at a dotted path and write the file.
    ///
    /// Deleting a missing key still rewrites the file and is not an error.
    pub fn delete(&mut self, path: &str) -> Result<&mut Self, ConfigError> {
        let mut working = self.tree.clone();
        if !access::delete(&mut working, path) {
            debug!(path, "delete found nothing to remove");
        }
        self.persist(&working)?;
        Ok(self)
    }

    /// Re-read the file, replacing the in-memory tree.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.tree = read_tree(&self.path, self.format)?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Internal
    // -------------------------------------------------------------------

    fn persist(&mut self, tree: &Value) -> Result<(), ConfigError> {
        let content = self
            .format
            .serialize(tree)
            .map_err(|source| ConfigError::Serialize {
                format: self.format,
                source,
            })?;

        fs::write(&self.path, &content).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            path = %self.path.display(),
            format = %self.format,
            bytes = content.len(),
            "wrote configuration"
        );

        self.reload()
    }
}


fn read_tree(path: &Path, format: Format) -> Result<Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tree = format.parse(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        format,
        source,
    })?;
    debug!(
        path = %path.display(),
        format = %format,
        bytes = content.len(),
        "loaded configuration"
    );
    Ok(tree)
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use tempfile::TempDir;

    const YAML_FIXTURE: &str = "config:\n  foo: bar\n  bar: 5\n  baz: true\n  foobar:\n    - 1\n    - 2\n    - 3\n";

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    // --- open ---

    #[test]
    fn open_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = Configuration::open(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert!(err.to_string().contains("does the file exist"));
    }

    #[test]
    fn open_malformed_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "broken.json", "{\"a\": ");
        match Configuration::open(&path).unwrap_err() {
            ConfigError::Parse { format, source, .. } => {
                assert_eq!(format, Format::Json);
                assert!(matches!(source, CodecError::Json(_)));
            }
            other => panic!("expected Parse, got {:?}", other),
        }
    }

    #[test]
    fn open_picks_format_from_extension() {
        let dir = TempDir::new().unwrap();
        let yaml = write_file(&dir, "c.yml", YAML_FIXTURE);
        let json = write_file(&dir, "c.json", "{}");
        let other = write_file(&dir, "c.conf", "{\"x\": 1}");
        assert_eq!(Configuration::open(&yaml).unwrap().format(), Format::Yaml);
        assert_eq!(Configuration::open(&json).unwrap().format(), Format::Json);
        assert_eq!(Configuration::open(&other).unwrap().format(), Format::Json);
    }

    #[test]
    fn open_with_format_overrides_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "settings.conf", YAML_FIXTURE);
        let config = Configuration::open_with_format(&path, Format::Yaml).unwrap();
        assert_eq!(config.get("config.foo", None), Some(&json!("bar")));
        assert!(Configuration::open(&path).is_err());
    }

    // --- reads ---

    #[test]
    fn reads_fixture_values() {
        let dir = TempDir::new().unwrap();
        let config = Configuration::open(write_file(&dir, "config.yaml", YAML_FIXTURE)).unwrap();
        assert_eq!(config.get("config.foo", None), Some(&json!("bar")));
        assert_eq!(config.get("config.bar", None), Some(&json!(5)));
        assert_eq!(config.get("config.baz", None), Some(&json!(true)));
        assert_eq!(config.get("config.foobar", None), Some(&json!([1, 2, 3])));
        assert!(!config.has("foo"));
        assert!(config.has("config.foobar"));
    }

    #[test]
    fn get_default_and_invalid_paths() {
        let dir = TempDir::new().unwrap();
        let config = Configuration::open(write_file(&dir, "config.yaml", YAML_FIXTURE)).unwrap();
        let fallback = json!(42);
        assert_eq!(config.get("config.missing", Some(&fallback)), Some(&fallback));
        assert_eq!(config.get("config.missing", None), None);
        assert_eq!(config.get("config.__proto__", Some(&fallback)), None);
    }

    #[test]
    fn present_null_wins_over_default() {
        let dir = TempDir::new().unwrap();
        let config =
            Configuration::open(write_file(&dir, "c.yaml", "token: ~\nport:\n")).unwrap();
        let fallback = json!("fallback");
        assert_eq!(config.get("token", Some(&fallback)), Some(&Value::Null));
        assert_eq!(config.get("port", Some(&fallback)), Some(&Value::Null));
        assert!(config.has("token"));
        assert_eq!(config.get("absent", Some(&fallback)), Some(&fallback));
    }

    #[test]
    fn get_as_deserializes_subtrees() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Section {
            foo: String,
            bar: u32,
            baz: bool,
            foobar: Vec<u8>,
        }

        let dir = TempDir::new().unwrap();
        let config = Configuration::open(write_file(&dir, "config.yaml", YAML_FIXTURE)).unwrap();
        let section: Section = config.get_as("config").unwrap().unwrap();
        assert_eq!(
            section,
            Section { foo: "bar".into(), bar: 5, baz: true, foobar: vec![1, 2, 3] }
        );
        assert_eq!(config.get_as::<u32>("config.bar").unwrap(), Some(5));
        assert_eq!(config.get_as::<u32>("config.nope").unwrap(), None);
        assert!(matches!(
            config.get_as::<u32>("config.foo"),
            Err(ConfigError::Convert { .. })
        ));
    }

    // --- writes ---

    #[test]
    fn set_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "config.yaml", YAML_FIXTURE);
        let mut config = Configuration::open(&path).unwrap();

        config.set("config.foo", "baz").unwrap();
        assert_eq!(config.get("config.foo", None), Some(&json!("baz")));

        let reopened = Configuration::open(&path).unwrap();
        assert_eq!(reopened.get("config.foo", None), Some(&json!("baz")));
        assert_eq!(reopened.tree(), config.tree());
    }

    #[test]
    fn set_and_delete_chain() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "app.json", "{}");
        let mut config = Configuration::open(&path).unwrap();

        config
            .set("server.port", 8080)
            .unwrap()
            .set("server.host", "localhost")
            .unwrap()
            .delete("server.port")
            .unwrap();

        assert_eq!(config.tree(), &json!({"server": {"host": "localhost"}}));
        let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(&on_disk, config.tree());
    }

    #[test]
    fn delete_twice_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "config.yaml", YAML_FIXTURE);
        let mut config = Configuration::open(&path).unwrap();

        config.delete("config.foo").unwrap();
        assert!(!config.has("config.foo"));
        config.delete("config.foo").unwrap();
        assert!(!config.has("config.foo"));
        assert!(config.has("config.bar"));
    }

    #[test]
    fn blocked_set_leaves_document_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "config.json", "{\"a\": {}}");
        let mut config = Configuration::open(&path).unwrap();

        config.set("a.__proto__.polluted", true).unwrap();
        assert_eq!(config.tree(), &json!({"a": {}}));
        assert!(!config.has("a.__proto__.polluted"));
    }

    #[test]
    fn failed_write_keeps_last_loaded_tree() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "config.json", "{\"a\": 1}");
        let mut config = Configuration::open(&path).unwrap();

        // Swap the file for a directory so the write fails.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let err = config.set("a", 2).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert_eq!(config.get("a", None), Some(&json!(1)));
    }

    #[test]
    fn reload_picks_up_external_edits() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "config.json", "{\"a\": 1}");
        let mut config = Configuration::open(&path).unwrap();

        fs::write(&path, "{\"a\": 2}").unwrap();
        assert_eq!(config.get("a", None), Some(&json!(1)));
        config.reload().unwrap();
        assert_eq!(config.get("a", None), Some(&json!(2)));
    }
}
