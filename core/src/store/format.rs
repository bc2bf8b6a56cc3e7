//! On-disk formats and their parse/serialize pair.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde_json::{Map, Value};

use super::errors::CodecError;
use crate::path::DottedPath;


/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// `.json`, and the fallback for anything unrecognized.
    #[default]
    Json,
    /// `.yml` / `.yaml`
    Yaml,
}

impl Format {
    /// Resolve a format from a bare file extension (no leading dot).
    ///
    /// Matching ignores ASCII case. Unknown extensions fall back to JSON.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "yml" | "yaml" => Format::Yaml,
            _ => Format::Json,
        }
    }

    /// Resolve a format from a file path's extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Format::from_extension)
            .unwrap_or_default()
    }

    /// Short lowercase name, e.g. `"yaml"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// Parse document text into a tree.
    ///
    /// YAML is read into its own value model first: tags are dropped in
    /// favour of the tagged value, scalar keys become strings, and aliases
    /// are already expanded. Non-finite floats are rejected since the tree
    /// cannot hold them.
    pub fn parse(&self, content: &str) -> Result<Value, CodecError> {
        match self {
            Format::Json => Ok(serde_json::from_str(content)?),
            Format::Yaml => {
                let raw: serde_yaml::Value = serde_yaml::from_str(content)?;
                yaml_to_tree(raw, &mut Vec::new())
            }
        }
    }

    /// Serialize a whole tree to document text, newline-terminated.
    pub fn serialize(&self, tree: &Value) -> Result<String, CodecError> {
        match self {
            Format::Json => {
                let mut out = serde_json::to_string_pretty(tree)?;
                out.push('\n');
                Ok(out)
            }
            Format::Yaml => Ok(serde_yaml::to_string(tree)?),
        }
    }
}

// ---------------------------------------------------------------------------
// YAML conversion
// ---------------------------------------------------------------------------

fn yaml_to_tree(value: serde_yaml::Value, at: &mut Vec<String>) -> Result<Value, CodecError> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => yaml_number(&n, at)?,
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                at.push(i.to_string());
                out.push(yaml_to_tree(item, at)?);
                at.pop();
            }
            Value::Array(out)
        }
        Yaml::Mapping(entries) => {
            let mut out = Map::new();
            for (key, item) in entries {
                let key = yaml_key(key, at)?;
                at.push(key.clone());
                let item = yaml_to_tree(item, at)?;
                at.pop();
                out.insert(key, item);
            }
            Value::Object(out)
        }
        Yaml::Tagged(tagged) => yaml_to_tree(tagged.value, at)?,
    })
}

fn yaml_number(n: &serde_yaml::Number, at: &[String]) -> Result<Value, CodecError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::from(u));
    }
    n.as_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| CodecError::NonFinite {
            key: location(at),
            value: n.to_string(),
        })
}

fn yaml_key(key: serde_yaml::Value, at: &[String]) -> Result<String, CodecError> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => yaml_key(tagged.value, at),
        Yaml::Sequence(_) | Yaml::Mapping(_) => Err(CodecError::ComplexKey { key: location(at) }),
    }
}

fn location(at: &[String]) -> String {
    if at.is_empty() {
        "(root)".to_string()
    } else {
        DottedPath::from_segments(at.to_vec()).to_dotted()
    }
}


impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    /// Strict variant of [`Format::from_extension`] for explicit user input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yml" | "yaml" => Ok(Format::Yaml),
            other => Err(format!("unknown format '{}' (expected json or yaml)", other)),
        }
    }
}
