//! Document schema description.
//!
//! # Responsibility
//! - Load the users schema file (bundled copy or an override path).
//! - Compile it once and report JSON Schema violations for diagnostics.
//!
//! # Invariants
//! - Schema checks are informational only; writes are never rejected by them.
//! - The draft is taken from the schema's `$schema` keyword.

use jsonschema::Validator;
use log::warn;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

static BUNDLED_SCHEMA: Lazy<(Value, Arc<Validator>)> = Lazy::new(|| {
    let root: Value = serde_json::from_str(include_str!("../schema/users.schema.json"))
        .expect("valid bundled users schema");
    let validator = jsonschema::validator_for(&root).expect("bundled users schema compiles");
    (root, Arc::new(validator))
});

/// Error raised while loading a schema file.
#[derive(Debug)]
pub enum SchemaError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    NotAnObject,
    Invalid(String),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read schema `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "schema is not valid JSON: {err}"),
            Self::NotAnObject => write!(f, "schema root must be a JSON object"),
            Self::Invalid(message) => write!(f, "schema does not compile: {message}"),
        }
    }
}

impl Error for SchemaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::NotAnObject | Self::Invalid(_) => None,
        }
    }
}

/// Where a loaded schema came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Bundled,
    File(PathBuf),
}

/// One mismatch between a document and the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON pointer into the document, empty for the root.
    pub path: String,
    pub message: String,
}

impl Display for SchemaViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Parsed and compiled schema description.
#[derive(Clone)]
pub struct DocumentSchema {
    root: Value,
    validator: Arc<Validator>,
    source: SchemaSource,
}

impl Debug for DocumentSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSchema")
            .field("title", &self.title())
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl DocumentSchema {
    /// Returns the schema compiled into the crate.
    pub fn bundled() -> Self {
        let (root, validator) = &*BUNDLED_SCHEMA;
        Self {
            root: root.clone(),
            validator: Arc::clone(validator),
            source: SchemaSource::Bundled,
        }
    }

    /// Parses and compiles a schema from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let root: Value = serde_json::from_str(text).map_err(SchemaError::Parse)?;
        if !root.is_object() {
            return Err(SchemaError::NotAnObject);
        }
        let validator =
            jsonschema::validator_for(&root).map_err(|err| SchemaError::Invalid(err.to_string()))?;
        Ok(Self {
            root,
            validator: Arc::new(validator),
            source: SchemaSource::Bundled,
        })
    }

    /// Reads and parses a schema file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut schema = Self::from_json_str(&text)?;
        schema.source = SchemaSource::File(path.to_path_buf());
        Ok(schema)
    }

    /// Loads `path` when given, falling back to the bundled schema on failure.
    pub fn load_or_bundled(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::bundled();
        };
        match Self::load(path) {
            Ok(schema) => schema,
            Err(err) => {
                warn!(
                    "event=schema_load module=schema status=fallback path={} error={}",
                    path.display(),
                    err
                );
                Self::bundled()
            }
        }
    }

    pub fn source(&self) -> &SchemaSource {
        &self.source
    }

    pub fn title(&self) -> Option<&str> {
        self.root.get("title").and_then(Value::as_str)
    }

    /// Top-level required field names.
    pub fn required_fields(&self) -> Vec<&str> {
        self.root
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Lists every violation found in `document`. Empty means conforming.
    pub fn check(&self, document: &Value) -> Vec<SchemaViolation> {
        self.validator
            .iter_errors(document)
            .map(|error| SchemaViolation {
                path: error.instance_path.to_string(),
                message: error.to_string(),
            })
            .collect()
    }
}
