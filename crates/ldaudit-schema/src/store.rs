//! Schema registry.
//!
//! Loads every schema file under the schemas directory once and keeps the
//! parsed values for `$ref` resolution. Loading is tolerant: a schema that
//! fails to parse is logged and skipped here, and surfaces as a per-pair
//! failure only when an example is actually validated against it.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::{Retrieve, Uri, ValidationOptions};
use serde_json::Value;

/// Parsed schemas of one corpus, indexed by file name.
#[derive(Debug)]
pub struct SchemaStore {
    schema_dir: PathBuf,
    schemas: HashMap<String, Value>,
}

impl SchemaStore {
    /// Loads all `*.schema.json` files under `schema_dir`, recursively.
    ///
    /// A missing directory yields an empty store; unreadable or unparsable
    /// schema files are skipped with a warning.
    pub fn load(schema_dir: impl Into<PathBuf>) -> Self {
        let schema_dir = schema_dir.into();
        let mut schemas = HashMap::new();
        collect_schemas(&schema_dir, &mut schemas);
        Self {
            schema_dir,
            schemas,
        }
    }

    /// The directory this store was loaded from.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Number of schemas in the store.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the store holds no schemas.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// File names of all loaded schemas, sorted alphabetically.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Looks up a loaded schema by file name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Builds validation options with every stored schema registered for
    /// `$ref` resolution and a local retriever installed, so validation
    /// never reaches for the network.
    pub fn options(&self) -> ValidationOptions {
        let mut schemas_by_uri: HashMap<String, Value> = HashMap::new();
        for (filename, value) in &self.schemas {
            // Register under the schema's own $id.
            if let Some(id) = value.get("$id").and_then(|v| v.as_str()) {
                schemas_by_uri.insert(id.to_string(), value.clone());
            }
            // Also index by bare filename for relative $ref resolution.
            schemas_by_uri.insert(filename.clone(), value.clone());
        }

        let mut opts = jsonschema::options();
        opts.with_retriever(StoreRetriever { schemas_by_uri });
        opts
    }
}

fn collect_schemas(dir: &Path, schemas: &mut HashMap<String, Value>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(dir = %dir.display(), error = %err, "schema directory not readable");
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            collect_schemas(&path, schemas);
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".schema.json") {
            continue;
        }
        match fs::read_to_string(&path).map_err(|e| e.to_string()).and_then(|content| {
            serde_json::from_str::<Value>(&content).map_err(|e| e.to_string())
        }) {
            Ok(value) => {
                schemas.insert(name.to_string(), value);
            }
            Err(reason) => {
                tracing::warn!(path = %path.display(), %reason, "skipping unloadable schema");
            }
        }
    }
}

/// Resolves `$ref` URIs against the in-memory registry.
///
/// Unknown URIs, draft metaschemas included, resolve to the permissive empty
/// schema instead of triggering a fetch.
struct StoreRetriever {
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for StoreRetriever {
    fn retrieve(&self, uri: &Uri<&str>) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }
        // A URI whose last segment names a stored schema resolves to it.
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.schemas_by_uri.get(filename) {
            return Ok(value.clone());
        }
        Ok(serde_json::json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, File};
    use std::io::Write;

    use serde_json::json;
    use tempfile::TempDir;

    fn write_schema(dir: &Path, name: &str, content: &str) {
        create_dir_all(dir).unwrap();
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn loads_schema_files_by_suffix() {
        let dir = TempDir::new().unwrap();
        let schemas = dir.path().join("schemas");
        write_schema(&schemas, "skill_profile.schema.json", r#"{"type": "object"}"#);
        write_schema(&schemas, "notes.json", r#"{"type": "object"}"#);
        write_schema(&schemas, "repo_profile.schema.json", r#"{"type": "object"}"#);

        let store = SchemaStore::load(&schemas);
        assert_eq!(store.schema_count(), 2);
        assert_eq!(
            store.schema_names(),
            vec!["repo_profile.schema.json", "skill_profile.schema.json"]
        );
        assert!(store.get("skill_profile.schema.json").is_some());
        assert!(store.get("notes.json").is_none());
    }

    #[test]
    fn nested_directories_are_walked() {
        let dir = TempDir::new().unwrap();
        let schemas = dir.path().join("schemas");
        write_schema(&schemas, "a.schema.json", r#"{"type": "object"}"#);
        write_schema(&schemas.join("nested"), "b.schema.json", r#"{"type": "array"}"#);

        let store = SchemaStore::load(&schemas);
        assert_eq!(store.schema_count(), 2);
    }

    #[test]
    fn missing_directory_yields_an_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = SchemaStore::load(dir.path().join("no_such_dir"));
        assert!(store.is_empty());
    }

    #[test]
    fn unparsable_schemas_are_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let schemas = dir.path().join("schemas");
        write_schema(&schemas, "good.schema.json", r#"{"type": "object"}"#);
        write_schema(&schemas, "broken.schema.json", "{ not json");

        let store = SchemaStore::load(&schemas);
        assert_eq!(store.schema_count(), 1);
        assert!(store.get("broken.schema.json").is_none());
    }

    #[test]
    fn cross_schema_refs_resolve_locally() {
        let dir = TempDir::new().unwrap();
        let schemas = dir.path().join("schemas");
        write_schema(
            &schemas,
            "item.schema.json",
            &json!({
                "$id": "https://example.org/schemas/item.schema.json",
                "type": "object",
                "properties": {"name": {"type": "string"}},
                "required": ["name"]
            })
            .to_string(),
        );
        write_schema(
            &schemas,
            "list.schema.json",
            &json!({
                "$id": "https://example.org/schemas/list.schema.json",
                "type": "array",
                "items": {"$ref": "https://example.org/schemas/item.schema.json"}
            })
            .to_string(),
        );

        let store = SchemaStore::load(&schemas);
        let validator = store
            .options()
            .build(store.get("list.schema.json").unwrap())
            .unwrap();
        assert!(validator.is_valid(&json!([{"name": "a"}])));
        assert!(!validator.is_valid(&json!([{"missing": "name"}])));
    }

    #[test]
    fn unknown_refs_fall_back_to_the_permissive_schema() {
        let dir = TempDir::new().unwrap();
        let schemas = dir.path().join("schemas");
        write_schema(
            &schemas,
            "loose.schema.json",
            &json!({
                "type": "object",
                "properties": {
                    "extra": {"$ref": "https://example.org/not-on-disk.schema.json"}
                }
            })
            .to_string(),
        );

        let store = SchemaStore::load(&schemas);
        let validator = store
            .options()
            .build(store.get("loose.schema.json").unwrap())
            .unwrap();
        // The unresolved target accepts anything rather than failing the build.
        assert!(validator.is_valid(&json!({"extra": [1, 2, 3]})));
    }
}
