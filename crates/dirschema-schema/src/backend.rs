// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `jsonschema`-backed [`dirschema_core::validator::JsonValidator`]
//! implementation: fetches schema bodies (local reads, `http(s)://` via
//! `ureq`), compiles them with `jsonschema`, and memoizes the compiled
//! validator across paths (spec §5: "compiled regexes and resolved schemas
//! should be memoized inside the Evaluator across paths").

use crate::error::SchemaError;
use crate::plugin::PluginRegistry;
use dirschema_core::adapter::TreeAdapter;
use dirschema_core::error::ValidationError;
use dirschema_core::resolver::ResolvedSchema;
use dirschema_core::validator::JsonValidator;
use jsonschema::Validator;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// A `JsonValidator` backed by the `jsonschema` crate. One instance is
/// constructed per run and shared across every path: `compiled` caches a
/// `Validator` per distinct schema location so a `valid`/`validMeta` rule
/// repeated across a large tree compiles its schema once.
pub struct JsonSchemaValidator {
    compiled: RwLock<HashMap<String, Arc<Validator>>>,
    plugins: PluginRegistry,
}

impl JsonSchemaValidator {
    pub fn new(plugins: PluginRegistry) -> Self {
        Self {
            compiled: RwLock::new(HashMap::new()),
            plugins,
        }
    }

    fn cache_key(resolved: &ResolvedSchema) -> String {
        match resolved {
            ResolvedSchema::Inline(value) => format!("inline:{value}"),
            ResolvedSchema::LocalFile(path) => format!("file:{}", path.display()),
            ResolvedSchema::Remote(uri) => format!("remote:{uri}"),
            ResolvedSchema::Plugin { validator, argument } => format!("plugin:{validator}:{argument}"),
        }
    }

    fn load_schema_value(resolved: &ResolvedSchema) -> Result<Value, SchemaError> {
        match resolved {
            ResolvedSchema::Inline(value) => Ok(value.clone()),
            ResolvedSchema::LocalFile(path) => read_local(path),
            ResolvedSchema::Remote(uri) => fetch_remote(uri),
            ResolvedSchema::Plugin { .. } => unreachable!("plugin refs never reach load_schema_value"),
        }
    }

    fn get_or_compile(&self, resolved: &ResolvedSchema) -> Result<Arc<Validator>, SchemaError> {
        let key = Self::cache_key(resolved);
        if let Some(hit) = self.compiled.read().expect("compiled schema cache poisoned").get(&key) {
            return Ok(Arc::clone(hit));
        }

        tracing::debug!(schema = %key, "compiling schema");
        let location = key.clone();
        let value = Self::load_schema_value(resolved)?;
        let validator = jsonschema::validator_for(&value).map_err(|e| SchemaError::Compile {
            location,
            message: e.to_string(),
        })?;
        let validator = Arc::new(validator);

        self.compiled
            .write()
            .expect("compiled schema cache poisoned")
            .insert(key, Arc::clone(&validator));
        Ok(validator)
    }
}

fn read_local(path: &Path) -> Result<Value, SchemaError> {
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::ReadLocal {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SchemaError::Parse {
        location: path.display().to_string(),
        source,
    })
}

fn fetch_remote(uri: &str) -> Result<Value, SchemaError> {
    let body = ureq::get(uri).call().map_err(|e| SchemaError::Fetch {
        uri: uri.to_string(),
        message: e.to_string(),
    })?;
    let text = body.into_string().map_err(|e| SchemaError::Fetch {
        uri: uri.to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|source| SchemaError::Parse {
        location: uri.to_string(),
        source,
    })
}

impl JsonValidator for JsonSchemaValidator {
    fn validate(&self, schema: &ResolvedSchema, value: &Value) -> Result<(), ValidationError> {
        if let ResolvedSchema::Plugin { validator, .. } = schema {
            return Err(ValidationError::new(format!(
                "`v#{validator}://...` is a plugin reference and cannot be validated by the JSON Schema backend"
            )));
        }

        let validator = self.get_or_compile(schema).map_err(ValidationError::from)?;
        let messages: Vec<String> = validator.iter_errors(value).map(|e| e.to_string()).collect();
        if messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(messages.join("; ")))
        }
    }

    fn run_plugin(
        &self,
        name: &str,
        argument: &str,
        target_path: &str,
        adapter: &dyn TreeAdapter,
    ) -> Result<(), ValidationError> {
        match self.plugins.get(name) {
            Some(plugin) => plugin.validate(target_path, argument, adapter),
            None => Err(SchemaError::UnknownPlugin(name.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use dirschema_core::adapter::AdapterError;
    use serde_json::json;

    struct EmptyAdapter;
    impl TreeAdapter for EmptyAdapter {
        fn enumerate(&self) -> Result<Vec<String>, AdapterError> {
            Ok(vec![String::new()])
        }
        fn is_file(&self, _path: &str) -> bool {
            false
        }
        fn is_dir(&self, _path: &str) -> bool {
            false
        }
        fn exists(&self, _path: &str) -> bool {
            false
        }
        fn load_json(&self, path: &str) -> Result<Value, AdapterError> {
            Err(format!("{path}: does not exist").into())
        }
    }

    #[test]
    fn validates_inline_schema() {
        let validator = JsonSchemaValidator::new(PluginRegistry::new());
        let schema = ResolvedSchema::Inline(json!({"type": "object"}));
        assert!(validator.validate(&schema, &json!({})).is_ok());
        assert!(validator.validate(&schema, &json!([])).is_err());
    }

    #[test]
    fn caches_compiled_schema_across_calls() {
        let validator = JsonSchemaValidator::new(PluginRegistry::new());
        let schema = ResolvedSchema::Inline(json!({"type": "string"}));
        assert!(validator.validate(&schema, &json!("a")).is_ok());
        assert!(validator.validate(&schema, &json!("b")).is_ok());
        assert_eq!(validator.compiled.read().unwrap().len(), 1);
    }

    #[test]
    fn reads_local_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, r#"{"type": "number"}"#).unwrap();
        let validator = JsonSchemaValidator::new(PluginRegistry::new());
        let schema = ResolvedSchema::LocalFile(path);
        assert!(validator.validate(&schema, &json!(1)).is_ok());
        assert!(validator.validate(&schema, &json!("x")).is_err());
    }

    #[test]
    fn plugin_ref_rejected_by_validate() {
        let validator = JsonSchemaValidator::new(PluginRegistry::new());
        let schema = ResolvedSchema::Plugin {
            validator: "enum".to_string(),
            argument: "colors".to_string(),
        };
        assert!(validator.validate(&schema, &json!(1)).is_err());
    }

    #[test]
    fn run_plugin_reports_unknown_name() {
        let validator = JsonSchemaValidator::new(PluginRegistry::new());
        let adapter = EmptyAdapter;
        assert!(validator.run_plugin("missing", "arg", "path", &adapter).is_err());
    }
}
