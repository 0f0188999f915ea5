//! Model declarations and the per-type resolution cache
//!
//! Declarations are read from `*.json` files in a definitions directory (one
//! declaration or an array of declarations per file), or registered directly.
//! A declaration's type is resolved on first use and cached; resolution is a
//! pure function of the declarations, so a racing recomputation yields the
//! same value and is harmless.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ModelError, ModelResult};
use super::model_type::ModelType;
use crate::mapping::MappingSpec;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{Restriction, Schema};
use crate::validation::{ValidationError, Validator};

/// A model type declaration.
///
/// ```json
/// {
///   "name": "OfflineWorker",
///   "extends": "Worker",
///   "exclude": ["email"],
///   "fields": { "desk": { "type": "string" } },
///   "mappings": { "ldap": { "desk": "roomNumber" } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDecl {
    /// Unique type name
    pub name: String,
    /// Ancestor type whose schema is extended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    /// Ancestor fields removed before merging
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    /// Ancestor fields kept before merging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subset: Option<Vec<String>>,
    /// Own field declarations and overrides
    #[serde(default)]
    pub fields: Schema,
    /// Own named mappings; inherited ones with the same name are replaced
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mappings: BTreeMap<String, MappingSpec>,
}

impl ModelDecl {
    pub fn new(name: impl Into<String>, fields: Schema) -> Self {
        Self {
            name: name.into(),
            fields,
            ..Self::default()
        }
    }

    pub fn extending(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    pub fn excluding(mut self, names: &[&str]) -> Self {
        self.exclude = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn subsetting(mut self, names: &[&str]) -> Self {
        self.subset = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn with_mapping(mut self, name: impl Into<String>, spec: MappingSpec) -> Self {
        self.mappings.insert(name.into(), spec);
        self
    }

    pub fn restriction(&self) -> Restriction {
        Restriction {
            exclude: self.exclude.clone(),
            subset: self.subset.clone(),
        }
    }

    /// Validates the declaration itself (not the types it refers to)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("declaration must have a non-empty 'name'".into());
        }

        if self.extends.is_none() && !self.restriction().is_empty() {
            return Err(format!(
                "'{}' uses exclude/subset without 'extends'",
                self.name
            ));
        }

        if self.extends.as_deref() == Some(self.name.as_str()) {
            return Err(format!("'{}' cannot extend itself", self.name));
        }

        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DefinitionFile {
    One(ModelDecl),
    Many(Vec<ModelDecl>),
}

/// Registry of model declarations with a resolved-type cache.
#[derive(Debug)]
pub struct ModelRegistry {
    /// Directory containing definition files
    definitions_dir: PathBuf,
    /// Declarations by name
    declarations: BTreeMap<String, ModelDecl>,
    /// Resolved types by name
    cache: RwLock<HashMap<String, ModelType>>,
}

impl ModelRegistry {
    /// Creates an empty registry reading definitions from `definitions_dir`.
    pub fn new(definitions_dir: &Path) -> Self {
        Self {
            definitions_dir: definitions_dir.to_path_buf(),
            declarations: BTreeMap::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the definitions directory path.
    pub fn definitions_dir(&self) -> &Path {
        &self.definitions_dir
    }

    /// Loads every `*.json` file in the definitions directory, in file name
    /// order.
    pub fn load_all(&mut self) -> ModelResult<()> {
        let dir_name = self.definitions_dir.display().to_string();

        let entries = fs::read_dir(&self.definitions_dir).map_err(|e| {
            ModelError::definition(
                &dir_name,
                format!("Failed to read definitions directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                ModelError::definition(&dir_name, format!("Failed to read directory entry: {}", e))
            })?;
            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        let before = self.declarations.len();
        for path in &paths {
            self.load_definition_file(path)?;
        }

        let loaded = (self.declarations.len() - before).to_string();
        let files = paths.len().to_string();
        log_event_with_fields(
            Event::DefinitionsLoaded,
            &[
                ("dir", dir_name.as_str()),
                ("files", files.as_str()),
                ("models", loaded.as_str()),
            ],
        );

        Ok(())
    }

    /// Loads a single definition file.
    fn load_definition_file(&mut self, path: &Path) -> ModelResult<()> {
        let source_name = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| {
            ModelError::definition(&source_name, format!("Failed to read file: {}", e))
        })?;

        let file: DefinitionFile = serde_json::from_str(&content).map_err(|e| {
            ModelError::definition(&source_name, format!("Invalid JSON: {}", e))
        })?;

        let declarations = match file {
            DefinitionFile::One(decl) => vec![decl],
            DefinitionFile::Many(decls) => decls,
        };

        for decl in declarations {
            self.register_from(decl, &source_name)?;
        }

        Ok(())
    }

    /// Registers a declaration directly (for tests or programmatic use).
    pub fn register(&mut self, decl: ModelDecl) -> ModelResult<()> {
        self.register_from(decl, "<in-memory>")
    }

    fn register_from(&mut self, decl: ModelDecl, source_name: &str) -> ModelResult<()> {
        decl.validate_structure()
            .map_err(|reason| ModelError::definition(source_name, reason))?;

        if self.declarations.contains_key(&decl.name) {
            return Err(ModelError::DuplicateModel(decl.name));
        }

        log_event_with_fields(
            Event::ModelRegistered,
            &[("model", decl.name.as_str()), ("source", source_name)],
        );
        self.declarations.insert(decl.name.clone(), decl);
        Ok(())
    }

    /// Gets a declaration by name.
    pub fn declaration(&self, name: &str) -> Option<&ModelDecl> {
        self.declarations.get(name)
    }

    /// Declared names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declarations.keys().map(String::as_str)
    }

    /// Returns the number of declarations.
    pub fn model_count(&self) -> usize {
        self.declarations.len()
    }

    /// Resolves a declared type, using the cache when possible.
    ///
    /// # Errors
    ///
    /// - `UnknownModel` if the name (or an ancestor) is not declared
    /// - `CyclicDeclaration` if `extends` loops
    /// - Derivation and mapping errors from the declaration chain
    pub fn resolve(&self, name: &str) -> ModelResult<ModelType> {
        self.resolve_with(name, &mut Vec::new())
    }

    fn resolve_with(&self, name: &str, visiting: &mut Vec<String>) -> ModelResult<ModelType> {
        if let Some(model) = self.cached(name) {
            return Ok(model);
        }

        if visiting.iter().any(|v| v == name) {
            return Err(ModelError::CyclicDeclaration(name.to_string()));
        }

        let decl = self
            .declarations
            .get(name)
            .ok_or_else(|| ModelError::UnknownModel(name.to_string()))?;

        visiting.push(name.to_string());
        let mut model = match &decl.extends {
            Some(parent_name) => {
                let parent = self.resolve_with(parent_name, visiting)?;
                let restriction = decl.restriction();
                let base = if restriction.is_empty() {
                    parent
                } else {
                    parent.restrict(&restriction)?
                };
                base.extend(&decl.name, decl.fields.clone())
            }
            None => ModelType::define(&decl.name, decl.fields.clone()),
        };
        for (mapping_name, spec) in &decl.mappings {
            model = model.with_mapping(mapping_name, spec.clone())?;
        }
        visiting.pop();

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(cache.entry(name.to_string()).or_insert(model).clone())
    }

    fn cached(&self, name: &str) -> Option<ModelType> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache.get(name).cloned()
    }

    /// Validates a raw document as the named type, reading fields under their
    /// own names.
    ///
    /// Unlike `Instance::validate`, this fails hard when the type cannot be
    /// resolved.
    pub fn validate_document(
        &self,
        name: &str,
        document: &Value,
        validator: &Validator<'_>,
    ) -> ModelResult<Vec<ValidationError>> {
        let model = self.resolve(name)?;
        Ok(model.from_data(document)?.validate_with(validator))
    }
}
