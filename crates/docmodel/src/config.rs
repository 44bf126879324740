//! Model type configuration and builder
//!
//! A [`ModelConfig`] binds a model name to its optional collaborators: the
//! schema, the identifier field paths, the validator and the collection.
//! Static mistakes are rejected by [`ModelConfigBuilder::build`]; missing
//! collaborators are reported when an operation needs them.

use std::fmt;
use std::sync::Arc;

use docmodel_validation::Validator;

use crate::collection::{Collection, Database};
use crate::error::{ModelError, ModelResult};
use crate::schema::ModelSchema;

/// Configuration of a model type
#[derive(Clone)]
pub struct ModelConfig {
    name: String,
    schema: Option<ModelSchema>,
    rids: Option<Vec<String>>,
    validator: Option<Arc<dyn Validator>>,
    collection: Option<Arc<dyn Collection>>,
}

impl ModelConfig {
    pub fn builder(name: impl Into<String>) -> ModelConfigBuilder {
        ModelConfigBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&ModelSchema> {
        self.schema.as_ref()
    }

    /// Field paths the identifier of a new document is derived from
    pub fn rids(&self) -> Option<&[String]> {
        self.rids.as_deref()
    }

    pub fn validator(&self) -> Option<&Arc<dyn Validator>> {
        self.validator.as_ref()
    }

    pub fn collection(&self) -> Option<&Arc<dyn Collection>> {
        self.collection.as_ref()
    }

    /// Collection name used when resolving through a [`Database`]
    pub fn collection_name(&self) -> String {
        collection_name(&self.name, self.schema.as_ref())
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("name", &self.name)
            .field("schema", &self.schema.as_ref().map(|schema| &schema.meta_schema.name))
            .field("rids", &self.rids)
            .field("validator", &self.validator.as_ref().map(|validator| validator.name()))
            .field("collection", &self.collection.as_ref().map(|collection| collection.name()))
            .finish()
    }
}

fn collection_name(model: &str, schema: Option<&ModelSchema>) -> String {
    match schema {
        Some(schema) => schema.collection_name().to_string(),
        None => model.to_lowercase(),
    }
}

/// Builder for [`ModelConfig`]
pub struct ModelConfigBuilder {
    name: String,
    schema: Option<ModelSchema>,
    rids: Option<Vec<String>>,
    validator: Option<Arc<dyn Validator>>,
    collection: Option<Arc<dyn Collection>>,
    database: Option<Arc<dyn Database>>,
}

impl ModelConfigBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            rids: None,
            validator: None,
            collection: None,
            database: None,
        }
    }

    pub fn schema(mut self, schema: ModelSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Identifier field paths; these take precedence over `metaSchema.rids`
    pub fn rids<I, S>(mut self, rids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rids = Some(rids.into_iter().map(Into::into).collect());
        self
    }

    pub fn validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Use this collection directly
    pub fn collection(mut self, collection: Arc<dyn Collection>) -> Self {
        self.collection = Some(collection);
        self
    }

    /// Resolve the collection from a database by the schema's `base` name,
    /// or by the lower-cased model name without a schema. An explicit
    /// [`collection`](Self::collection) wins.
    pub fn database(mut self, database: Arc<dyn Database>) -> Self {
        self.database = Some(database);
        self
    }

    pub fn build(self) -> ModelResult<ModelConfig> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Configuration("model name must not be empty".to_string()));
        }

        if self.validator.is_some() && self.schema.is_none() {
            return Err(ModelError::Configuration(format!(
                "model class {} has a validator but no schema",
                self.name
            )));
        }

        let rids = self
            .rids
            .or_else(|| self.schema.as_ref().and_then(|schema| schema.rids().map(<[String]>::to_vec)));
        if let Some(rids) = &rids {
            validate_rids(&self.name, rids)?;
        }

        let collection = match (self.collection, self.database) {
            (Some(collection), _) => Some(collection),
            (None, Some(database)) => Some(database.collection(&collection_name(&self.name, self.schema.as_ref()))),
            (None, None) => None,
        };

        Ok(ModelConfig {
            name: self.name,
            schema: self.schema,
            rids,
            validator: self.validator,
            collection,
        })
    }
}

fn validate_rids(model: &str, rids: &[String]) -> ModelResult<()> {
    if rids.is_empty() {
        return Err(ModelError::Configuration(format!(
            "rids of model class {} must name at least one field path",
            model
        )));
    }

    for rid in rids {
        if rid.is_empty() || rid.split('.').any(str::is_empty) {
            return Err(ModelError::Configuration(format!(
                "invalid rid '{}' for model class {}",
                rid, model
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::MemoryDatabase;
    use crate::schema::MetaSchema;
    use docmodel_validation::JsonSchemaValidator;
    use serde_json::json;

    fn schema() -> ModelSchema {
        ModelSchema::new(
            MetaSchema::new("user").base("entity").rids(["name"]),
            json!({ "type": "object" }),
        )
    }

    #[test]
    fn test_minimal_config() {
        let config = ModelConfig::builder("User").build().unwrap();
        assert_eq!(config.name(), "User");
        assert!(config.validator().is_none());
        assert!(config.collection().is_none());
        assert!(config.rids().is_none());
        assert_eq!(config.collection_name(), "user");
    }

    #[test]
    fn test_rejects_empty_name() {
        let err = ModelConfig::builder("  ").build().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_validator_requires_schema() {
        let err = ModelConfig::builder("User")
            .validator(Arc::new(JsonSchemaValidator::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::Configuration(_)));
    }

    #[test]
    fn test_rejects_malformed_rids() {
        for rids in [vec![], vec!["".to_string()], vec!["person..name".to_string()], vec!["name.".to_string()]] {
            let err = ModelConfig::builder("User").rids(rids).build().unwrap_err();
            assert!(err.is_configuration());
        }
    }

    #[test]
    fn test_rids_from_meta_schema_and_override() {
        let config = ModelConfig::builder("User").schema(schema()).build().unwrap();
        assert_eq!(config.rids(), Some(&["name".to_string()][..]));

        let config = ModelConfig::builder("User")
            .schema(schema())
            .rids(["person.name", "person.age"])
            .build()
            .unwrap();
        assert_eq!(config.rids().unwrap().len(), 2);
    }

    #[test]
    fn test_collection_resolved_by_base() {
        let database = Arc::new(MemoryDatabase::new());
        let config = ModelConfig::builder("User")
            .schema(schema())
            .database(database.clone())
            .build()
            .unwrap();

        assert_eq!(config.collection().unwrap().name(), "entity");
        assert_eq!(database.collection_names(), vec!["entity".to_string()]);
    }

    #[test]
    fn test_collection_resolved_by_model_name() {
        let database = Arc::new(MemoryDatabase::new());
        let config = ModelConfig::builder("User").database(database).build().unwrap();
        assert_eq!(config.collection().unwrap().name(), "user");
    }

    #[test]
    fn test_debug_lists_collaborators() {
        let config = ModelConfig::builder("User")
            .schema(schema())
            .validator(Arc::new(JsonSchemaValidator::new()))
            .build()
            .unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("json-schema"));
        assert!(debug.contains("\"user\""));
    }
}
