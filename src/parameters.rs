//! Resolved parameters and the store they are registered into

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::ROOT_NODE;

/// Key under which the default connection is aliased.
pub const DEFAULT_ALIAS: &str = "default";

/// Output of [`normalize`](crate::normalize).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedParameters {
    pub path: PathBuf,
    pub phing_path: PathBuf,
    pub logging: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_path: Option<String>,
    pub build_properties: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbal: Option<DbalParameters>,
}

/// Normalized `dbal` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DbalParameters {
    pub default_connection: String,
    pub datasources: IndexMap<String, DataSourceEntry>,
}

impl DbalParameters {
    /// Look up a datasource by name, following aliases.
    pub fn resolve(&self, name: &str) -> Option<&DataSource> {
        let mut current = name;
        // An alias chain can never be longer than the map without looping.
        for _ in 0..=self.datasources.len() {
            match self.datasources.get(current)? {
                DataSourceEntry::DataSource(ds) => return Some(ds),
                DataSourceEntry::Alias(target) => current = target.as_str(),
            }
        }
        None
    }

    /// The datasource the `default` key points at.
    pub fn default_datasource(&self) -> Option<&DataSource> {
        self.resolve(DEFAULT_ALIAS)
    }

    /// Number of real (non-alias) datasources.
    pub fn datasource_count(&self) -> usize {
        self.datasources
            .values()
            .filter(|e| matches!(e, DataSourceEntry::DataSource(_)))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataSourceEntry {
    DataSource(DataSource),
    /// Name of another datasource
    Alias(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSource {
    pub adapter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slaves: Option<Slaves>,
    #[serde(skip_serializing_if = "ConnectionParameters::is_empty")]
    pub connection: ConnectionParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slaves {
    pub connection: Value,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ConnectionParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dsn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_paths: Option<Value>,
}

impl ConnectionParameters {
    pub fn is_empty(&self) -> bool {
        self == &ConnectionParameters::default()
    }
}

/// The only contract required from the host environment.
pub trait ParameterStore {
    fn set_parameter(&mut self, name: &str, value: Value);
    fn has_parameter(&self, name: &str) -> bool;
    fn get_parameter(&self, name: &str) -> Option<&Value>;
}

/// Ordered in-memory [`ParameterStore`].
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterBag {
    parameters: IndexMap<String, Value>,
}

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl ParameterStore for ParameterBag {
    fn set_parameter(&mut self, name: &str, value: Value) {
        self.parameters.insert(name.to_string(), value);
    }

    fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    fn get_parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }
}

fn key(name: &str) -> String {
    format!("{ROOT_NODE}.{name}")
}

impl ResolvedParameters {
    /// Write every parameter into `store` under the `propel.` prefix.
    pub fn register<S>(&self, store: &mut S) -> Result<(), serde_json::Error>
    where
        S: ParameterStore + ?Sized,
    {
        store.set_parameter(
            &key("path"),
            Value::String(self.path.to_string_lossy().into_owned()),
        );
        store.set_parameter(
            &key("phing_path"),
            Value::String(self.phing_path.to_string_lossy().into_owned()),
        );
        store.set_parameter(&key("logging"), Value::Bool(self.logging));

        if let Some(schema_path) = &self.schema_path {
            store.set_parameter(&key("schema.path"), Value::String(schema_path.clone()));
        }

        store.set_parameter(
            &key("build_properties"),
            serde_json::to_value(&self.build_properties)?,
        );

        if let Some(dbal) = &self.dbal {
            store.set_parameter(
                &key("dbal.default_connection"),
                Value::String(dbal.default_connection.clone()),
            );
            store.set_parameter(
                &key("dbal"),
                json!({ "datasources": serde_json::to_value(&dbal.datasources)? }),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mysql(dsn: &str) -> DataSource {
        DataSource {
            adapter: "mysql".to_string(),
            slaves: None,
            connection: ConnectionParameters {
                dsn: Some(dsn.to_string()),
                ..Default::default()
            },
        }
    }

    fn params(dbal: Option<DbalParameters>) -> ResolvedParameters {
        ResolvedParameters {
            path: PathBuf::from("/vendor/propel"),
            phing_path: PathBuf::from("/vendor/phing"),
            logging: false,
            schema_path: None,
            build_properties: IndexMap::new(),
            dbal,
        }
    }

    #[test]
    fn test_register_minimal() {
        let mut bag = ParameterBag::new();
        params(None).register(&mut bag).unwrap();

        assert_eq!(bag.get_parameter("propel.path"), Some(&json!("/vendor/propel")));
        assert_eq!(bag.get_parameter("propel.phing_path"), Some(&json!("/vendor/phing")));
        assert_eq!(bag.get_parameter("propel.logging"), Some(&json!(false)));
        assert_eq!(bag.get_parameter("propel.build_properties"), Some(&json!({})));
        assert!(!bag.has_parameter("propel.schema.path"));
        assert!(!bag.has_parameter("propel.dbal"));
        assert!(!bag.has_parameter("propel.dbal.default_connection"));
        assert_eq!(bag.len(), 4);
    }

    #[test]
    fn test_register_dbal_and_schema_path() {
        let mut datasources = IndexMap::new();
        datasources.insert(
            "main".to_string(),
            DataSourceEntry::DataSource(mysql("mysql:dbname=app")),
        );
        datasources.insert(
            DEFAULT_ALIAS.to_string(),
            DataSourceEntry::Alias("main".to_string()),
        );
        let mut resolved = params(Some(DbalParameters {
            default_connection: "main".to_string(),
            datasources,
        }));
        resolved.schema_path = Some("src/schema".to_string());

        let mut bag = ParameterBag::new();
        resolved.register(&mut bag).unwrap();

        assert_eq!(bag.get_parameter("propel.schema.path"), Some(&json!("src/schema")));
        assert_eq!(
            bag.get_parameter("propel.dbal.default_connection"),
            Some(&json!("main"))
        );
        assert_eq!(
            bag.get_parameter("propel.dbal"),
            Some(&json!({
                "datasources": {
                    "main": {
                        "adapter": "mysql",
                        "connection": { "dsn": "mysql:dbname=app" }
                    },
                    "default": "main"
                }
            }))
        );
    }

    #[test]
    fn test_empty_connection_is_omitted() {
        let ds = DataSource {
            adapter: "sqlite".to_string(),
            slaves: None,
            connection: ConnectionParameters::default(),
        };
        assert_eq!(serde_json::to_value(&ds).unwrap(), json!({ "adapter": "sqlite" }));
    }

    #[test]
    fn test_resolve_follows_aliases() {
        let mut datasources = IndexMap::new();
        datasources.insert("main".to_string(), DataSourceEntry::DataSource(mysql("a")));
        datasources.insert("primary".to_string(), DataSourceEntry::Alias("main".to_string()));
        datasources.insert(
            DEFAULT_ALIAS.to_string(),
            DataSourceEntry::Alias("primary".to_string()),
        );
        let dbal = DbalParameters {
            default_connection: "primary".to_string(),
            datasources,
        };

        assert_eq!(dbal.default_datasource(), Some(&mysql("a")));
        assert_eq!(dbal.datasource_count(), 1);
        assert_eq!(dbal.resolve("missing"), None);
    }

    #[test]
    fn test_resolve_stops_on_alias_cycle() {
        let mut datasources = IndexMap::new();
        datasources.insert("a".to_string(), DataSourceEntry::Alias("b".to_string()));
        datasources.insert("b".to_string(), DataSourceEntry::Alias("a".to_string()));
        let dbal = DbalParameters {
            default_connection: "a".to_string(),
            datasources,
        };

        assert_eq!(dbal.resolve("a"), None);
    }

    #[test]
    fn test_bag_preserves_insertion_order() {
        let mut bag = ParameterBag::new();
        bag.set_parameter("z", json!(1));
        bag.set_parameter("a", json!(2));
        bag.set_parameter("z", json!(3));

        let keys: Vec<&str> = bag.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(bag.get_parameter("z"), Some(&json!(3)));
    }
}
