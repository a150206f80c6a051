//! Schema of the user-authored `propel` configuration section

use indexmap::IndexMap;
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Root alias under which the section may be nested in a config file.
pub const ROOT_NODE: &str = "propel";

/// The `propel` section as written by the user, before normalization.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Absolute path to the Propel ORM library
    pub path: Option<String>,

    /// Absolute path to the Phing classes
    pub phing_path: Option<String>,

    /// Enable query logging (default: false)
    pub logging: Option<bool>,

    /// Directory holding `*schema.xml` files
    pub schema_path: Option<String>,

    /// Flat build settings. Ignored unless it is a mapping.
    pub build_properties: Option<Value>,

    /// Behavior name to class. Ignored unless it is a mapping.
    pub behaviors: Option<Value>,

    pub dbal: Option<DbalSection>,
}

/// `dbal` section.
///
/// The connection fields may also sit directly under `dbal`; they describe
/// the single implicit connection used when `connections` is empty.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DbalSection {
    pub default_connection: Option<String>,

    pub connections: IndexMap<String, ConnectionSection>,

    #[serde(flatten)]
    pub connection: ConnectionSection,
}

impl DbalSection {
    /// True when the section declares nothing at all.
    pub fn is_empty(&self) -> bool {
        self == &DbalSection::default()
    }
}

/// One entry of `dbal.connections`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConnectionSection {
    #[serde(deserialize_with = "scalar_string")]
    pub driver: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub dsn: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub user: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub password: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub classname: Option<String>,
    pub options: Option<Value>,
    pub attributes: Option<Value>,
    pub settings: Option<Value>,
    pub model_paths: Option<Value>,
    pub slaves: Option<Value>,
}

/// Accept any scalar (`password: 123456`) as a string; reject lists and maps.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Array(_)) => Err(de::Error::invalid_type(Unexpected::Seq, &"a string")),
        Some(Value::Object(_)) => Err(de::Error::invalid_type(Unexpected::Map, &"a string")),
    }
}
