use std::path::PathBuf;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::{ConnectionSection, DbalSection, RawConfig};
use crate::error::NormalizeError;
use crate::parameters::{
    ConnectionParameters, DataSource, DataSourceEntry, DbalParameters, ResolvedParameters,
    Slaves, DEFAULT_ALIAS,
};
use crate::probe::{PathProbe, VendorLayout};

/// Reshape user configuration into resolved parameters.
///
/// `path` and `phing_path` come from the configuration when set, otherwise
/// from the conventional vendor location if `probe` reports it exists.
/// Checks run in order `path`, `phing_path`, then `dbal`; the first failure wins.
pub fn normalize<P>(
    raw: &RawConfig,
    layout: &VendorLayout,
    probe: &P,
) -> Result<ResolvedParameters, NormalizeError>
where
    P: PathProbe + ?Sized,
{
    let path = resolve_vendor_path(raw.path.as_deref(), layout.propel_path(), probe)
        .ok_or(NormalizeError::MissingRequiredField {
            field: "path",
            library: "Propel ORM",
        })?;
    let phing_path = resolve_vendor_path(raw.phing_path.as_deref(), layout.phing_path(), probe)
        .ok_or(NormalizeError::MissingRequiredField {
            field: "phing_path",
            library: "Phing",
        })?;

    let dbal = match &raw.dbal {
        Some(dbal) if !dbal.is_empty() => Some(normalize_dbal(dbal)?),
        _ => None,
    };

    Ok(ResolvedParameters {
        path,
        phing_path,
        logging: raw.logging.unwrap_or(layout.debug()),
        schema_path: raw.schema_path.clone().filter(|p| !p.is_empty()),
        build_properties: build_properties(raw),
        dbal,
    })
}

fn resolve_vendor_path<P>(explicit: Option<&str>, conventional: PathBuf, probe: &P) -> Option<PathBuf>
where
    P: PathProbe + ?Sized,
{
    match explicit {
        Some(path) => Some(PathBuf::from(path)),
        None if probe.exists(&conventional) => Some(conventional),
        None => None,
    }
}

/// `build_properties` plus one `behavior.<name>.class` entry per behavior.
///
/// Behaviors are applied last and overwrite colliding keys.
fn build_properties(raw: &RawConfig) -> IndexMap<String, String> {
    let mut properties: IndexMap<String, String> = match &raw.build_properties {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| (k.clone(), scalar_to_string(v)))
            .collect(),
        _ => IndexMap::new(),
    };

    if let Some(Value::Object(behaviors)) = &raw.behaviors {
        for (name, class) in behaviors {
            properties.insert(format!("behavior.{name}.class"), scalar_to_string(class));
        }
    }

    properties
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Emptiness the way a loosely typed config reader sees it.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}

/// Normalize the `dbal` section into named datasources.
///
/// With no declared connections, the section itself becomes the single
/// connection, named after the default connection.
pub fn normalize_dbal(dbal: &DbalSection) -> Result<DbalParameters, NormalizeError> {
    let explicit_default = dbal
        .default_connection
        .as_deref()
        .filter(|name| !name.is_empty());
    let default_connection = explicit_default
        .or_else(|| dbal.connections.keys().next().map(String::as_str))
        .unwrap_or(DEFAULT_ALIAS)
        .to_string();

    let mut datasources = IndexMap::new();
    if dbal.connections.is_empty() {
        datasources.insert(
            default_connection.clone(),
            DataSourceEntry::DataSource(data_source(&default_connection, &dbal.connection)?),
        );
    } else {
        for (name, conf) in &dbal.connections {
            datasources.insert(name.clone(), DataSourceEntry::DataSource(data_source(name, conf)?));
        }
        if !datasources.contains_key(&default_connection) {
            return Err(NormalizeError::UnknownDefaultConnection {
                name: default_connection,
                available: dbal
                    .connections
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
    }

    datasources
        .entry(DEFAULT_ALIAS.to_string())
        .or_insert_with(|| DataSourceEntry::Alias(default_connection.clone()));

    Ok(DbalParameters {
        default_connection,
        datasources,
    })
}

fn data_source(name: &str, conf: &ConnectionSection) -> Result<DataSource, NormalizeError> {
    let adapter = conf
        .driver
        .as_deref()
        .filter(|driver| !driver.is_empty())
        .ok_or_else(|| NormalizeError::MissingDriver {
            connection: name.to_string(),
        })?;

    let slaves = conf
        .slaves
        .as_ref()
        .filter(|s| !is_blank(s))
        .map(|s| Slaves {
            connection: s.clone(),
        });

    Ok(DataSource {
        adapter: adapter.to_string(),
        slaves,
        connection: ConnectionParameters {
            dsn: conf.dsn.clone(),
            user: conf.user.clone(),
            password: conf.password.clone(),
            classname: conf.classname.clone(),
            options: conf.options.clone(),
            attributes: conf.attributes.clone(),
            settings: conf.settings.clone(),
            model_paths: conf.model_paths.clone(),
        },
    })
}
