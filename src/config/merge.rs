//! Configuration merging logic
//!
//! Priority: CLI args > later config files > earlier config files > defaults

use serde_json::Value;

use super::schema::{ConnectionSection, DbalSection, RawConfig};

/// CLI options that can override config file settings.
///
/// Uses `Option<T>` to distinguish "not specified" from "explicitly set".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub path: Option<String>,
    pub phing_path: Option<String>,
    pub schema_path: Option<String>,
    pub logging: Option<bool>,
}

/// Fold config files in order; each one overrides what came before it.
pub fn merge_raw_configs<I>(configs: I) -> RawConfig
where
    I: IntoIterator<Item = RawConfig>,
{
    configs.into_iter().fold(RawConfig::default(), merge_raw)
}

fn merge_raw(base: RawConfig, overlay: RawConfig) -> RawConfig {
    RawConfig {
        path: overlay.path.or(base.path),
        phing_path: overlay.phing_path.or(base.phing_path),
        logging: overlay.logging.or(base.logging),
        schema_path: overlay.schema_path.or(base.schema_path),
        build_properties: merge_mappings(base.build_properties, overlay.build_properties),
        behaviors: merge_mappings(base.behaviors, overlay.behaviors),
        dbal: match (base.dbal, overlay.dbal) {
            (Some(base), Some(overlay)) => Some(merge_dbal(base, overlay)),
            (base, overlay) => overlay.or(base),
        },
    }
}

/// Mappings merge key by key; anything else is replaced wholesale.
fn merge_mappings(base: Option<Value>, overlay: Option<Value>) -> Option<Value> {
    match (base, overlay) {
        (Some(Value::Object(mut base)), Some(Value::Object(overlay))) => {
            base.extend(overlay);
            Some(Value::Object(base))
        }
        (base, overlay) => overlay.or(base),
    }
}

fn merge_dbal(base: DbalSection, overlay: DbalSection) -> DbalSection {
    let mut connections = base.connections;
    // Connections with the same name are replaced, not merged.
    connections.extend(overlay.connections);

    DbalSection {
        default_connection: overlay.default_connection.or(base.default_connection),
        connections,
        connection: merge_connection(base.connection, overlay.connection),
    }
}

fn merge_connection(base: ConnectionSection, overlay: ConnectionSection) -> ConnectionSection {
    ConnectionSection {
        driver: overlay.driver.or(base.driver),
        dsn: overlay.dsn.or(base.dsn),
        user: overlay.user.or(base.user),
        password: overlay.password.or(base.password),
        classname: overlay.classname.or(base.classname),
        options: overlay.options.or(base.options),
        attributes: overlay.attributes.or(base.attributes),
        settings: overlay.settings.or(base.settings),
        model_paths: overlay.model_paths.or(base.model_paths),
        slaves: overlay.slaves.or(base.slaves),
    }
}

/// Apply CLI overrides on top of the merged file configuration.
pub fn apply_overrides(raw: RawConfig, cli: &CliOverrides) -> RawConfig {
    RawConfig {
        path: cli.path.clone().or(raw.path),
        phing_path: cli.phing_path.clone().or(raw.phing_path),
        schema_path: cli.schema_path.clone().or(raw.schema_path),
        logging: cli.logging.or(raw.logging),
        ..raw
    }
}
