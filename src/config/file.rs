//! Config file discovery and loading

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use super::schema::{RawConfig, ROOT_NODE};

/// File names searched for, in order of preference within one directory.
pub const CONFIG_FILE_NAMES: [&str; 4] = ["propel.toml", "propel.yaml", "propel.yml", "propel.json"];

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// The file parsed but does not fit the `propel` section schema.
    #[error("invalid configuration: {0}")]
    Schema(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from the file extension, defaulting to TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => ConfigFormat::Yaml,
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Search upward from `start_dir` for the first of `filenames` present.
///
/// If `stop_at_git_root` is true, stops searching when a `.git` directory is found.
/// Returns `None` if no file is found.
pub fn find_file_upward(
    start_dir: &Path,
    filenames: &[&str],
    stop_at_git_root: bool,
) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        if let Some(found) = filenames
            .iter()
            .map(|name| current.join(name))
            .find(|candidate| candidate.is_file())
        {
            return Some(found);
        }

        if stop_at_git_root && current.join(".git").exists() {
            return None;
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Find a propel config file by searching upward from the given directory.
///
/// Stops at the first directory holding one of [`CONFIG_FILE_NAMES`], or at
/// the git repository root, whichever comes first.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    find_file_upward(start_dir, &CONFIG_FILE_NAMES, true)
}

/// Load and parse a config file, picking the format from its extension.
pub fn load_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config_str(&content, ConfigFormat::from_path(path))
}

/// Parse config text.
///
/// The section may be nested under the `propel` root node or be the whole document.
pub fn parse_config_str(content: &str, format: ConfigFormat) -> Result<RawConfig, ConfigError> {
    if content.trim().is_empty() {
        return Ok(RawConfig::default());
    }

    let document: Value = match format {
        ConfigFormat::Toml => toml::from_str(content)?,
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content).map_err(ConfigError::Json)?,
    };

    let section = match document {
        Value::Object(mut root) if root.contains_key(ROOT_NODE) => {
            root.remove(ROOT_NODE).unwrap_or(Value::Null)
        }
        other => other,
    };

    if section.is_null() {
        return Ok(RawConfig::default());
    }

    serde_json::from_value(section).map_err(ConfigError::Schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_current_dir() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("propel.toml");
        fs::write(&config_path, "logging = true\n").unwrap();

        let found = find_config_file(dir.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let parent = TempDir::new().unwrap();
        fs::create_dir(parent.path().join(".git")).unwrap();
        let config_path = parent.path().join("propel.yaml");
        fs::write(&config_path, "logging: true\n").unwrap();

        let child = parent.path().join("subdir");
        fs::create_dir(&child).unwrap();

        let found = find_config_file(&child);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_stops_at_git_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let subdir = dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();

        let found = find_config_file(&subdir);
        assert_eq!(found, None);
    }

    #[test]
    fn test_find_config_prefers_toml_in_same_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("propel.json"), "{}").unwrap();
        fs::write(dir.path().join("propel.toml"), "").unwrap();

        let found = find_config_file(dir.path());
        assert_eq!(found, Some(dir.path().join("propel.toml")));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("propel")), ConfigFormat::Toml);
    }

    #[test]
    fn test_load_toml_bare_section() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("propel.toml");
        fs::write(
            &config_path,
            r#"
path = "/opt/propel"
logging = true

[behaviors]
sluggable = "Foo\\Sluggable"

[dbal.connections.main]
driver = "pgsql"

[dbal.connections.replica]
driver = "pgsql"
slaves = ["s1"]
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.path.as_deref(), Some("/opt/propel"));
        assert_eq!(config.logging, Some(true));
        assert_eq!(config.behaviors, Some(json!({ "sluggable": "Foo\\Sluggable" })));
        let dbal = config.dbal.unwrap();
        let names: Vec<&str> = dbal.connections.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["main", "replica"]);
        assert_eq!(dbal.connections["replica"].slaves, Some(json!(["s1"])));
    }

    #[test]
    fn test_load_yaml_rooted_section() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
propel:
  phing_path: /opt/phing
  dbal:
    driver: mysql
    user: root
    dsn: "mysql:host=localhost;dbname=app"
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.phing_path.as_deref(), Some("/opt/phing"));
        let dbal = config.dbal.unwrap();
        assert!(dbal.connections.is_empty());
        assert_eq!(dbal.connection.driver.as_deref(), Some("mysql"));
        assert_eq!(dbal.connection.user.as_deref(), Some("root"));
    }

    #[test]
    fn test_load_json() {
        let config = parse_config_str(
            r#"{"propel": {"schema_path": "schema", "build_properties": {"a": "b"}}}"#,
            ConfigFormat::Json,
        )
        .unwrap();
        assert_eq!(config.schema_path.as_deref(), Some("schema"));
        assert_eq!(config.build_properties, Some(json!({ "a": "b" })));
    }

    #[test]
    fn test_load_config_empty() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("propel.yaml");
        fs::write(&config_path, "\n").unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config, RawConfig::default());
    }

    #[test]
    fn test_null_root_node_is_empty() {
        let config = parse_config_str("propel: ~\n", ConfigFormat::Yaml).unwrap();
        assert_eq!(config, RawConfig::default());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("propel.toml");
        fs::write(&config_path, "invalid toml {{{\n").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_load_config_wrong_type() {
        let result = parse_config_str("logging = \"yes\"\n", ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Schema(_))));
    }

    #[test]
    fn test_numeric_password_yaml() {
        let config =
            parse_config_str("dbal:\n  driver: mysql\n  password: 123456\n", ConfigFormat::Yaml)
                .unwrap();
        let connection = config.dbal.unwrap().connection;
        assert_eq!(connection.password.as_deref(), Some("123456"));
        assert_eq!(connection.driver.as_deref(), Some("mysql"));
    }

    #[test]
    fn test_numeric_password_toml() {
        let config = parse_config_str(
            "[dbal.connections.main]\ndriver = \"pgsql\"\npassword = 1234\nuser = true\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        let dbal = config.dbal.unwrap();
        assert_eq!(dbal.connections["main"].password.as_deref(), Some("1234"));
        assert_eq!(dbal.connections["main"].user.as_deref(), Some("true"));
    }

    #[test]
    fn test_structured_password_is_rejected() {
        let result = parse_config_str(
            "dbal:\n  driver: mysql\n  password: [a, b]\n",
            ConfigFormat::Yaml,
        );
        assert!(matches!(result, Err(ConfigError::Schema(_))));

        let result = parse_config_str("[dbal.dsn]\nhost = \"db\"\n", ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Schema(_))));
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_config(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
