//! Template generation for `--init` command

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Template propel.toml with documentation
pub const PROPEL_TOML_TEMPLATE: &str = r#"# propel.toml - Propel ORM configuration
#
# The section may also be nested under a [propel] table, and the same
# keys can be written as propel.yaml or propel.json.

# Absolute path to the Propel ORM library.
# When omitted, <root-dir>/../vendor/palepurple/propel1 is used if it exists.
# path = "/var/www/vendor/palepurple/propel1"

# Absolute path to the Phing classes.
# When omitted, <root-dir>/../vendor/phing/phing/classes is used if it exists.
# phing_path = "/var/www/vendor/phing/phing/classes"

# Log every query.
# Default: false
# logging = false

# Directory holding *schema.xml files.
# schema_path = "src/Resources/config"

[build_properties]
# "propel.mysql.tableType" = "InnoDB"

# Each entry becomes build property behavior.<name>.class
[behaviors]
# sluggable = "Propel\\Behavior\\Sluggable"

[dbal]
# Defaults to the first connection below.
# default_connection = "main"

[dbal.connections.main]
driver = "mysql"
dsn = "mysql:host=localhost;dbname=app"
user = "root"
password = ""
# classname = "DebugPDO"
# slaves = ["mysql:host=replica;dbname=app"]

# [dbal.connections.main.options]
# ATTR_PERSISTENT = false
"#;

/// Generate propel.toml in the specified directory (or current directory if None).
///
/// Returns an error if propel.toml already exists.
pub fn generate_init_file_in(dir: Option<&Path>) -> io::Result<PathBuf> {
    let path = dir.map_or_else(|| PathBuf::from("propel.toml"), |d| d.join("propel.toml"));

    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "propel.toml already exists",
        ));
    }

    fs::write(&path, PROPEL_TOML_TEMPLATE)?;
    Ok(path)
}

/// Generate propel.toml in the current directory.
pub fn generate_init_file() -> io::Result<PathBuf> {
    generate_init_file_in(None)
}
