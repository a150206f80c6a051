//! Configuration file support.
//!
//! This module provides:
//! - The schema of the user-authored `propel` section
//! - Config file discovery (search upward from current directory)
//! - Loading TOML, YAML and JSON files
//! - Merging several files and CLI overrides
//! - Template generation with `--init`

mod file;
mod init;
mod merge;
mod schema;

pub use file::{
    find_config_file, find_file_upward, load_config, parse_config_str, ConfigError, ConfigFormat,
    CONFIG_FILE_NAMES,
};
pub use init::{generate_init_file, generate_init_file_in, PROPEL_TOML_TEMPLATE};
pub use merge::{apply_overrides, merge_raw_configs, CliOverrides};
pub use schema::{ConnectionSection, DbalSection, RawConfig, ROOT_NODE};
