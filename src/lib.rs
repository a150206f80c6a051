pub mod colors;
pub mod config;
pub mod error;
pub mod normalize;
mod output;
pub mod parameters;
pub mod probe;

pub use colors::{should_use_colors, Colors};
pub use config::{
    apply_overrides, find_config_file, generate_init_file, load_config, merge_raw_configs,
    parse_config_str, CliOverrides, ConfigError, ConfigFormat, ConnectionSection, DbalSection,
    RawConfig, PROPEL_TOML_TEMPLATE,
};
pub use error::{Error, NormalizeError};
pub use normalize::{normalize, normalize_dbal};
pub use output::{
    print_error, print_using_config, print_warning, render_parameters, OutputContext,
    OutputFormat, RenderError,
};
pub use parameters::{
    ConnectionParameters, DataSource, DataSourceEntry, DbalParameters, ParameterBag,
    ParameterStore, ResolvedParameters, Slaves, DEFAULT_ALIAS,
};
pub use probe::{FsProbe, PathProbe, VendorLayout};

use std::path::PathBuf;

/// Main entry point: load every config file in order, merge, apply CLI
/// overrides and normalize.
pub fn resolve<P>(
    config_paths: &[PathBuf],
    overrides: &CliOverrides,
    layout: &VendorLayout,
    probe: &P,
) -> Result<ResolvedParameters, Error>
where
    P: PathProbe + ?Sized,
{
    let configs = config_paths
        .iter()
        .map(|path| {
            load_config(path).map_err(|source| Error::Load {
                path: path.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let raw = apply_overrides(merge_raw_configs(configs), overrides);
    Ok(normalize(&raw, layout, probe)?)
}
