use std::path::Path;

use clap::ValueEnum;
use serde_json::Value;
use thiserror::Error;

use crate::colors::Colors;
use crate::parameters::ParameterBag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON object
    Json,
    /// YAML mapping
    Yaml,
    /// One `key = value` line per parameter
    List,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub struct OutputContext {
    pub colors: Colors,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(use_colors: bool, quiet: bool) -> Self {
        Self {
            colors: Colors::new(use_colors),
            quiet,
        }
    }
}

/// Render registered parameters in the requested format.
pub fn render_parameters(bag: &ParameterBag, format: OutputFormat) -> Result<String, RenderError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(bag)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(bag)?),
        OutputFormat::List => {
            let mut out = String::new();
            for (key, value) in bag.iter() {
                out.push_str(key);
                out.push_str(" = ");
                match value {
                    Value::String(s) => out.push_str(s),
                    other => out.push_str(&other.to_string()),
                }
                out.push('\n');
            }
            Ok(out)
        }
    }
}

pub fn print_using_config(path: &Path, ctx: &OutputContext) {
    if ctx.quiet {
        return;
    }
    eprintln!(
        "{} {}",
        ctx.colors.paint(ctx.colors.info, "Using config:"),
        path.display()
    );
}

pub fn print_warning(message: &str, ctx: &OutputContext) {
    if ctx.quiet {
        return;
    }
    eprintln!("{} {message}", ctx.colors.paint(ctx.colors.warning, "Warning:"));
}

/// Errors are always printed, even in quiet mode.
pub fn print_error(message: &str, ctx: &OutputContext) {
    eprintln!("{} {message}", ctx.colors.paint(ctx.colors.error, "Error:"));
}
