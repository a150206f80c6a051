use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use propel_config::{
    find_config_file, generate_init_file, print_error, print_using_config, print_warning,
    render_parameters, resolve, should_use_colors, CliOverrides, FsProbe, OutputContext,
    OutputFormat, ParameterBag, VendorLayout,
};

#[derive(Parser)]
#[command(name = "propel-config")]
#[command(version, about = "Validate Propel ORM configuration and print the resolved parameters")]
struct Cli {
    /// Config files, merged in order (later files override earlier ones)
    #[arg(short, long = "config", value_name = "PATH")]
    config: Vec<PathBuf>,

    /// Kernel root directory; vendor libraries are looked up in <DIR>/../vendor
    #[arg(long, value_name = "DIR", default_value = "app")]
    root_dir: PathBuf,

    /// Path to the Propel ORM library (overrides config)
    #[arg(long, value_name = "PATH")]
    path: Option<String>,

    /// Path to the Phing classes (overrides config)
    #[arg(long, value_name = "PATH")]
    phing_path: Option<String>,

    /// Directory holding schema files (overrides config)
    #[arg(long, value_name = "PATH")]
    schema_path: Option<String>,

    /// Kernel debug mode; enables logging unless the config says otherwise
    #[arg(long)]
    debug: bool,

    /// Enable query logging (overrides config)
    #[arg(long)]
    logging: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Validate only; print nothing on success
    #[arg(long)]
    check: bool,

    /// Force colored diagnostics
    #[arg(long)]
    color: bool,

    /// Disable colored diagnostics
    #[arg(long, conflicts_with = "color")]
    no_color: bool,

    /// Generate a template propel.toml configuration file
    #[arg(long)]
    init: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let ctx = OutputContext::new(should_use_colors(cli.color, cli.no_color), cli.check);

    // Handle --init command
    if cli.init {
        return handle_init(&ctx);
    }

    let config_paths = discover_config_paths(&cli, &ctx);
    let overrides = build_cli_overrides(&cli);
    let layout = VendorLayout::new(&cli.root_dir).with_debug(cli.debug);

    let resolved = match resolve(&config_paths, &overrides, &layout, &FsProbe) {
        Ok(resolved) => resolved,
        Err(e) => {
            print_error(&e.to_string(), &ctx);
            return ExitCode::from(1);
        }
    };

    let mut parameters = ParameterBag::new();
    if let Err(e) = resolved.register(&mut parameters) {
        print_error(&format!("failed to register parameters: {e}"), &ctx);
        return ExitCode::from(1);
    }

    if cli.check {
        return ExitCode::SUCCESS;
    }

    match render_parameters(&parameters, cli.format) {
        Ok(out) => {
            print!("{out}");
            if !out.ends_with('\n') {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_error(&e.to_string(), &ctx);
            ExitCode::from(1)
        }
    }
}

fn handle_init(ctx: &OutputContext) -> ExitCode {
    match generate_init_file() {
        Ok(path) => {
            println!("Created {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_error(&e.to_string(), ctx);
            ExitCode::from(1)
        }
    }
}

fn discover_config_paths(cli: &Cli, ctx: &OutputContext) -> Vec<PathBuf> {
    if !cli.config.is_empty() {
        for path in &cli.config {
            print_using_config(path, ctx);
        }
        return cli.config.clone();
    }

    match std::env::current_dir()
        .ok()
        .and_then(|d| find_config_file(&d))
    {
        Some(path) => {
            print_using_config(&path, ctx);
            vec![path]
        }
        None => {
            print_warning("no propel config file found; using CLI options only", ctx);
            Vec::new()
        }
    }
}

fn build_cli_overrides(cli: &Cli) -> CliOverrides {
    // Boolean flags in clap are always present (default false), so we
    // treat false as "not set" for proper merging with config files.
    CliOverrides {
        path: cli.path.clone(),
        phing_path: cli.phing_path.clone(),
        schema_path: cli.schema_path.clone(),
        logging: cli.logging.then_some(true),
    }
}
