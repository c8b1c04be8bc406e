use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process;

use clap::{CommandFactory, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use errors_const::error::Result;
use errors_const::funcs::MapMode;

/// Generate error code constants from a JSON error catalog.
///
/// Reads the error catalog (block comments allowed), then renders the
/// template with `codes` (ascending) and `version` in scope and the
/// functions key, normalize, split, join, title and map available.
#[derive(Parser)]
#[command(name = "errors-const", version, about)]
struct Cli {
    /// Path to the error catalog, e.g. ably-common/protocol/errors.json.
    /// An http(s) URL is fetched instead when built with the `download` feature.
    #[arg(long = "json", value_name = "PATH", env = "ERRORS_CONST_JSON")]
    json: Option<String>,

    /// Path to the template file.
    #[arg(short = 't', long = "template", value_name = "PATH")]
    template: Option<PathBuf>,

    /// File to write output to. Defaults to stdout.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,

    /// Behaviour of the template `map` function.
    #[arg(long, value_enum, default_value_t = MapMode::Substitute)]
    map_mode: MapMode,

    /// Suppress non-error output.
    #[arg(long, short)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse_from(go_style_args(std::env::args_os()));
    init_tracing(cli.quiet);

    let Some(json) = cli.json.as_deref() else {
        eprintln!("{}", Cli::command().render_help());
        return;
    };
    let Some(template) = cli.template.as_deref() else {
        println!("[error] missing -t flag");
        eprintln!("{}", Cli::command().render_help());
        process::exit(1);
    };

    if let Err(e) = run(json, template, cli.output.as_deref(), cli.map_mode) {
        eprintln!("error: {e}");

        // Print cause chain.
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = std::error::Error::source(cause);
        }

        process::exit(1);
    }
}

fn run(json: &str, template: &Path, output: Option<&Path>, map_mode: MapMode) -> Result<()> {
    let stats = errors_const::generate(json, template, output, map_mode)?;
    info!(
        codes = stats.codes_rendered,
        bytes = stats.bytes_written,
        "generation complete"
    );
    Ok(())
}

/// Accept the single-dash `-json` spelling used by existing build scripts.
fn go_style_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some(s) if s == "-json" || s.starts_with("-json=") => format!("-{s}").into(),
            _ => arg,
        })
        .collect()
}

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "error" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
