use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::{error, warn};

use liftr::config::{self, Config, LogFormat};
use liftr::{RenderError, RenderOptions, RenderRequest};

/// Command-line arguments for the liftr binary.
#[derive(Debug, Parser)]
#[command(name = "liftr", version, about = "Render R Markdown documents inside Docker")]
struct Cli {
    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact, env = "LIFTR_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the document's image and render it in a container.
    Render(RenderArgs),
    /// Deprecated alias for `render`.
    #[command(hide = true)]
    Drender(RenderArgs),
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// Document to render; a Dockerfile must sit next to it.
    input: PathBuf,

    /// Image tag. Defaults to the document's file stem.
    #[arg(long)]
    tag: Option<String>,

    /// Extra arguments appended verbatim to `docker build`.
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    build_args: Option<String>,

    /// Container name. Defaults to a generated unique name.
    #[arg(long)]
    container_name: Option<String>,

    /// Build the image without the layer cache.
    #[arg(long)]
    no_cache: bool,

    /// Do not write the `<stem>.docker.yml` sidecar.
    #[arg(long)]
    no_metadata: bool,

    /// Print the commands instead of running them.
    #[arg(long)]
    dry_run: bool,

    /// Render option passed to rmarkdown::render, as KEY=VALUE. VALUE is read
    /// as JSON when it parses, otherwise as a string.
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
    options: Vec<(String, Value)>,

    /// YAML or JSON mapping of render options; `--option` entries win.
    #[arg(long, value_name = "PATH")]
    options_file: Option<PathBuf>,

    /// Configuration file. Defaults to `.liftr.yml` next to the document.
    #[arg(long, env = "LIFTR_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = liftr::telemetry::init(cli.log_format) {
        eprintln!("{e:#}");
    }

    let args = match cli.command {
        Command::Render(args) => args,
        Command::Drender(args) => {
            warn!("`drender` is deprecated, use `render` instead");
            args
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            let code = e
                .downcast_ref::<RenderError>()
                .map_or(1, RenderError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(args: RenderArgs) -> Result<()> {
    let cfg = load_config(args.config.as_deref(), &args.input)?;

    let mut options = match &args.options_file {
        Some(path) => load_options(path)?,
        None => RenderOptions::new(),
    };
    options.extend(args.options);

    let request = RenderRequest {
        input_path: args.input,
        image_tag: args.tag,
        build_args: args.build_args,
        container_name: args.container_name,
        cache_enabled: !args.no_cache,
        persist_metadata: !args.no_metadata,
        extra_render_options: options,
    };

    if args.dry_run {
        let result = liftr::prepare(&request, &cfg)?;
        print!("{}", serde_yaml::to_string(&result)?);
        return Ok(());
    }

    liftr::render(&request, &cfg)?;
    Ok(())
}

/// Explicit `--config`, else `.liftr.yml` beside the input, else defaults.
fn load_config(explicit: Option<&Path>, input: &Path) -> Result<Config> {
    if let Some(path) = explicit {
        return config::load_file(path);
    }
    match input.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => config::load(dir),
        _ => config::load(Path::new(".")),
    }
}

fn load_options(path: &Path) -> Result<RenderOptions> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    // YAML is a superset of JSON, so one parser covers both.
    let value: Value = serde_yaml::from_str(&contents)
        .with_context(|| format!("invalid options file {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(RenderOptions::new()),
        _ => bail!("options file {} must contain a mapping", path.display()),
    }
}

fn parse_option(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("option name cannot be empty");
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
