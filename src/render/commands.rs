use std::path::Path;

use crate::config::Config;

use super::rlang::shell_escape_double_quoted;

/// Build the image build command.
///
/// `build_args` is inserted verbatim; quoting it is the caller's job.
pub fn build_command(
    cfg: &Config,
    cache_enabled: bool,
    build_args: Option<&str>,
    image_name: &str,
    context_dir: &Path,
) -> String {
    let mut parts = vec![
        shell_words::quote(&cfg.engine).into_owned(),
        "build".to_string(),
        format!("--no-cache={}", !cache_enabled),
        "--rm=true".to_string(),
    ];
    if let Some(args) = build_args.map(str::trim).filter(|a| !a.is_empty()) {
        parts.push(args.to_string());
    }
    parts.extend([format!("-t=\"{image_name}\""), quote_path(context_dir)]);
    parts.join(" ")
}

/// Build the container run command that renders `render_call` inside the image.
pub fn run_command(
    cfg: &Config,
    container_name: &str,
    user_id: Option<u32>,
    host_dir: &Path,
    image_name: &str,
    render_call: &str,
) -> String {
    let root = &cfg.container_root;
    let mount = shell_escape_double_quoted(&format!("{}:{root}", host_dir.display()));

    let mut parts = vec![
        shell_words::quote(&cfg.engine).into_owned(),
        "run".to_string(),
        "--rm".to_string(),
        "--name".to_string(),
        format!("\"{container_name}\""),
    ];
    if let Some(uid) = user_id {
        parts.extend(["-u".to_string(), uid.to_string()]);
    }
    parts.extend([
        "-v".to_string(),
        format!("\"{mount}\""),
        image_name.to_string(),
        cfg.render_shell.clone(),
        format!("\"{}\"", shell_escape_double_quoted(&render_script(cfg, render_call))),
    ]);
    parts.join(" ")
}

/// The R script run in the container: attach the toolchain, move to the mount, render.
pub fn render_script(cfg: &Config, render_call: &str) -> String {
    let mut statements: Vec<String> = cfg
        .toolchain
        .iter()
        .map(|pkg| format!("library('{pkg}')"))
        .collect();
    statements.push(format!("setwd('{}')", cfg.container_root));
    statements.push(render_call.to_string());
    statements.join("; ")
}

fn quote_path(path: &Path) -> String {
    shell_words::quote(&path.to_string_lossy()).into_owned()
}
