//! End-to-end render flow against a stand-in engine.
//!
//! The engine is a small shell script that records its arguments and exits
//! with a chosen code, so these tests need no Docker daemon. The live test
//! at the bottom is `#[ignore]`d; run it with `cargo test -- --ignored`.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use liftr::render::metadata;
use liftr::{Config, RenderError, RenderRequest};

struct Workspace {
    dir: tempfile::TempDir,
    input: PathBuf,
    config: Config,
}

impl Workspace {
    /// A document, its Dockerfile, and an engine exiting with the given codes.
    fn new(input_name: &str, build_exit: i32, run_exit: i32) -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let input = dir.path().join(input_name);
        std::fs::write(&input, "---\ntitle: test\n---\n\nHello.\n").unwrap();
        std::fs::write(dir.path().join("Dockerfile"), "FROM rocker/r-ver:4\n").unwrap();

        let engine = dir.path().join("fake-engine");
        let log = dir.path().join("calls.log");
        let script = format!(
            "#!/bin/sh\n\
             for a in \"$@\"; do printf '%s\\n' \"$a\"; done >> '{log}'\n\
             echo '--' >> '{log}'\n\
             case \"$1\" in\n  build) exit {build_exit} ;;\n  run) exit {run_exit} ;;\nesac\nexit 99\n",
            log = log.display()
        );
        std::fs::write(&engine, script).unwrap();
        std::fs::set_permissions(&engine, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = Config {
            engine: engine.to_string_lossy().into_owned(),
            ..Config::default()
        };
        Self { dir, input, config }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Argument lists of each engine invocation, in order.
    fn calls(&self) -> Vec<Vec<String>> {
        let Ok(log) = std::fs::read_to_string(self.path("calls.log")) else {
            return Vec::new();
        };
        log.split("--\n")
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| chunk.lines().map(String::from).collect())
            .collect()
    }
}

#[test]
fn successful_render_runs_build_then_run_and_writes_sidecar() {
    let ws = Workspace::new("a.doc", 0, 0);
    let result = liftr::render(&RenderRequest::new(&ws.input), &ws.config).unwrap();

    assert_eq!(result.image_name, "a");

    let calls = ws.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        [
            "build",
            "--no-cache=false",
            "--rm=true",
            "-t=a",
            ws.dir.path().to_str().unwrap(),
        ]
    );
    assert_eq!(calls[1][0], "run");
    assert!(calls[1].contains(&result.container_name));
    let script = calls[1].last().unwrap();
    assert!(script.ends_with("setwd('/liftrroot/'); render(input = \"a.doc\")"));

    let sidecar = metadata::read(&ws.path("a.docker.yml")).unwrap();
    assert_eq!(sidecar.image_name, result.image_name);
    assert_eq!(sidecar.container_name, result.container_name);
    assert_eq!(sidecar.docker_build_cmd, result.build_command);
    assert_eq!(sidecar.docker_run_cmd, result.run_command);
}

#[test]
fn symlinked_input_renders_from_the_link_directory() {
    let ws = Workspace::new("report.Rmd", 0, 0);
    let store = ws.path("store");
    std::fs::create_dir(&store).unwrap();
    std::fs::rename(&ws.input, store.join("draft-v3.Rmd")).unwrap();
    std::os::unix::fs::symlink(store.join("draft-v3.Rmd"), &ws.input).unwrap();

    let result = liftr::render(&RenderRequest::new(&ws.input), &ws.config).unwrap();

    assert_eq!(result.image_name, "report");
    assert_eq!(result.metadata_path, Some(ws.path("report.docker.yml")));
    assert!(ws.path("report.docker.yml").exists());
    assert!(!store.join("draft-v3.docker.yml").exists());

    let calls = ws.calls();
    assert_eq!(calls[0].last().unwrap(), ws.dir.path().to_str().unwrap());
    assert!(calls[1].last().unwrap().ends_with("render(input = \"report.Rmd\")"));
}

#[test]
fn build_failure_skips_run_and_keeps_sidecar() {
    let ws = Workspace::new("report.Rmd", 3, 0);
    let err = liftr::render(&RenderRequest::new(&ws.input), &ws.config).unwrap_err();

    assert!(matches!(err, RenderError::BuildFailed { code: 3 }));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(ws.calls().len(), 1);
    assert!(ws.path("report.docker.yml").exists());
}

#[test]
fn run_failure_surfaces_exit_code() {
    let ws = Workspace::new("report.Rmd", 0, 7);
    let err = liftr::render(&RenderRequest::new(&ws.input), &ws.config).unwrap_err();

    assert!(matches!(err, RenderError::RunFailed { code: 7 }));
    assert_eq!(ws.calls().len(), 2);
}

#[test]
fn missing_descriptor_spawns_nothing() {
    let ws = Workspace::new("report.Rmd", 0, 0);
    std::fs::remove_file(ws.path("Dockerfile")).unwrap();

    let err = liftr::render(&RenderRequest::new(&ws.input), &ws.config).unwrap_err();
    assert!(matches!(err, RenderError::MissingBuildDescriptor(_)));
    assert!(ws.calls().is_empty());
    assert!(!ws.path("report.docker.yml").exists());
}

#[test]
fn unsupported_option_spawns_nothing() {
    let ws = Workspace::new("report.Rmd", 0, 0);
    for key in ["output_file", "output_dir", "intermediates_dir"] {
        let request = RenderRequest::new(&ws.input).option(key, "x");
        let err = liftr::render(&request, &ws.config).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedOption(_)));
    }
    let request = RenderRequest::new(&ws.input).option("input", "x.Rmd");
    let err = liftr::render(&request, &ws.config).unwrap_err();
    assert!(matches!(err, RenderError::DuplicateInput));

    assert!(ws.calls().is_empty());
    assert!(!ws.path("report.docker.yml").exists());
}

#[test]
fn pass_through_options_reach_the_container_script() {
    let ws = Workspace::new("report.Rmd", 0, 0);
    let request = RenderRequest::new(&ws.input)
        .cache(false)
        .persist_metadata(false)
        .option("quiet", true)
        .option("params", serde_json::json!({"who": "O'Brien \"the\" $USER"}));
    let result = liftr::render(&request, &ws.config).unwrap();

    assert!(result.metadata_path.is_none());
    assert!(!ws.path("report.docker.yml").exists());

    let calls = ws.calls();
    assert_eq!(calls[0][1], "--no-cache=true");
    let script = calls[1].last().unwrap();
    assert!(script.ends_with(
        r#"do.call(render, list(params = list(who = "O'Brien \"the\" $USER"), quiet = TRUE, input = "report.Rmd"))"#
    ));
}

#[test]
fn sidecar_is_overwritten_on_rerender() {
    let ws = Workspace::new("report.Rmd", 0, 0);
    let first = liftr::render(&RenderRequest::new(&ws.input), &ws.config).unwrap();
    let second = liftr::render(&RenderRequest::new(&ws.input), &ws.config).unwrap();

    assert_ne!(first.container_name, second.container_name);
    let sidecar = metadata::read(&ws.path("report.docker.yml")).unwrap();
    assert_eq!(sidecar.container_name, second.container_name);
}

#[test]
#[allow(deprecated)]
fn deprecated_alias_delegates() {
    let ws = Workspace::new("report.Rmd", 0, 0);
    let result = liftr::render_docker(&RenderRequest::new(&ws.input), &ws.config).unwrap();
    assert_eq!(result.image_name, "report");
    assert_eq!(ws.calls().len(), 2);
}

#[test]
#[ignore]
fn live_docker_render() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("hello.Rmd");
    std::fs::write(&input, "---\ntitle: hello\noutput: html_document\n---\n\nHi.\n").unwrap();
    std::fs::write(
        dir.path().join("Dockerfile"),
        "FROM rocker/r-ver:4\nRUN apt-get update && apt-get install -y pandoc \
         && install2.r knitr rmarkdown shiny\n",
    )
    .unwrap();

    let result = liftr::render(&RenderRequest::new(&input), &Config::default()).unwrap();
    assert_eq!(result.image_name, "hello");
    assert!(dir.path().join("hello.html").exists());
    assert!(dir.path().join("hello.docker.yml").exists());
}
