//! Build a container image from a generated Dockerfile and render an
//! R Markdown document inside it.
//!
//! ```no_run
//! use liftr::{Config, RenderRequest};
//!
//! let request = RenderRequest::new("report.Rmd").option("quiet", true);
//! let result = liftr::render(&request, &Config::default())?;
//! println!("{}", result.run_command);
//! # Ok::<(), liftr::RenderError>(())
//! ```

pub mod config;
pub mod docker;
pub mod error;
pub mod render;
pub mod telemetry;

pub use config::Config;
pub use error::{RenderError, Result};
#[allow(deprecated)]
pub use render::render_docker;
pub use render::{InvocationResult, RenderOptions, RenderRequest, prepare, render};
