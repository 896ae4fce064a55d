// Configuration — engine, in-container layout, and the option disallow-list.

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, load, load_file};
pub use types::{Config, LogFormat};
