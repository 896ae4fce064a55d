// Container engine plumbing — executable resolution, host identity, blocking execution.

pub mod engine;
pub mod run;

pub use engine::{resolve_engine, user_id};
pub use run::execute;
