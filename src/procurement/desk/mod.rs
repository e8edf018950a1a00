pub mod audit;
pub mod compare;
pub mod compliance;
pub mod config;
pub mod decision;
pub mod error;
pub mod flatten;
pub mod generate;
pub mod io;
pub mod llm;
pub mod model;
pub mod portal;
pub mod report;
pub mod substitution;
pub mod sync;
pub mod workflow;

pub use config::DeskConfig;
pub use error::{Result, ToolError};
