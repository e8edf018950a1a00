//! Core library for the procurement-desk command line application.
//!
//! The library exposes the decision logic, auditors and renderers that power
//! the command-line interface as well as the integration tests. The material
//! record lives in [`procurement::desk::model`], the flat-file store and Excel
//! adapters under [`procurement::desk::io`], the auditors under
//! [`procurement::desk::audit`], and multi-step flows in
//! [`procurement::desk::workflow`].

pub mod procurement;

pub use procurement::desk::{
    DeskConfig, Result, ToolError, audit, compare, compliance, config, decision, error, flatten,
    generate, io, llm, model, portal, report, substitution, sync, workflow,
};
