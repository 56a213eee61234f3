//! Service layer
//!
//! Services contain the business logic of the deploy step. They talk to the
//! server through the client traits and to the host pipeline through a
//! `RunContext`, so every service can run against test doubles.

mod catalog;
mod deploy;
mod run;

pub use catalog::{ParameterSelection, populate_parameters_document};
pub use deploy::run_deploy;
pub use run::ConsoleRun;
