//! Core domain types
//!
//! This module contains the structures a deployment attempt is built from:
//! the target and its parameters going out, the process identifiers coming
//! back, and the report derived from both.

pub mod parameter;
pub mod process;
pub mod report;
pub mod request;
