//! Flowdeploy Core
//!
//! Core types and abstractions for triggering application deployments on a
//! release-orchestration server.
//!
//! This crate contains:
//! - Domain types: deployment targets, parameters, process results and reports
//! - DTOs: the deploy-parameters document exchanged with the operator
//! - Resolver: conversion between the document and ordered parameter lists

pub mod domain;
pub mod dto;
pub mod error;
pub mod resolver;

pub use error::{DeployError, Result};
