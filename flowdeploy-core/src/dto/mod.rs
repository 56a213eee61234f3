//! Data Transfer Objects
//!
//! Documents exchanged with the operator and the host pipeline. The DTOs
//! validate their shape once, at the edge, and hand typed domain values to
//! the rest of the system.

pub mod parameters;
