//! Shared plumbing for the converter workspace: tracing setup and span helpers.

pub mod logger;
