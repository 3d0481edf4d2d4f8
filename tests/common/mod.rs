// Common test utilities

pub mod harness;
pub mod tracing;
