// Theme controller library - exposes all modules for testing

// Config and pure theme types are always available (needed for schema generation)
pub mod config;
pub mod primitives;
pub mod view;

// Runtime-only modules (require the "runtime" feature)
#[cfg(feature = "runtime")]
pub mod services;
