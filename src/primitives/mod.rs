//! Low-level primitives and utilities
//!
//! Small building blocks shared by the theme layer and its collaborators.

pub mod disposable;

pub use disposable::Disposable;
