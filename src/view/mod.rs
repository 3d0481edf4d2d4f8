//! View layer
//!
//! Theme types are always available (config and schema generation use them).
//! The controller itself lives behind the "runtime" feature inside `theme`.

pub mod theme;
