//! Asynchronous services and collaborator interfaces
//!
//! The theme manager talks to the outside world only through these traits:
//! settings storage, the surface stylesheets attach to, the host widget it
//! redraws, the optional splash screen and the error dialog.

pub mod dialog;
pub mod host;
pub mod settings;
pub mod splash;
pub mod surface;
