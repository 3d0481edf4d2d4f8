//! Rendering surface that stylesheet resources are attached to
//!
//! In a browser this is the document body and each resource is a `<link>`
//! element; a native host may parse the stylesheet into its own style tree.
//! Either way the manager only needs to attach a resource, learn whether it
//! loaded, and detach it again on the next theme switch.

use tokio::sync::oneshot;

/// Outcome a resource reports once it has finished loading
pub type LoadOutcome = Result<(), String>;

/// One attached stylesheet resource
pub trait ResourceHandle: Send + Sync {
    /// Resolved location of the stylesheet
    fn href(&self) -> &str;

    /// Remove the resource from the surface. Detaching twice is a no-op.
    fn detach(&self);
}

pub trait StylesheetSurface: Send + Sync {
    /// Attach a stylesheet resource for `href`.
    ///
    /// The surface must send exactly one outcome on `on_settled` when the
    /// resource finishes loading or fails. Dropping the sender without
    /// sending counts as a failure.
    fn attach(
        &self,
        href: &str,
        on_settled: oneshot::Sender<LoadOutcome>,
    ) -> Box<dyn ResourceHandle>;
}
