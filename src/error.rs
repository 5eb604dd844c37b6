use thiserror::Error;

/// Errors surfaced by toolkit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The widget handle refers to a destroyed widget.
    #[error("stale widget handle")]
    StaleWidget,

    /// The backend refused to create a native view.
    #[error("backend `{backend}` could not create a native view")]
    ViewCreation { backend: String },
}
