use thiserror::Error;

/// Failures surfaced by the scene lifecycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene has been unmounted")]
    Disposed,
    #[error("render backend error: {0}")]
    Backend(String),
}

/// Wiring mistakes around the shared theme context. These are programmer
/// errors and are meant to abort start-up rather than be recovered from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThemeError {
    #[error("use_theme must be called within a ThemeProvider")]
    OutsideProvider,
    #[error("a ThemeProvider is already installed")]
    AlreadyInstalled,
}
