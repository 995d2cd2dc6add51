//! Structured error types for tabletrim.

/// All errors that can occur while building or driving a trimmed table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TabletrimError {
    /// Malformed table or options, reported at construction.
    #[error("Configuration: {0}")]
    Configuration(String),

    /// Column index outside `1..=count`.
    #[error("Invalid column {index}: table has {count} columns")]
    InvalidColumn { index: usize, count: usize },

    /// The host environment refused an operation (element creation, listeners, entropy).
    #[error("Environment: {0}")]
    Environment(String),

    /// A handle operation was invoked while another transition on the same
    /// handle was still running, typically from inside a hook.
    #[error("Operation re-entered a running transition")]
    Reentrant,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TabletrimError>;

impl TabletrimError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn environment(message: impl Into<String>) -> Self {
        Self::Environment(message.into())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<TabletrimError> for wasm_bindgen::JsValue {
    fn from(e: TabletrimError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
