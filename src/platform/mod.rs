//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Keyboard input mapping
//! - Host initialization errors

pub mod input;

pub use input::{Intent, apply_key, intent_for_key};

use thiserror::Error;

/// Errors that can occur while bringing up the host
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    /// Element id that was looked up
    #[error("canvas element not found: #{0}")]
    CanvasMissing(String),

    #[error("element #{0} is not a canvas")]
    NotACanvas(String),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("logger already initialized: {0}")]
    Logger(#[from] log::SetLoggerError),

    /// A JavaScript call failed; carries the stringified value
    #[error("javascript error: {0}")]
    Js(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            HostError::CanvasMissing("canvas".into()).to_string(),
            "canvas element not found: #canvas"
        );
        assert_eq!(HostError::NoWindow.to_string(), "no global window");
    }
}
