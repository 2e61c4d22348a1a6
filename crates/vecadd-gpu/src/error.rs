//! GPU backend error types.

use thiserror::Error;

/// Errors produced by the wgpu backend.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("failed to request device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("buffer mapping failed: {0}")]
    BufferMap(String),

    #[error("invalid element count: {0}")]
    InvalidCount(String),
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, GpuError>;
