use std::path::PathBuf;

use thiserror::Error;

/// Failure to read or decode an asset from disk
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture {path} has zero size")]
    EmptyTexture { path: PathBuf },

    #[error("texture {path} is {width}x{height}, the device allows at most {max} per side")]
    TextureTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max: u32,
    },
}

/// Failure while setting up GPU resources
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find appropriate adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("shader `{label}` failed validation: {message}")]
    Shader { label: String, message: String },

    #[error("pipeline `{label}` failed validation: {message}")]
    Pipeline { label: String, message: String },

    #[error("texture upload `{label}` failed validation: {message}")]
    Texture { label: String, message: String },

    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Command-line values the camera or window cannot use
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("window size {width}x{height} must be non-zero")]
    WindowSize { width: u32, height: u32 },

    #[error("fov {0} must be in (0, 180)")]
    FieldOfView(f32),

    #[error("clip planes near={near} far={far} must satisfy 0 < near < far")]
    ClipPlanes { near: f32, far: f32 },
}
