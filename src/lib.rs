pub mod assets;
pub mod camera;
pub mod cli;
pub mod core;
pub mod error;
pub mod renderer;
pub mod types;

pub use camera::{CameraSettings, CameraState, FlyCamera, MoveKeys, Projection, ViewTransform};
pub use error::{AssetError, GpuError};
