// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::camera::{CameraSettings, Projection, CAMERA_SPEED, MOUSE_SENSITIVITY};
use crate::error::ConfigError;

pub const DEFAULT_WIDTH: u32 = 2560;
pub const DEFAULT_HEIGHT: u32 = 1440;

/// Which scene the demo draws into the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Fullscreen ray-marched SDF scene
    Raymarch,
    /// Textured rotating cube
    Mesh,
}

impl Variant {
    /// Field of view (degrees), near and far planes for this variant
    pub const fn projection_defaults(self) -> (f32, f32, f32) {
        match self {
            Variant::Raymarch => (90.0, 0.000001, 100.0),
            Variant::Mesh => (60.0, 0.1, 100.0),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "fly-demo")]
#[command(about = "First-person fly camera over a ray-marched or mesh scene", long_about = None)]
pub struct Cli {
    /// Scene to render
    #[arg(long, value_enum, default_value_t = Variant::Raymarch)]
    pub variant: Variant,

    /// Initial window width in physical pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Initial window height in physical pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Vertical field of view in degrees (variant default if unset)
    #[arg(long)]
    pub fov: Option<f32>,

    /// Near clip plane (variant default if unset)
    #[arg(long)]
    pub near: Option<f32>,

    /// Far clip plane (variant default if unset)
    #[arg(long)]
    pub far: Option<f32>,

    /// Movement speed in units per second
    #[arg(long, default_value_t = CAMERA_SPEED)]
    pub speed: f32,

    /// Look sensitivity in radians per pixel
    #[arg(long, default_value_t = MOUSE_SENSITIVITY)]
    pub sensitivity: f32,

    /// Image used to texture the mesh (checkerboard if unset)
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// WGSL file replacing the built-in ray-march shader
    #[arg(long)]
    pub shader: Option<PathBuf>,

    /// Disable the HUD overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

impl Cli {
    /// Projection for the configured variant, with overrides applied
    pub fn projection(&self) -> Projection {
        let (fov, near, far) = self.variant.projection_defaults();
        let aspect = self.width.max(1) as f32 / self.height.max(1) as f32;
        Projection::new(
            self.fov.unwrap_or(fov),
            aspect,
            self.near.unwrap_or(near),
            self.far.unwrap_or(far),
        )
    }

    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            speed: self.speed,
            sensitivity: self.sensitivity,
        }
    }

    /// Reject values the projection cannot represent
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::WindowSize {
                width: self.width,
                height: self.height,
            });
        }

        let projection = self.projection();
        if !(projection.fov_y_degrees > 0.0 && projection.fov_y_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(projection.fov_y_degrees));
        }
        if !(projection.near > 0.0 && projection.far > projection.near) {
            return Err(ConfigError::ClipPlanes {
                near: projection.near,
                far: projection.far,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fly-demo").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_raymarch() {
        let cli = parse(&[]);
        assert_eq!(cli.variant, Variant::Raymarch);
        assert_eq!((cli.width, cli.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert!(!cli.no_ui);
        assert!(cli.texture.is_none());
    }

    #[test]
    fn raymarch_projection_defaults() {
        let projection = parse(&[]).projection();
        assert_eq!(projection.fov_y_degrees, 90.0);
        assert_eq!(projection.near, 0.000001);
        assert_eq!(projection.far, 100.0);
        assert!((projection.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn mesh_variant_uses_its_own_defaults() {
        let projection = parse(&["--variant", "mesh"]).projection();
        assert_eq!(projection.fov_y_degrees, 60.0);
        assert_eq!(projection.near, 0.1);
    }

    #[test]
    fn overrides_win() {
        let cli = parse(&["--fov", "75", "--near", "0.5", "--speed", "2.5", "--no-ui"]);
        assert_eq!(cli.projection().fov_y_degrees, 75.0);
        assert_eq!(cli.projection().near, 0.5);
        assert_eq!(cli.camera_settings().speed, 2.5);
        assert!(cli.no_ui);
    }

    #[test]
    fn validate_rejects_bad_planes() {
        assert!(parse(&[]).validate().is_ok());
        assert!(parse(&["--near", "0"]).validate().is_err());
        assert!(parse(&["--near", "10", "--far", "5"]).validate().is_err());
        assert!(parse(&["--fov", "180"]).validate().is_err());
        assert!(parse(&["--width", "0"]).validate().is_err());
    }

    #[test]
    fn validate_reports_which_value_is_wrong() {
        assert_eq!(
            parse(&["--height", "0"]).validate(),
            Err(ConfigError::WindowSize {
                width: DEFAULT_WIDTH,
                height: 0
            })
        );
        assert_eq!(
            parse(&["--fov", "0"]).validate(),
            Err(ConfigError::FieldOfView(0.0))
        );
        assert_eq!(
            parse(&["--near", "10", "--far", "5"]).validate(),
            Err(ConfigError::ClipPlanes {
                near: 10.0,
                far: 5.0
            })
        );
        assert!(parse(&["--fov", "180"])
            .validate()
            .unwrap_err()
            .to_string()
            .contains("180"));
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(Cli::try_parse_from(["fly-demo", "--variant", "voxels"]).is_err());
    }
}
