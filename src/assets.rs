use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use log::{debug, info};

use crate::error::AssetError;

/// Built-in ray-march shader, used when no override is configured
pub const RAYMARCH_SHADER: &str = include_str!("shaders/raymarch.wgsl");
pub const MESH_SHADER: &str = include_str!("shaders/mesh.wgsl");
pub const BLIT_SHADER: &str = include_str!("shaders/blit.wgsl");

const CHECKER_SIZE: u32 = 256;
const CHECKER_CELLS: u32 = 8;

/// Decoded RGBA8 texture ready for upload
#[derive(Debug, Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureData {
    fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }
}

/// Reject images the device cannot hold in a single 2D texture
pub fn check_texture_size(path: &Path, width: u32, height: u32, max: u32) -> Result<(), AssetError> {
    if width == 0 || height == 0 {
        return Err(AssetError::EmptyTexture {
            path: path.to_path_buf(),
        });
    }
    if width > max || height > max {
        return Err(AssetError::TextureTooLarge {
            path: path.to_path_buf(),
            width,
            height,
            max,
        });
    }
    Ok(())
}

/// Load and decode an image file into RGBA8. `max_dimension` is the
/// device's 2D texture limit.
pub fn load_texture(path: &Path, max_dimension: u32) -> Result<TextureData, AssetError> {
    let bytes = read(path)?;
    let image = image::load_from_memory(&bytes)
        .map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgba8();

    check_texture_size(path, image.width(), image.height(), max_dimension)?;

    info!("Loaded texture {} ({}x{})", path.display(), image.width(), image.height());
    Ok(TextureData::from_image(image))
}

/// Procedural two-tone checkerboard
pub fn checkerboard(size: u32, cells: u32) -> TextureData {
    let cell = (size / cells.max(1)).max(1);
    let light = Rgba([235, 235, 235, 255]);
    let dark = Rgba([40, 40, 48, 255]);

    let image = RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            light
        } else {
            dark
        }
    });
    TextureData::from_image(image)
}

/// Texture from `path`, or the checkerboard when none is configured
pub fn texture_or_default(
    path: Option<&Path>,
    max_dimension: u32,
) -> Result<TextureData, AssetError> {
    match path {
        Some(path) => load_texture(path, max_dimension),
        None => {
            debug!("No texture configured, using checkerboard");
            Ok(checkerboard(CHECKER_SIZE, CHECKER_CELLS))
        }
    }
}

/// Number of mip levels down to 1x1
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Full mip chain starting with `base`, each level half the previous one
pub fn mip_chain(base: &TextureData) -> Vec<TextureData> {
    let mut levels = vec![base.clone()];
    let Some(mut image) = RgbaImage::from_raw(base.width, base.height, base.pixels.clone()) else {
        return levels;
    };

    while image.width() > 1 || image.height() > 1 {
        let width = (image.width() / 2).max(1);
        let height = (image.height() / 2).max(1);
        image = imageops::resize(&image, width, height, FilterType::Triangle);
        levels.push(TextureData::from_image(image.clone()));
    }

    levels
}

/// Read a WGSL source file
pub fn load_shader_source(path: &Path) -> Result<String, AssetError> {
    let source = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded shader {}", path.display());
    Ok(source)
}

/// Ray-march shader from `path`, or the built-in one
pub fn raymarch_shader_or_default(path: Option<&Path>) -> Result<String, AssetError> {
    match path {
        Some(path) => load_shader_source(path),
        None => Ok(RAYMARCH_SHADER.to_string()),
    }
}

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| AssetError::Io {
        path: PathBuf::from(path),
        source,
    })
}
