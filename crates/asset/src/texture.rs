//! Texture images referenced by materials and their GPU release hook.

use std::path::{Path, PathBuf};

use crate::error::{AssetError, AssetResult};

/// Decoded RGBA8 pixels, rows bottom to top as the image file stores them.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TextureData {
    /// Wrap RGBA8 pixels, checking the buffer holds exactly `width * height` texels.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> AssetResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        if expected != Some(data.len()) {
            return Err(AssetError::TextureSize {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Decode an image file into RGBA8.
    pub fn load(path: impl AsRef<Path>) -> AssetResult<Self> {
        let path = path.as_ref();
        log::debug!("Loading texture from {:?}", path);

        let img = image::open(path).map_err(|source| AssetError::Texture {
            path: path.to_path_buf(),
            source,
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::info!("Loaded texture {}x{} from {:?}", width, height, path);

        Self::from_rgba8(width, height, rgba.into_raw())
    }

    /// White/grey 8px checkerboard standing in for an image that failed to load.
    pub fn placeholder(size: u32) -> Self {
        let mut data = Vec::with_capacity(size as usize * size as usize * 4);
        for y in 0..size {
            for x in 0..size {
                if ((x / 8) + (y / 8)) % 2 == 0 {
                    data.extend_from_slice(&[255, 255, 255, 255]);
                } else {
                    data.extend_from_slice(&[128, 128, 128, 255]);
                }
            }
        }
        Self {
            data,
            width: size,
            height: size,
        }
    }
}

/// A material texture: the resolved image path and its pixels.
#[derive(Clone, Debug)]
pub struct Texture {
    pub path: PathBuf,
    pub data: TextureData,
    /// Pixels are the checkerboard because `path` could not be loaded.
    pub placeholder: bool,
}

impl Texture {
    /// Load `path`, falling back to a checkerboard with a warning.
    pub fn load_or_placeholder(path: PathBuf) -> Self {
        match TextureData::load(&path) {
            Ok(data) => Self {
                path,
                data,
                placeholder: false,
            },
            Err(err) => {
                log::warn!("{}; using placeholder texture", err);
                Self {
                    path,
                    data: TextureData::placeholder(PLACEHOLDER_SIZE),
                    placeholder: true,
                }
            }
        }
    }
}

pub const PLACEHOLDER_SIZE: u32 = 16;

/// Graphics-side owner of uploaded textures.
///
/// Models hand every texture they reference to this hook exactly once when
/// disposed; the implementor frees whatever GPU object it created for it.
pub trait TextureRelease {
    fn release_texture(&mut self, texture: &Texture);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_checkerboard() {
        let tex = TextureData::placeholder(16);
        assert_eq!(tex.data.len(), 16 * 16 * 4);
        assert_eq!(&tex.data[..4], &[255, 255, 255, 255]);
        // second 8px cell on the first row is grey
        assert_eq!(&tex.data[8 * 4..8 * 4 + 4], &[128, 128, 128, 255]);
    }

    #[test]
    fn from_rgba8_checks_length() {
        assert!(TextureData::from_rgba8(2, 2, vec![0; 16]).is_ok());
        let err = TextureData::from_rgba8(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, AssetError::TextureSize { width: 2, height: 2, len: 15 }));
        assert!(TextureData::from_rgba8(u32::MAX, u32::MAX, Vec::new()).is_err());
    }

    #[test]
    fn load_png_roundtrip_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("check.png");
        let tex = TextureData::placeholder(8);
        image::save_buffer(&path, &tex.data, 8, 8, image::ExtendedColorType::Rgba8).unwrap();

        let loaded = TextureData::load(&path).unwrap();
        assert_eq!(loaded, tex);
    }

    #[test]
    fn load_missing_file_is_texture_error() {
        let err = TextureData::load("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, AssetError::Texture { .. }));
    }

    #[test]
    fn missing_image_falls_back_to_placeholder() {
        let tex = Texture::load_or_placeholder(PathBuf::from("/definitely/not/here.png"));
        assert!(tex.placeholder);
        assert_eq!(tex.data, TextureData::placeholder(PLACEHOLDER_SIZE));
    }
}
