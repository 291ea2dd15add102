use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MicroloanError;
use crate::MicroloanResult;

/// An 8-bit RGB raster, row-major, three bytes per pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> MicroloanResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| MicroloanError::RenderFailed("bitmap dimensions overflow".into()))?;
        if pixels.len() != expected {
            return Err(MicroloanError::RenderFailed(format!(
                "bitmap {width}x{height} needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// A region of the rendered schedule to capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterRegion {
    pub id: String,
    /// Device pixels per layout pixel. Captures are taken at 2x.
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f32,
}

fn default_pixel_ratio() -> f32 {
    2.0
}

impl RasterRegion {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pixel_ratio: default_pixel_ratio(),
        }
    }
}

/// Turns a region of rendered content into a bitmap.
///
/// The backend is opaque to the core; the exporter only awaits the result
/// before pagination starts.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, region: &RasterRegion) -> MicroloanResult<Bitmap>;
}

/// Serves a capture that was already written to disk as PNG or JPEG.
#[cfg(feature = "raster")]
#[derive(Debug, Clone)]
pub struct ImageFileRasterizer {
    path: std::path::PathBuf,
}

#[cfg(feature = "raster")]
impl ImageFileRasterizer {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(feature = "raster")]
#[async_trait]
impl Rasterizer for ImageFileRasterizer {
    async fn rasterize(&self, region: &RasterRegion) -> MicroloanResult<Bitmap> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            MicroloanError::RenderFailed(format!(
                "cannot read capture {} for '{}': {e}",
                self.path.display(),
                region.id
            ))
        })?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| MicroloanError::RenderFailed(format!("cannot decode capture: {e}")))?
            .to_rgb8();
        let (width, height) = decoded.dimensions();
        tracing::debug!(region = %region.id, width, height, "capture decoded");
        Bitmap::from_rgb(width, height, decoded.into_raw())
    }
}
