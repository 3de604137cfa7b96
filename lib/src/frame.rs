use crate::error::Error;
use crate::error::Result;

/// A grid of 16 bit depth samples in millimeters.
///
/// Stored row-major, top row first. A sample of 0 means "no data".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthFrame {
    width: u32,
    height: u32,
    samples: Vec<u16>,
}

impl DepthFrame {
    /// Constructor
    ///
    /// # Errors
    ///   When `samples` does not hold exactly `width * height` values.
    pub fn new(width: u32, height: u32, samples: Vec<u16>) -> Result<Self> {
        let expected = pixel_count(width, height);
        if samples.len() != expected {
            return Err(Error::buffer_mismatch(expected, samples.len()));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Decodes a raw little-endian 16 bit buffer, as handed out by the sensor.
    ///
    /// # Errors
    ///   When `raw` does not hold exactly `2 * width * height` bytes.
    pub fn from_le_bytes(width: u32, height: u32, raw: &[u8]) -> Result<Self> {
        let expected = pixel_count(width, height) * 2;
        if raw.len() != expected {
            return Err(Error::buffer_mismatch(expected, raw.len()));
        }
        let samples = raw
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect();
        Self::new(width, height, samples)
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of samples.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        self.samples.len()
    }

    /// All samples, row-major.
    #[must_use]
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Sample at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples.get(linear_index(x, y, self.width)).copied()
    }
}

/// A grid of RGBA8 pixels sharing the depth frame's layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorFrame {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl ColorFrame {
    /// Constructor
    ///
    /// # Errors
    ///   When `pixels` does not hold exactly `width * height` values.
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Result<Self> {
        let expected = pixel_count(width, height);
        if pixels.len() != expected {
            return Err(Error::buffer_mismatch(expected, pixels.len()));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Imports an interleaved RGBA buffer.
    ///
    /// # Errors
    ///   When `raw` does not hold exactly `4 * width * height` bytes.
    pub fn from_rgba_bytes(width: u32, height: u32, raw: &[u8]) -> Result<Self> {
        Self::from_bytes(width, height, raw, |p| [p[0], p[1], p[2], p[3]])
    }

    /// Imports an interleaved BGRA buffer, the sensor's native color layout.
    ///
    /// Blue and red are swapped so the stored pixels are RGBA.
    ///
    /// # Errors
    ///   When `raw` does not hold exactly `4 * width * height` bytes.
    pub fn from_bgra_bytes(width: u32, height: u32, raw: &[u8]) -> Result<Self> {
        Self::from_bytes(width, height, raw, |p| [p[2], p[1], p[0], p[3]])
    }

    fn from_bytes(
        width: u32,
        height: u32,
        raw: &[u8],
        pixel: impl Fn(&[u8]) -> [u8; 4],
    ) -> Result<Self> {
        let expected = pixel_count(width, height) * 4;
        if raw.len() != expected {
            return Err(Error::buffer_mismatch(expected, raw.len()));
        }
        Self::new(width, height, raw.chunks_exact(4).map(pixel).collect())
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// All pixels, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(linear_index(x, y, self.width)).copied()
    }
}

/// A depth and color frame taken from the same capture.
///
/// The depth frame is expected to be registered onto the color camera's
/// pixel grid already.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePair {
    /// Registered depth.
    pub depth: DepthFrame,
    /// Color.
    pub color: ColorFrame,
}

/// Something that produces registered frame pairs, typically a camera.
///
/// Device state lives behind this trait, never inside the reconstruction.
pub trait FrameSource {
    /// Failure reported by the device or loader.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Takes a single capture.
    ///
    /// # Errors
    ///   When the device or loader cannot provide a frame pair.
    fn capture(&mut self) -> core::result::Result<FramePair, Self::Error>;
}

/// Checks that both frames share a pixel grid.
///
/// # Errors
///   [`Error::DimensionMismatch`] when width or height differ.
pub fn check_dimensions(depth: &DepthFrame, color: &ColorFrame) -> Result<()> {
    if depth.width != color.width || depth.height != color.height {
        return Err(Error::DimensionMismatch {
            depth_width: depth.width,
            depth_height: depth.height,
            color_width: color.width,
            color_height: color.height,
        });
    }
    Ok(())
}

/// Row-major position of pixel `(x, y)`.
#[must_use]
#[inline]
pub const fn linear_index(x: u32, y: u32, width: u32) -> usize {
    y as usize * width as usize + x as usize
}

const fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}
