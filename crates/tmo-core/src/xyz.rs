//! Interleaved linear XYZ(A) float images.
//!
//! [`XyzImage`] is the chroma buffer a tone map rewrites in place. Pixels
//! are stored interleaved, row-major, with either three channels
//! (`X Y Z`) or four (`X Y Z A`). Channel 1 (Y) is the luminance under
//! transformation; X and Z are only ever rescaled, and alpha is never read
//! nor written by tone mapping.
//!
//! Converting into and out of XYZ is the caller's job.
//!
//! # Usage
//!
//! ```rust
//! use tmo_core::{LumaAccess, Rect, XyzImage};
//!
//! let mut img = XyzImage::filled(8, 8, &[0.3, 0.5, 0.2]).unwrap();
//! img.set_xyz(1, 1, [1.0, 2.0, 0.5]);
//!
//! let view = img.luma_view(Rect::new(1, 1, 2, 2)).unwrap();
//! assert_eq!(view.luma(0, 0), 2.0);
//! assert_eq!(view.luma(1, 1), 0.5);
//! ```

use crate::{Error, LumaAccess, Rect, Result};

/// Index of the X channel.
pub const X_CHANNEL: usize = 0;
/// Index of the luminance (Y) channel.
pub const Y_CHANNEL: usize = 1;
/// Index of the Z channel.
pub const Z_CHANNEL: usize = 2;

/// Owned interleaved XYZ or XYZA `f32` image.
#[derive(Clone, PartialEq)]
pub struct XyzImage {
    data: Vec<f32>,
    width: u32,
    height: u32,
    channels: usize,
}

fn check_channels(channels: usize) -> Result<()> {
    if channels == 3 || channels == 4 {
        Ok(())
    } else {
        Err(Error::channel_mismatch("3 or 4", channels))
    }
}

impl XyzImage {
    /// Creates a zeroed image with `channels` (3 or 4) channels.
    pub fn new(width: u32, height: u32, channels: usize) -> Result<Self> {
        check_channels(channels)?;
        Ok(Self {
            data: vec![0.0; width as usize * height as usize * channels],
            width,
            height,
            channels,
        })
    }

    /// Creates an image where every pixel equals `pixel`.
    ///
    /// The channel count is taken from `pixel.len()`.
    pub fn filled(width: u32, height: u32, pixel: &[f32]) -> Result<Self> {
        check_channels(pixel.len())?;
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * pixel.len());
        for _ in 0..count {
            data.extend_from_slice(pixel);
        }
        Ok(Self {
            data,
            width,
            height,
            channels: pixel.len(),
        })
    }

    /// Wraps interleaved data.
    ///
    /// # Errors
    ///
    /// - [`Error::ChannelMismatch`] if `channels` is not 3 or 4
    /// - [`Error::InvalidDimensions`] if the data length is wrong
    pub fn from_data(width: u32, height: u32, channels: usize, data: Vec<f32>) -> Result<Self> {
        check_channels(channels)?;
        let expected = width as usize * height as usize * channels;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} elements, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Channels per pixel (3 or 4).
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns `true` if the image carries an alpha channel.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// Rectangle covering the whole image.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels
    }

    /// All channels of the pixel at (x, y).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[f32] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.offset(x, y);
        &self.data[offset..offset + self.channels]
    }

    /// All channels of the pixel at (x, y), mutable.
    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [f32] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.offset(x, y);
        let channels = self.channels;
        &mut self.data[offset..offset + channels]
    }

    /// X, Y and Z of the pixel at (x, y).
    #[inline]
    pub fn xyz(&self, x: u32, y: u32) -> [f32; 3] {
        let px = self.pixel(x, y);
        [px[X_CHANNEL], px[Y_CHANNEL], px[Z_CHANNEL]]
    }

    /// Overwrites X, Y and Z of the pixel at (x, y); alpha is kept.
    #[inline]
    pub fn set_xyz(&mut self, x: u32, y: u32, xyz: [f32; 3]) {
        self.pixel_mut(x, y)[..3].copy_from_slice(&xyz);
    }

    /// Luminance (Y) of the pixel at (x, y).
    #[inline]
    pub fn luminance(&self, x: u32, y: u32) -> f32 {
        self.pixel(x, y)[Y_CHANNEL]
    }

    /// Raw interleaved data.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Consumes the image, returning its interleaved data.
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Read-only luminance accessor over `region`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if `region` is not inside the image.
    pub fn luma_view(&self, region: Rect) -> Result<LumaView<'_>> {
        if !self.bounds().contains_rect(&region) {
            return Err(Error::invalid_region(
                region.x,
                region.y,
                region.width,
                region.height,
                self.width,
                self.height,
            ));
        }
        Ok(LumaView {
            image: self,
            region,
        })
    }
}

impl std::fmt::Debug for XyzImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XyzImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .finish()
    }
}

/// Borrowed view of the Y channel of an [`XyzImage`] region.
#[derive(Clone, Copy)]
pub struct LumaView<'a> {
    image: &'a XyzImage,
    region: Rect,
}

impl LumaView<'_> {
    /// Region of the source image this view covers.
    #[inline]
    pub fn region(&self) -> Rect {
        self.region
    }
}

impl LumaAccess for LumaView<'_> {
    #[inline]
    fn width(&self) -> u32 {
        self.region.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.region.height
    }

    #[inline]
    fn luma(&self, x: u32, y: u32) -> f32 {
        self.image.luminance(self.region.x + x, self.region.y + y)
    }
}
