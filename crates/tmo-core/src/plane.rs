//! Single-channel luminance buffers and the accessor trait over them.
//!
//! Tone mapping reads luminance through [`LumaAccess`], which hides whether
//! the values live in a dense [`Plane`] or interleaved inside an
//! [`XyzImage`](crate::XyzImage). Coordinates given to an accessor are
//! local: (0, 0) is the top-left pixel of whatever region it covers.
//!
//! # Memory Layout
//!
//! A [`Plane`] stores `width * height` values in **row-major** order:
//!
//! ```text
//! [Y Y Y Y ...]  ← Row 0
//! [Y Y Y Y ...]  ← Row 1
//! ```
//!
//! # Usage
//!
//! ```rust
//! use tmo_core::{LumaAccess, Plane};
//!
//! let mut plane = Plane::filled(4, 2, 0.5);
//! plane.set(3, 1, 2.0);
//! assert_eq!(plane.luma(3, 1), 2.0);
//! assert_eq!(plane.values().count(), 8);
//! ```

use crate::{Error, Result};

/// Read access to a 2D luminance channel.
pub trait LumaAccess {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Luminance at local (x, y).
    ///
    /// Callers stay within `width() x height()`; out-of-range access may panic.
    fn luma(&self, x: u32, y: u32) -> f32;

    /// Dimensions as (width, height).
    #[inline]
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Returns `true` if the accessor covers no pixels.
    #[inline]
    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Number of pixels covered.
    #[inline]
    fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Values of row `y`, left to right.
    fn row_values(&self, y: u32) -> impl Iterator<Item = f32> + '_ {
        (0..self.width()).map(move |x| self.luma(x, y))
    }

    /// All values in row-major order.
    fn values(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.height()).flat_map(move |y| self.row_values(y))
    }
}

/// Dense, owned, row-major `f32` luminance buffer.
///
/// The stage that allocates a `Plane` owns it exclusively; the input and
/// output of a compression step are always distinct planes.
#[derive(Clone, PartialEq)]
pub struct Plane {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl Plane {
    /// Creates a plane filled with zeros.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Creates a plane filled with `value`.
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self {
            data: vec![value; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Creates a plane from row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height`.
    ///
    /// ```rust
    /// use tmo_core::Plane;
    ///
    /// assert!(Plane::from_data(2, 2, vec![0.0; 4]).is_ok());
    /// assert!(Plane::from_data(2, 2, vec![0.0; 3]).is_err());
    /// ```
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize;
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
        })
    }

    /// Copies any luminance accessor into a new dense plane.
    pub fn from_access<A: LumaAccess>(src: &A) -> Self {
        let (width, height) = src.dimensions();
        let mut data = Vec::with_capacity(src.pixel_count());
        data.extend(src.values());
        Self {
            data,
            width,
            height,
        }
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

    /// Returns `true` if the plane has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Value at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        debug_assert!(x < self.width && y < self.height, "plane access out of bounds");
        self.data[self.offset(x, y)]
    }

    /// Stores `value` at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        debug_assert!(x < self.width && y < self.height, "plane access out of bounds");
        let offset = self.offset(x, y);
        self.data[offset] = value;
    }

    /// Row `y` as a slice.
    #[inline]
    pub fn row(&self, y: u32) -> &[f32] {
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    /// Row `y` as a mutable slice.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [f32] {
        let start = y as usize * self.width as usize;
        let width = self.width as usize;
        &mut self.data[start..start + width]
    }

    /// Raw row-major data.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Raw row-major data, mutable.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the plane, returning its data.
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }
}

impl LumaAccess for Plane {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn luma(&self, x: u32, y: u32) -> f32 {
        self.get(x, y)
    }

    fn row_values(&self, y: u32) -> impl Iterator<Item = f32> + '_ {
        self.row(y).iter().copied()
    }
}

impl std::fmt::Debug for Plane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plane")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let p = Plane::new(3, 2);
        assert_eq!(p.dimensions(), (3, 2));
        assert!(p.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_from_data_length_check() {
        let err = Plane::from_data(3, 3, vec![1.0; 8]).unwrap_err();
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_row_major_layout() {
        let p = Plane::from_data(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(p.get(1, 0), 2.0);
        assert_eq!(p.get(0, 1), 3.0);
        assert_eq!(p.row(1), &[3.0, 4.0]);
        let values: Vec<f32> = p.values().collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_set_and_read_back() {
        let mut p = Plane::new(2, 2);
        p.set(1, 1, 7.5);
        assert_eq!(p.luma(1, 1), 7.5);
        p.row_mut(0)[0] = 1.5;
        assert_eq!(p.get(0, 0), 1.5);
    }

    #[test]
    fn test_from_access_copies() {
        let src = Plane::from_data(2, 1, vec![0.25, 0.75]).unwrap();
        let copy = Plane::from_access(&src);
        assert_eq!(copy, src);
    }

    #[test]
    fn test_empty() {
        let p = Plane::new(0, 5);
        assert!(p.is_empty());
        assert!(LumaAccess::is_empty(&p));
        assert_eq!(p.values().count(), 0);
    }
}
