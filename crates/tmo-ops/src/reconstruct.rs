//! Writes compressed luminance back into an XYZ image.
//!
//! For every pixel of the region, with `Y` the original luminance and `L`
//! the compressed one:
//!
//! ```text
//! s = L / Y
//! X' = X * s,  Y' = L,  Z' = Z * s
//! ```
//!
//! so chromaticity `x = X / (X + Y + Z)` is preserved while brightness
//! follows the operator. Alpha is not touched.
//!
//! Plane pixel `(x, y)` lands on image pixel `(region.x + x, region.y + y)`.

use tmo_core::{Plane, Rect, X_CHANNEL, Y_CHANNEL, Z_CHANNEL, XyzImage};
use tracing::trace;

use crate::{OpsError, OpsResult};

/// What to do when the original luminance is exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroLuminancePolicy {
    /// Chroma scale is 0: X and Z become 0, Y takes the compressed value.
    #[default]
    Clamp,
    /// Divide anyway; X and Z become Inf or NaN.
    Propagate,
}

/// Reconstructs over the whole image with [`ZeroLuminancePolicy::Clamp`].
///
/// # Errors
///
/// [`OpsError::SizeMismatch`] if `compressed` is not the size of `image`.
pub fn reconstruct(image: &mut XyzImage, compressed: &Plane) -> OpsResult<()> {
    let bounds = image.bounds();
    reconstruct_region(image, bounds, compressed, ZeroLuminancePolicy::default())
}

/// Reconstructs `region` of `image` from `compressed`.
///
/// Nothing is written unless every check passes.
///
/// # Errors
///
/// - [`OpsError::SizeMismatch`] if `compressed` is not the size of `region`
/// - [`OpsError::Core`] with an invalid-region error if `region` leaves the
///   image
pub fn reconstruct_region(
    image: &mut XyzImage,
    region: Rect,
    compressed: &Plane,
    policy: ZeroLuminancePolicy,
) -> OpsResult<()> {
    if compressed.dimensions() != (region.width, region.height) {
        return Err(OpsError::SizeMismatch(tmo_core::Error::dimension_mismatch(
            compressed.dimensions(),
            (region.width, region.height),
        )));
    }
    if !image.bounds().contains_rect(&region) {
        return Err(tmo_core::Error::invalid_region(
            region.x,
            region.y,
            region.width,
            region.height,
            image.width(),
            image.height(),
        )
        .into());
    }

    trace!(region = %region, ?policy, "reconstruct");

    for (x, y) in Rect::from_size(region.width, region.height).coords() {
        let lum = compressed.get(x, y);
        let px = image.pixel_mut(region.x + x, region.y + y);
        let orig = px[Y_CHANNEL];
        let scale = if orig == 0.0 && policy == ZeroLuminancePolicy::Clamp {
            0.0
        } else {
            lum / orig
        };
        px[X_CHANNEL] *= scale;
        px[Y_CHANNEL] = lum;
        px[Z_CHANNEL] *= scale;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn scales_chroma_with_luminance() {
        let mut img = XyzImage::filled(2, 2, &[0.2, 0.4, 0.6]).unwrap();
        let compressed = Plane::filled(2, 2, 0.1);
        reconstruct(&mut img, &compressed).unwrap();
        let [x, y, z] = img.xyz(1, 1);
        assert_relative_eq!(x, 0.05, epsilon = 1e-6);
        assert_eq!(y, 0.1);
        assert_relative_eq!(z, 0.15, epsilon = 1e-6);
    }

    #[test]
    fn chromaticity_preserved() {
        let mut img = XyzImage::filled(1, 1, &[0.3, 0.9, 0.45]).unwrap();
        let before = img.xyz(0, 0);
        let sum: f32 = before.iter().sum();
        reconstruct(&mut img, &Plane::filled(1, 1, 0.25)).unwrap();
        let after = img.xyz(0, 0);
        let sum_after: f32 = after.iter().sum();
        assert_relative_eq!(before[0] / sum, after[0] / sum_after, epsilon = 1e-6);
        assert_relative_eq!(before[2] / sum, after[2] / sum_after, epsilon = 1e-6);
    }

    #[test]
    fn zero_luminance_clamp() {
        let mut img = XyzImage::filled(1, 1, &[0.1, 0.0, 0.2]).unwrap();
        reconstruct(&mut img, &Plane::filled(1, 1, 0.3)).unwrap();
        assert_eq!(img.xyz(0, 0), [0.0, 0.3, 0.0]);
    }

    #[test]
    fn zero_luminance_propagate() {
        let mut img = XyzImage::filled(1, 1, &[0.1, 0.0, 0.0]).unwrap();
        let bounds = img.bounds();
        reconstruct_region(
            &mut img,
            bounds,
            &Plane::filled(1, 1, 0.3),
            ZeroLuminancePolicy::Propagate,
        )
        .unwrap();
        let [x, y, z] = img.xyz(0, 0);
        assert!(x.is_infinite());
        assert_eq!(y, 0.3);
        // 0 * inf
        assert!(z.is_nan());
    }

    #[test]
    fn alpha_untouched() {
        let mut img = XyzImage::filled(2, 1, &[0.5, 1.0, 0.5, 0.75]).unwrap();
        reconstruct(&mut img, &Plane::filled(2, 1, 0.5)).unwrap();
        assert_eq!(img.pixel(0, 0), &[0.25, 0.5, 0.25, 0.75]);
        assert_eq!(img.pixel(1, 0)[3], 0.75);
    }

    #[test]
    fn region_offsets_pair_x_and_y() {
        let mut img = XyzImage::filled(4, 3, &[1.0, 1.0, 1.0]).unwrap();
        let mut compressed = Plane::filled(2, 1, 0.5);
        compressed.set(1, 0, 0.25);
        reconstruct_region(&mut img, Rect::new(1, 2, 2, 1), &compressed, ZeroLuminancePolicy::Clamp)
            .unwrap();
        assert_eq!(img.luminance(1, 2), 0.5);
        assert_eq!(img.luminance(2, 2), 0.25);
        // outside the region
        assert_eq!(img.luminance(0, 2), 1.0);
        assert_eq!(img.luminance(2, 1), 1.0);
        assert_eq!(img.luminance(3, 2), 1.0);
    }

    #[test]
    fn size_mismatch_leaves_image_alone() {
        let mut img = XyzImage::filled(3, 3, &[0.2, 0.4, 0.6]).unwrap();
        let before = img.clone();
        let err = reconstruct(&mut img, &Plane::filled(3, 2, 0.1)).unwrap_err();
        match &err {
            OpsError::SizeMismatch(inner) => {
                assert!(inner.is_shape_error());
                assert!(matches!(
                    inner,
                    tmo_core::Error::DimensionMismatch {
                        a_width: 3,
                        a_height: 2,
                        b_width: 3,
                        b_height: 3
                    }
                ));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(err.to_string(), "size mismatch: dimension mismatch: 3x2 vs 3x3");
        assert_eq!(img, before);
    }

    #[test]
    fn region_outside_image() {
        let mut img = XyzImage::filled(3, 3, &[0.2, 0.4, 0.6]).unwrap();
        let err = reconstruct_region(
            &mut img,
            Rect::new(2, 2, 2, 2),
            &Plane::filled(2, 2, 0.1),
            ZeroLuminancePolicy::Clamp,
        )
        .unwrap_err();
        assert!(matches!(err, OpsError::Core(_)));
    }
}
