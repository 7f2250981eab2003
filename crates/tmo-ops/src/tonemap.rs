//! Tone-mapping entry point.
//!
//! [`ToneMapper`] runs the full pipeline on an [`XyzImage`]:
//!
//! ```text
//! lookup operator ──► clip region ──► copy Y into a Plane
//!                                          │
//!        reconstruct ◄── compress ◄── statistics
//! ```
//!
//! The operator is looked up before anything else so an unknown identifier
//! fails without touching the image. An empty region (zero-sized, or
//! entirely outside the image) is a no-op.
//!
//! # Example
//!
//! ```rust
//! use tmo_core::XyzImage;
//! use tmo_ops::config::Configuration;
//! use tmo_ops::registry::OperatorRegistry;
//! use tmo_ops::tonemap::ToneMapper;
//!
//! let registry = OperatorRegistry::with_builtin();
//! let mapper = ToneMapper::new(&registry);
//!
//! let mut img = XyzImage::filled(4, 4, &[9.5, 10.0, 10.9]).unwrap();
//! img.set_xyz(0, 0, [950.0, 1000.0, 1089.0]);
//!
//! let stats = mapper.apply("ashikhminO2", &mut img, &Configuration::new()).unwrap();
//! assert!(stats.is_some());
//! assert!(img.luminance(0, 0) < 1000.0);
//! ```

use tmo_core::{Plane, Rect, XyzImage};
use tracing::{debug, warn};

use crate::config::Configuration;
use crate::reconstruct::{ZeroLuminancePolicy, reconstruct_region};
use crate::registry::OperatorRegistry;
use crate::stats::{MinLuminancePolicy, Statistics};
use crate::{OpsError, OpsResult};

/// Pipeline knobs that are not operator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneMapOptions {
    /// How the statistics seed their minimum.
    pub min_policy: MinLuminancePolicy,
    /// How reconstruction treats pixels whose original Y is 0.
    pub zero_luminance: ZeroLuminancePolicy,
    /// Collect statistics with the row-parallel scan (needs the `parallel`
    /// feature, ignored otherwise).
    pub parallel: bool,
}

impl Default for ToneMapOptions {
    fn default() -> Self {
        Self {
            min_policy: MinLuminancePolicy::default(),
            zero_luminance: ZeroLuminancePolicy::default(),
            parallel: cfg!(feature = "parallel"),
        }
    }
}

/// Applies registered operators to images.
#[derive(Debug, Clone, Copy)]
pub struct ToneMapper<'r> {
    registry: &'r OperatorRegistry,
    options: ToneMapOptions,
}

impl<'r> ToneMapper<'r> {
    /// Creates a mapper with default options.
    pub fn new(registry: &'r OperatorRegistry) -> Self {
        Self::with_options(registry, ToneMapOptions::default())
    }

    /// Creates a mapper with explicit options.
    pub fn with_options(registry: &'r OperatorRegistry, options: ToneMapOptions) -> Self {
        Self { registry, options }
    }

    /// Options in effect.
    #[inline]
    pub fn options(&self) -> &ToneMapOptions {
        &self.options
    }

    /// Tone maps the whole image.
    pub fn apply(&self, id: &str, image: &mut XyzImage, config: &Configuration) -> OpsResult<Option<Statistics>> {
        let bounds = image.bounds();
        self.apply_region(id, image, bounds, config)
    }

    /// Tone maps `region` of the image in place.
    ///
    /// `region` is clipped to the image. Returns the statistics the operator
    /// saw, or `None` when the clipped region is empty and nothing was done.
    ///
    /// `config` is layered over the operator's defaults, so it only needs
    /// the keys it changes.
    ///
    /// # Errors
    ///
    /// - [`OpsError::OperatorNotFound`] for an unknown `id`
    /// - [`OpsError::SizeMismatch`] if the operator returns a plane of the
    ///   wrong size
    pub fn apply_region(
        &self,
        id: &str,
        image: &mut XyzImage,
        region: Rect,
        config: &Configuration,
    ) -> OpsResult<Option<Statistics>> {
        let op = self.registry.lookup(id)?;

        let region = match image.bounds().intersect(&region) {
            Some(r) if !r.is_empty() => r,
            _ => {
                debug!(id, region = %region, "tonemap: empty region, skipped");
                return Ok(None);
            }
        };

        let luminance = Plane::from_access(&image.luma_view(region)?);
        let stats = self.statistics(&luminance);

        let mut effective = op.default_configuration();
        effective.merge(config);

        debug!(
            id,
            region = %region,
            avg = stats.avg_log_luminance,
            max = stats.max_luminance,
            min = stats.min_luminance,
            stops = ?stats.dynamic_range_stops(),
            "tonemap::apply"
        );

        let compressed = op.compress(&luminance, &stats, &effective);
        if compressed.dimensions() != luminance.dimensions() {
            warn!(
                id,
                expected = ?luminance.dimensions(),
                got = ?compressed.dimensions(),
                "operator changed plane size"
            );
            return Err(OpsError::SizeMismatch(tmo_core::Error::dimension_mismatch(
                compressed.dimensions(),
                luminance.dimensions(),
            )));
        }

        reconstruct_region(image, region, &compressed, self.options.zero_luminance)?;
        Ok(Some(stats))
    }

    fn statistics(&self, luminance: &Plane) -> Statistics {
        #[cfg(feature = "parallel")]
        if self.options.parallel {
            return Statistics::collect_par(luminance, self.options.min_policy);
        }
        Statistics::collect_with(luminance, self.options.min_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::{OperatorDescriptor, ToneMapOperator};

    struct Shrink {
        descriptor: OperatorDescriptor,
    }

    impl ToneMapOperator for Shrink {
        fn descriptor(&self) -> &OperatorDescriptor {
            &self.descriptor
        }

        fn default_configuration(&self) -> Configuration {
            Configuration::new()
        }

        fn compress(&self, _: &Plane, _: &Statistics, _: &Configuration) -> Plane {
            Plane::new(1, 1)
        }
    }

    fn hdr_image() -> XyzImage {
        let mut img = XyzImage::filled(4, 4, &[0.095, 0.1, 0.109]).unwrap();
        img.set_xyz(0, 0, [950.0, 1000.0, 1089.0]);
        img
    }

    #[test]
    fn unknown_operator_touches_nothing() {
        let registry = OperatorRegistry::with_builtin();
        let mapper = ToneMapper::new(&registry);
        let mut img = hdr_image();
        let before = img.clone();
        let err = mapper.apply("reinhard", &mut img, &Configuration::new()).unwrap_err();
        assert!(matches!(err, OpsError::OperatorNotFound(_)));
        assert_eq!(img, before);
    }

    #[test]
    fn empty_region_is_noop() {
        let registry = OperatorRegistry::with_builtin();
        let mapper = ToneMapper::new(&registry);
        let mut img = hdr_image();
        let before = img.clone();
        let cfg = Configuration::new();
        assert_eq!(mapper.apply_region("ashikhminO2", &mut img, Rect::new(1, 1, 0, 3), &cfg).unwrap(), None);
        assert_eq!(mapper.apply_region("ashikhminO2", &mut img, Rect::new(10, 10, 2, 2), &cfg).unwrap(), None);
        assert_eq!(img, before);
    }

    #[test]
    fn region_is_clipped() {
        let registry = OperatorRegistry::with_builtin();
        let mapper = ToneMapper::new(&registry);
        let mut img = hdr_image();
        let stats = mapper
            .apply_region("ashikhminO2", &mut img, Rect::new(2, 2, 10, 10), &Configuration::new())
            .unwrap()
            .unwrap();
        // hot pixel at (0, 0) is outside the clipped region
        assert!(stats.max_luminance < 1.0);
        assert_eq!(img.luminance(0, 0), 1000.0);
        assert_ne!(img.luminance(3, 3), 0.1);
    }

    #[test]
    fn hot_pixel_compressed() {
        let registry = OperatorRegistry::with_builtin();
        let mapper = ToneMapper::new(&registry);
        let mut img = hdr_image();
        let stats = mapper.apply("ashikhminO2", &mut img, &Configuration::new()).unwrap().unwrap();
        assert_eq!(stats.max_luminance, 1000.0);
        assert!(img.luminance(0, 0) < 1000.0);
    }

    #[test]
    fn bad_operator_output_rejected() {
        let mut registry = OperatorRegistry::new();
        registry
            .register(Box::new(Shrink {
                descriptor: OperatorDescriptor::new("shrink", "Shrink"),
            }))
            .unwrap();
        let mapper = ToneMapper::new(&registry);
        let mut img = hdr_image();
        let before = img.clone();
        let err = mapper.apply("shrink", &mut img, &Configuration::new()).unwrap_err();
        assert!(matches!(
            err,
            OpsError::SizeMismatch(tmo_core::Error::DimensionMismatch { a_width: 1, a_height: 1, b_width: 4, b_height: 4 })
        ));
        assert_eq!(img, before);
    }

    #[test]
    fn options_select_min_policy() {
        let registry = OperatorRegistry::with_builtin();
        let observed = ToneMapper::with_options(
            &registry,
            ToneMapOptions {
                min_policy: MinLuminancePolicy::Observed,
                ..Default::default()
            },
        );
        let mut img = hdr_image();
        let stats = observed.apply("ashikhminO2", &mut img, &Configuration::new()).unwrap().unwrap();
        assert_eq!(stats.min_luminance, 0.1f32 as f64);

        let mut img = hdr_image();
        let stats = ToneMapper::new(&registry)
            .apply("ashikhminO2", &mut img, &Configuration::new())
            .unwrap()
            .unwrap();
        assert_eq!(stats.min_luminance, 0.0);
    }
}
