//! Ashikhmin 2002 local/global contrast compressor.
//!
//! Reference: M. Ashikhmin, "A Tone Mapping Algorithm for High Contrast
//! Images", Eurographics Workshop on Rendering, 2002.
//!
//! The operator maps world luminance to display luminance through the
//! integral of a threshold-versus-intensity curve (the capacity function
//! [`capacity`]), normalized between the region minimum and maximum:
//!
//! ```text
//! TM(L) = LDMAX * (C(L) - C(min)) / (C(max) - C(min))
//! ```
//!
//! In simple mode every pixel goes through `TM` directly. Otherwise each
//! pixel gets an adaptation luminance `La` blended, in log space, between
//! the log-average surround and the pixel itself:
//!
//! ```text
//! c  = ln((Y + eps) / avg)        log-contrast against the surround
//! k  = |1 - exp(-c)|              = |Y - avg| / Y
//! w  = min(1, k / threshold)      1 when threshold <= 0
//! La = avg * exp(w * c)
//! ```
//!
//! and one of two detail-preserving equations is applied:
//!
//! - [`Equation::A`]: `Y * TM(La) / La`
//! - [`Equation::B`]: `TM(La) + C(TM(La)) / C(La) * (Y - La)`
//!
//! Results are divided by `LDMAX`, so display white is 1.0. Every output
//! pixel depends only on its own input and the three statistics, which makes
//! the row loop trivially parallel with bit-identical results.
//!
//! Feeding the output back in with the same statistics is not a supported
//! chain: statistics must be recomputed from whatever buffer is compressed.
//!
//! # Example
//!
//! ```rust
//! use tmo_core::Plane;
//! use tmo_ops::ashikhmin02::Ashikhmin02;
//! use tmo_ops::{Statistics, ToneMapOperator};
//!
//! let hdr = Plane::from_data(2, 2, vec![1000.0, 0.1, 0.1, 0.1]).unwrap();
//! let stats = Statistics::collect(&hdr);
//!
//! let op = Ashikhmin02::new();
//! let ldr = op.compress(&hdr, &stats, &op.default_configuration());
//! assert!(ldr.get(0, 0) < 1000.0);
//! ```

use tmo_core::Plane;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::Configuration;
use crate::operator::{OperatorDescriptor, ToneMapOperator};
use crate::stats::{LUMINANCE_EPSILON, Statistics};

/// Registry identifier.
pub const OPERATOR_ID: &str = "ashikhminO2";
/// Display label.
pub const OPERATOR_LABEL: &str = "Ashikhmin 02";

/// Configuration key: skip local adaptation.
pub const KEY_SIMPLE: &str = "Simple";
/// Configuration key: local contrast threshold in [0, 1].
pub const KEY_LOCAL_CONTRAST: &str = "LocalContrastThreshold";
/// Configuration key: equation code (2 = A, 4 = B).
pub const KEY_EQUATION: &str = "Equation";

/// Default local contrast threshold.
pub const DEFAULT_LOCAL_CONTRAST: f64 = 0.5;

/// Maximum display luminance in cd/m².
pub const LDMAX: f64 = 100.0;

#[cfg(feature = "parallel")]
const PARALLEL_MIN_PIXELS: usize = 64 * 64;

/// Detail-preserving equation used outside simple mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Equation {
    /// Scale the pixel by the tone-mapped/world ratio of its adaptation level.
    #[default]
    A,
    /// Offset from the tone-mapped adaptation level, scaled by the ratio of
    /// capacities.
    B,
}

impl Equation {
    /// Persisted code of [`Equation::A`].
    pub const CODE_A: i64 = 2;
    /// Persisted code of [`Equation::B`].
    pub const CODE_B: i64 = 4;

    /// Decodes a persisted code. Anything other than [`Self::CODE_B`] is A.
    #[inline]
    pub fn from_code(code: i64) -> Self {
        if code == Self::CODE_B {
            Equation::B
        } else {
            Equation::A
        }
    }

    /// Persisted code.
    #[inline]
    pub fn code(self) -> i64 {
        match self {
            Equation::A => Self::CODE_A,
            Equation::B => Self::CODE_B,
        }
    }
}

/// Typed view of the operator's configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ashikhmin02Params {
    /// Global curve only, no local adaptation.
    pub simple: bool,
    /// Local contrast above which a pixel adapts to itself, in [0, 1].
    pub local_contrast_threshold: f64,
    /// Equation used outside simple mode.
    pub equation: Equation,
}

impl Default for Ashikhmin02Params {
    fn default() -> Self {
        Self {
            simple: false,
            local_contrast_threshold: DEFAULT_LOCAL_CONTRAST,
            equation: Equation::A,
        }
    }
}

impl Ashikhmin02Params {
    /// Reads parameters, coercing out-of-range values.
    ///
    /// The threshold is clamped into [0, 1]; a non-finite threshold falls
    /// back to the default.
    pub fn from_config(config: &Configuration) -> Self {
        let threshold = config.get_float(KEY_LOCAL_CONTRAST, DEFAULT_LOCAL_CONTRAST);
        Self {
            simple: config.get_bool(KEY_SIMPLE, false),
            local_contrast_threshold: threshold.clamp(0.0, 1.0),
            equation: Equation::from_code(config.get_int(KEY_EQUATION, Equation::CODE_A)),
        }
    }

    /// Writes parameters back under their persisted keys.
    pub fn to_config(&self) -> Configuration {
        Configuration::new()
            .with(KEY_SIMPLE, self.simple)
            .with(KEY_LOCAL_CONTRAST, self.local_contrast_threshold)
            .with(KEY_EQUATION, self.equation.code())
    }
}

/// Capacity function: integral of the threshold-versus-intensity curve.
///
/// Monotonically increasing; roughly counts just-noticeable differences
/// between 0 and `lum` cd/m².
#[inline]
pub fn capacity(lum: f64) -> f64 {
    if lum < 0.0034 {
        lum / 0.0014
    } else if lum < 1.0 {
        2.4483 + (lum / 0.0034).ln() / 0.4027
    } else if lum < 7.2444 {
        16.563 + (lum - 1.0) / 0.4027
    } else {
        32.0693 + (lum / 7.2444).ln() / 0.0556
    }
}

/// Global curve precomputed from the region statistics.
#[derive(Debug, Clone, Copy)]
struct Curve {
    c_min: f64,
    c_span: f64,
    max_lum: f64,
}

impl Curve {
    fn new(stats: &Statistics) -> Self {
        let c_min = capacity(stats.min_luminance);
        Self {
            c_min,
            c_span: capacity(stats.max_luminance) - c_min,
            max_lum: stats.max_luminance,
        }
    }

    /// World luminance to display luminance in [0, LDMAX].
    #[inline]
    fn tm(&self, lum: f64) -> f64 {
        if self.c_span > 0.0 {
            LDMAX * (capacity(lum) - self.c_min) / self.c_span
        } else if self.max_lum > 0.0 {
            // flat region: nothing to compress
            LDMAX * lum / self.max_lum
        } else {
            0.0
        }
    }
}

/// Per-invocation constants shared by every pixel.
#[derive(Debug, Clone, Copy)]
struct Mapper {
    curve: Curve,
    avg: f64,
    params: Ashikhmin02Params,
}

impl Mapper {
    fn new(stats: &Statistics, params: Ashikhmin02Params) -> Self {
        let avg = if stats.avg_log_luminance > 0.0 {
            stats.avg_log_luminance
        } else {
            LUMINANCE_EPSILON
        };
        Self {
            curve: Curve::new(stats),
            avg,
            params,
        }
    }

    /// Adaptation luminance for working luminance `y`.
    #[inline]
    fn adaptation(&self, y: f64) -> f64 {
        let c = ((y + LUMINANCE_EPSILON) / self.avg).ln();
        let k = (1.0 - (-c).exp()).abs();
        let threshold = self.params.local_contrast_threshold;
        let w = if threshold <= 0.0 {
            1.0
        } else {
            (k / threshold).min(1.0)
        };
        self.avg * (w * c).exp()
    }

    #[inline]
    fn map(&self, y: f32) -> f32 {
        // negative luminance is treated as black; NaN passes through
        let y = if y < 0.0 { 0.0 } else { y as f64 };

        let display = if self.params.simple {
            self.curve.tm(y)
        } else {
            let la = self.adaptation(y);
            let tm_la = self.curve.tm(la);
            match self.params.equation {
                Equation::A => y * tm_la / la,
                Equation::B => tm_la + capacity(tm_la) / capacity(la) * (y - la),
            }
        };
        let out = display / LDMAX;

        if out < 0.0 { 0.0 } else { out as f32 }
    }

    #[inline]
    fn map_row(&self, src: &[f32], dst: &mut [f32]) {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = self.map(s);
        }
    }
}

/// The Ashikhmin 02 operator.
#[derive(Debug, Clone)]
pub struct Ashikhmin02 {
    descriptor: OperatorDescriptor,
}

impl Ashikhmin02 {
    /// Creates the operator with its registry identifier and label.
    pub fn new() -> Self {
        Self {
            descriptor: OperatorDescriptor::new(OPERATOR_ID, OPERATOR_LABEL),
        }
    }

    /// Compresses with already-parsed parameters.
    pub fn compress_with(&self, luminance: &Plane, stats: &Statistics, params: Ashikhmin02Params) -> Plane {
        let (width, height) = luminance.dimensions();
        let mut out = Plane::new(width, height);
        if luminance.is_empty() {
            return out;
        }

        debug!(
            width,
            height,
            simple = params.simple,
            threshold = params.local_contrast_threshold,
            equation = params.equation.code(),
            "ashikhmin02::compress"
        );

        let mapper = Mapper::new(stats, params);
        let row_len = width as usize;

        #[cfg(feature = "parallel")]
        if luminance.data().len() >= PARALLEL_MIN_PIXELS {
            out.data_mut()
                .par_chunks_mut(row_len)
                .zip(luminance.data().par_chunks(row_len))
                .for_each(|(dst, src)| mapper.map_row(src, dst));
            return out;
        }

        for (dst, src) in out
            .data_mut()
            .chunks_mut(row_len)
            .zip(luminance.data().chunks(row_len))
        {
            mapper.map_row(src, dst);
        }
        out
    }
}

impl Default for Ashikhmin02 {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneMapOperator for Ashikhmin02 {
    fn descriptor(&self) -> &OperatorDescriptor {
        &self.descriptor
    }

    fn default_configuration(&self) -> Configuration {
        Ashikhmin02Params::default().to_config()
    }

    fn compress(&self, luminance: &Plane, stats: &Statistics, config: &Configuration) -> Plane {
        self.compress_with(luminance, stats, Ashikhmin02Params::from_config(config))
    }
}
