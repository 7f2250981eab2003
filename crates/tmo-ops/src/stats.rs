//! Global luminance statistics.
//!
//! A single forward scan over a luminance accessor yields the log-average
//! (geometric mean) luminance together with the maximum and minimum.
//!
//! The log-average accumulates `ln(Y + ε)` with ε = [`LUMINANCE_EPSILON`]
//! and exponentiates once at the end, so a handful of black pixels pull the
//! average down without sending it to zero.
//!
//! Negative luminance (out-of-gamut residue from an XYZ conversion) counts
//! as black in every statistic, matching how the operators read it. NaN
//! pixels still poison the log-sum.
//!
//! # Minimum policy
//!
//! [`MinLuminancePolicy::ZeroFloor`] (the default) starts the running
//! minimum at `0.0`, so an image whose pixels are all positive still reports
//! `min == 0` and the Ashikhmin curve is anchored at black.
//! [`MinLuminancePolicy::Observed`] reports the true minimum instead.
//!
//! # Example
//!
//! ```rust
//! use tmo_core::Plane;
//! use tmo_ops::stats::{MinLuminancePolicy, Statistics};
//!
//! let plane = Plane::from_data(2, 1, vec![0.5, 2.0]).unwrap();
//!
//! let stats = Statistics::collect(&plane);
//! assert_eq!(stats.max_luminance, 2.0);
//! assert_eq!(stats.min_luminance, 0.0);
//!
//! let observed = Statistics::collect_with(&plane, MinLuminancePolicy::Observed);
//! assert_eq!(observed.min_luminance, 0.5);
//! ```

use tmo_core::LumaAccess;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Offset added before taking the logarithm, avoids `ln(0)`.
pub const LUMINANCE_EPSILON: f64 = 1e-4;

/// How the minimum luminance is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinLuminancePolicy {
    /// Running minimum starts at 0.0: reports `min(0, min Y)`.
    #[default]
    ZeroFloor,
    /// Running minimum starts at the first pixel: reports `min Y`.
    Observed,
}

/// Immutable summary of a luminance region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Statistics {
    /// Log-average luminance, `exp(mean(ln(Y + ε)))`.
    pub avg_log_luminance: f64,
    /// Largest Y (never below 0.0, the running maximum starts there).
    pub max_luminance: f64,
    /// Smallest Y under the chosen [`MinLuminancePolicy`], never negative.
    pub min_luminance: f64,
}

/// Running partial state of a scan; combinable across row ranges.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    log_sum: f64,
    count: u64,
    max: f64,
    min: f64,
}

impl Accumulator {
    fn new(policy: MinLuminancePolicy) -> Self {
        let min = match policy {
            MinLuminancePolicy::ZeroFloor => 0.0,
            MinLuminancePolicy::Observed => f64::INFINITY,
        };
        Self {
            log_sum: 0.0,
            count: 0,
            max: 0.0,
            min,
        }
    }

    #[inline]
    fn push(&mut self, y: f32) {
        let y = if y < 0.0 { 0.0 } else { y as f64 };
        self.log_sum += (y + LUMINANCE_EPSILON).ln();
        self.count += 1;
        if y > self.max {
            self.max = y;
        }
        if y < self.min {
            self.min = y;
        }
    }

    fn merge(mut self, other: Self) -> Self {
        self.log_sum += other.log_sum;
        self.count += other.count;
        self.max = if other.max > self.max { other.max } else { self.max };
        self.min = if other.min < self.min { other.min } else { self.min };
        self
    }

    fn finish(self) -> Statistics {
        if self.count == 0 {
            return Statistics::default();
        }
        let min = if self.min.is_infinite() && self.min > 0.0 {
            // Observed policy over pixels that are all NaN.
            0.0
        } else {
            self.min
        };
        Statistics {
            avg_log_luminance: (self.log_sum / self.count as f64).exp(),
            max_luminance: self.max,
            min_luminance: min,
        }
    }
}

impl Statistics {
    /// Scans `luminance` once using [`MinLuminancePolicy::ZeroFloor`].
    ///
    /// An empty accessor yields all-zero statistics; callers are expected
    /// to skip empty regions before getting here.
    pub fn collect<A: LumaAccess>(luminance: &A) -> Self {
        Self::collect_with(luminance, MinLuminancePolicy::default())
    }

    /// Scans `luminance` once with an explicit minimum policy.
    pub fn collect_with<A: LumaAccess>(luminance: &A, policy: MinLuminancePolicy) -> Self {
        let mut acc = Accumulator::new(policy);
        for y in luminance.values() {
            acc.push(y);
        }
        let stats = acc.finish();
        trace!(
            width = luminance.width(),
            height = luminance.height(),
            avg = stats.avg_log_luminance,
            max = stats.max_luminance,
            min = stats.min_luminance,
            "stats::collect"
        );
        stats
    }

    /// Row-parallel scan.
    ///
    /// Every row is reduced sequentially, then the row partials are combined
    /// in row order. The result does not depend on the thread count and is
    /// identical between runs, but the log-sum may differ from
    /// [`collect_with`](Self::collect_with) in the last bits because the
    /// additions are grouped differently. Max and min are always identical.
    #[cfg(feature = "parallel")]
    pub fn collect_par<A: LumaAccess + Sync>(luminance: &A, policy: MinLuminancePolicy) -> Self {
        let rows: Vec<Accumulator> = (0..luminance.height())
            .into_par_iter()
            .map(|y| {
                let mut acc = Accumulator::new(policy);
                for v in luminance.row_values(y) {
                    acc.push(v);
                }
                acc
            })
            .collect();
        let stats = rows
            .into_iter()
            .fold(Accumulator::new(policy), Accumulator::merge)
            .finish();
        trace!(
            avg = stats.avg_log_luminance,
            max = stats.max_luminance,
            min = stats.min_luminance,
            "stats::collect_par"
        );
        stats
    }

    /// Dynamic range `max / min` in stops, `None` when the minimum is not
    /// positive.
    pub fn dynamic_range_stops(&self) -> Option<f64> {
        if self.min_luminance > 0.0 && self.max_luminance > 0.0 {
            Some((self.max_luminance / self.min_luminance).log2())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tmo_core::Plane;

    #[test]
    fn flat_gray_zero_floor() {
        let plane = Plane::filled(4, 4, 0.5);
        let stats = Statistics::collect(&plane);
        assert_relative_eq!(stats.avg_log_luminance, 0.5, epsilon = 2e-4);
        assert_eq!(stats.max_luminance, 0.5);
        assert_eq!(stats.min_luminance, 0.0);
    }

    #[test]
    fn flat_gray_observed() {
        let plane = Plane::filled(4, 4, 0.5);
        let stats = Statistics::collect_with(&plane, MinLuminancePolicy::Observed);
        assert_eq!(stats.min_luminance, 0.5);
        assert_eq!(stats.max_luminance, 0.5);
    }

    #[test]
    fn geometric_not_arithmetic_mean() {
        let plane = Plane::from_data(2, 1, vec![1.0, 100.0]).unwrap();
        let stats = Statistics::collect(&plane);
        // arithmetic mean would be 50.5
        assert_relative_eq!(stats.avg_log_luminance, 10.0, epsilon = 1e-2);
    }

    #[test]
    fn hot_pixel() {
        let plane = Plane::from_data(2, 2, vec![1000.0, 0.1, 0.1, 0.1]).unwrap();
        let stats = Statistics::collect(&plane);
        assert_eq!(stats.max_luminance, 1000.0);
        assert!(stats.avg_log_luminance > 0.1 && stats.avg_log_luminance < 1000.0);
    }

    #[test]
    fn all_black_saturates_at_epsilon() {
        let plane = Plane::new(3, 3);
        let stats = Statistics::collect(&plane);
        assert_relative_eq!(stats.avg_log_luminance, LUMINANCE_EPSILON, epsilon = 1e-12);
        assert_eq!(stats.max_luminance, 0.0);
        assert_eq!(stats.min_luminance, 0.0);
    }

    #[test]
    fn negative_values_count_as_black() {
        let negative = Plane::from_data(3, 1, vec![-0.001, 0.5, 2.0]).unwrap();
        let black = Plane::from_data(3, 1, vec![0.0, 0.5, 2.0]).unwrap();
        for policy in [MinLuminancePolicy::ZeroFloor, MinLuminancePolicy::Observed] {
            let s = Statistics::collect_with(&negative, policy);
            assert!(s.avg_log_luminance.is_finite());
            assert_eq!(s.min_luminance, 0.0);
            assert_eq!(s, Statistics::collect_with(&black, policy));
        }
        let large = Plane::from_data(2, 1, vec![-50.0, 1.0]).unwrap();
        assert!(Statistics::collect(&large).avg_log_luminance.is_finite());
    }

    #[test]
    fn bounds_hold() {
        let data: Vec<f32> = (1..=64).map(|i| i as f32 * 0.37).collect();
        let plane = Plane::from_data(8, 8, data).unwrap();
        for policy in [MinLuminancePolicy::ZeroFloor, MinLuminancePolicy::Observed] {
            let s = Statistics::collect_with(&plane, policy);
            assert!(s.min_luminance <= s.avg_log_luminance);
            assert!(s.avg_log_luminance <= s.max_luminance);
        }
    }

    #[test]
    fn empty_is_zeroed() {
        let plane = Plane::new(0, 4);
        assert_eq!(Statistics::collect(&plane), Statistics::default());
    }

    #[test]
    fn dynamic_range() {
        let plane = Plane::from_data(2, 1, vec![0.25, 4.0]).unwrap();
        let s = Statistics::collect_with(&plane, MinLuminancePolicy::Observed);
        assert_relative_eq!(s.dynamic_range_stops().unwrap(), 4.0);
        assert!(Statistics::collect(&plane).dynamic_range_stops().is_none());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_serial() {
        let data: Vec<f32> = (0..1024).map(|i| ((i * 37) % 101) as f32 * 0.5).collect();
        let plane = Plane::from_data(32, 32, data).unwrap();
        let serial = Statistics::collect(&plane);
        let par = Statistics::collect_par(&plane, MinLuminancePolicy::ZeroFloor);
        assert_eq!(serial.max_luminance, par.max_luminance);
        assert_eq!(serial.min_luminance, par.min_luminance);
        assert_relative_eq!(serial.avg_log_luminance, par.avg_log_luminance, max_relative = 1e-12);
        // reproducible run to run
        let again = Statistics::collect_par(&plane, MinLuminancePolicy::ZeroFloor);
        assert_eq!(par, again);
    }
}
