//! # tmo-ops
//!
//! HDR luminance tone mapping for linear XYZ images.
//!
//! A tone map runs in four stages over a rectangular region:
//!
//! - [`stats`] - log-average, maximum and minimum luminance
//! - [`operator`] - the [`ToneMapOperator`] trait that compresses a
//!   luminance [`Plane`](tmo_core::Plane)
//! - [`reconstruct`] - writes compressed luminance back, rescaling X and Z
//! - [`tonemap`] - the [`ToneMapper`] entry point tying them together
//!
//! Operators are looked up by identifier in an [`OperatorRegistry`] and
//! configured through a string-keyed [`Configuration`].
//!
//! ## Operators
//!
//! | id            | label          | module              |
//! |---------------|----------------|---------------------|
//! | `ashikhminO2` | Ashikhmin 02   | [`ashikhmin02`]     |
//!
//! ## Example
//!
//! ```rust
//! use tmo_core::XyzImage;
//! use tmo_ops::prelude::*;
//!
//! let registry = OperatorRegistry::with_builtin();
//! let mapper = ToneMapper::new(&registry);
//!
//! let mut img = XyzImage::filled(8, 8, &[0.95, 1.0, 1.09]).unwrap();
//! img.set_xyz(3, 3, [95.0, 100.0, 109.0]);
//!
//! let config = Configuration::new().with("Equation", 4);
//! mapper.apply("ashikhminO2", &mut img, &config).unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default) - Row-parallel statistics and compression via rayon

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod ashikhmin02;
pub mod config;
pub mod error;
pub mod operator;
pub mod reconstruct;
pub mod registry;
pub mod stats;
pub mod tonemap;

pub use ashikhmin02::{Ashikhmin02, Ashikhmin02Params, Equation};
pub use config::{ConfigValue, Configuration};
pub use error::{OpsError, OpsResult};
pub use operator::{OperatorDescriptor, ToneMapOperator};
pub use reconstruct::{ZeroLuminancePolicy, reconstruct, reconstruct_region};
pub use registry::OperatorRegistry;
pub use stats::{LUMINANCE_EPSILON, MinLuminancePolicy, Statistics};
pub use tonemap::{ToneMapOptions, ToneMapper};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::Configuration;
    pub use crate::error::{OpsError, OpsResult};
    pub use crate::operator::ToneMapOperator;
    pub use crate::registry::OperatorRegistry;
    pub use crate::stats::{MinLuminancePolicy, Statistics};
    pub use crate::tonemap::{ToneMapOptions, ToneMapper};
}
