//! # tmo-core
//!
//! Core buffer types for HDR tone mapping.
//!
//! This crate provides the foundational types used by `tmo-ops`:
//!
//! - [`Rect`] - The region a tone map operates on
//! - [`Plane`] - Dense single-channel luminance buffer
//! - [`XyzImage`] - Interleaved linear XYZ(A) image rewritten by tone mapping
//! - [`LumaAccess`] - 2D read accessor over a luminance channel
//!
//! ## Crate Structure
//!
//! ```text
//! tmo-core (this crate)
//!    ^
//!    |
//!    +-- tmo-ops (statistics, operators, registry, reconstruction)
//!           ^
//!           |
//!           +-- tmo-cli (host application)
//! ```
//!
//! The core never converts color spaces; callers hand it buffers that are
//! already linear XYZ.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod plane;
pub mod rect;
pub mod xyz;

pub use error::{Error, Result};
pub use plane::{LumaAccess, Plane};
pub use rect::Rect;
pub use xyz::{LumaView, XyzImage, X_CHANNEL, Y_CHANNEL, Z_CHANNEL};

/// Prelude module for convenient imports.
///
/// ```
/// use tmo_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::plane::{LumaAccess, Plane};
    pub use crate::rect::Rect;
    pub use crate::xyz::{LumaView, XyzImage};
}
