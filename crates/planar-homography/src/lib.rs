#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Planar homography estimation
//!
//! Estimates the 3x3 projective transform relating a reference plane image to
//! a camera frame from a noisy set of matched point pairs, using a direct
//! linear transform (DLT) solver wrapped in a RANSAC consensus search.
//!
//! ## Example
//!
//! ```rust
//! use planar_homography::{ransac_homography, Correspondence, RansacParams};
//!
//! // a pure scale-by-two mapping
//! let correspondences = vec![
//!     Correspondence::new([0.0, 0.0], [0.0, 0.0]),
//!     Correspondence::new([1.0, 0.0], [2.0, 0.0]),
//!     Correspondence::new([0.0, 1.0], [0.0, 2.0]),
//!     Correspondence::new([1.0, 1.0], [2.0, 2.0]),
//! ];
//!
//! let result = ransac_homography(&correspondences, &RansacParams::default())?
//!     .expect("consensus on noiseless input");
//! assert_eq!(result.inlier_count, 4);
//! # Ok::<(), planar_homography::HomographyError>(())
//! ```

/// Direct linear transform homography solver.
pub mod dlt;

/// RANSAC robust estimation around the DLT solver.
pub mod ransac;

/// Core value types and errors.
pub mod types;

pub use dlt::homography_dlt;
pub use ransac::{ransac_homography, RansacParams, RansacResult};
pub use types::{Correspondence, Homography, HomographyError, MIN_CORRESPONDENCES};

pub use glam::{DMat3, DVec2};
