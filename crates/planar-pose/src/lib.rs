#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Planar pose recovery
//!
//! Turns matched 2d points between a known planar marker and a camera frame
//! into a metric camera pose and a pixel projection for overlaying 3d
//! content, by decomposing a RANSAC-estimated homography against the camera
//! intrinsics.
//!
//! ## Example
//!
//! ```rust
//! use planar_pose::{estimate_planar_pose, CameraIntrinsics, Correspondence, RansacParams};
//!
//! // four marker corners seen by a camera straight above the plane
//! let correspondences = vec![
//!     Correspondence::new([0.0, 0.0], [320.0, 240.0]),
//!     Correspondence::new([1.0, 0.0], [480.0, 240.0]),
//!     Correspondence::new([1.0, 1.0], [480.0, 400.0]),
//!     Correspondence::new([0.0, 1.0], [320.0, 400.0]),
//! ];
//! let intrinsics = CameraIntrinsics::new(800.0, 800.0, 320.0, 240.0);
//!
//! let estimate = estimate_planar_pose(&correspondences, &intrinsics, &RansacParams::default())?
//!     .expect("consensus on noiseless corners");
//! assert!((estimate.pose.translation.z - 5.0).abs() < 1e-6);
//! # Ok::<(), planar_pose::HomographyError>(())
//! ```

/// Pinhole camera intrinsics.
pub mod camera;

/// Homography-to-pose decomposition and projection.
pub mod decompose;

pub use camera::{CameraError, CameraIntrinsics};
pub use decompose::{pose_from_homography, Pose, PoseError, Projection};

pub use glam::{DMat3, DVec2, DVec3};
pub use planar_homography::{
    homography_dlt, ransac_homography, Correspondence, Homography, HomographyError, RansacParams,
    RansacResult, MIN_CORRESPONDENCES,
};

/// Everything the pipeline knows about one frame of a planar marker.
#[derive(Clone, Debug)]
pub struct PlanarPoseEstimate {
    /// Consensus homography from plane coordinates to pixels.
    pub homography: Homography,
    /// Per-correspondence inlier mask from RANSAC.
    pub inliers: Vec<bool>,
    /// Total inlier count.
    pub inlier_count: usize,
    /// Camera pose relative to the plane.
    pub pose: Pose,
    /// Projection mapping plane-frame 3d points into pixels.
    pub projection: Projection,
}

/// Runs the full marker-to-pose pipeline on one set of correspondences.
///
/// Estimates a robust homography with RANSAC, decomposes the consensus model
/// into a metric pose, and bundles the projection used to overlay 3d content.
/// Returns `Ok(None)` when RANSAC finds no consensus or when the consensus
/// homography is too ill-conditioned to decompose; both mean "nothing
/// reliable in this frame" and callers are expected to skip it.
pub fn estimate_planar_pose(
    correspondences: &[Correspondence],
    intrinsics: &CameraIntrinsics,
    params: &RansacParams,
) -> Result<Option<PlanarPoseEstimate>, HomographyError> {
    let result = match ransac_homography(correspondences, params)? {
        Some(result) => result,
        None => return Ok(None),
    };

    let pose = match pose_from_homography(&result.model, intrinsics) {
        Ok(pose) => pose,
        Err(PoseError::IllConditioned { scale }) => {
            log::warn!(
                "planar pose: dropping consensus homography with vanishing scale {:.3e}",
                scale
            );
            return Ok(None);
        }
    };
    let projection = pose.projection(intrinsics);

    Ok(Some(PlanarPoseEstimate {
        homography: result.model,
        inliers: result.inliers,
        inlier_count: result.inlier_count,
        pose,
        projection,
    }))
}
