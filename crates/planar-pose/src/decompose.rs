//! Homography decomposition into a metric camera pose.
use std::f64::consts::FRAC_1_SQRT_2;

use glam::{DMat3, DVec2, DVec3};
use planar_homography::Homography;
use thiserror::Error;

use crate::camera::CameraIntrinsics;

/// Smallest column scale or basis length accepted by the decomposition, and
/// the depth below which a projected point counts as on the camera plane.
const MIN_SCALE: f64 = 1e-12;

/// Error types for pose recovery.
#[derive(Debug, Error)]
pub enum PoseError {
    /// Homography columns carry no usable scale
    #[error("ill-conditioned homography: scale factor {scale:.3e} below minimum")]
    IllConditioned {
        /// The vanishing scale that was rejected.
        scale: f64,
    },
}

/// A rigid camera pose relative to the reference plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Orthonormal rotation with determinant +1.
    pub rotation: DMat3,
    /// Translation from plane origin to camera, in plane units.
    pub translation: DVec3,
}

impl Pose {
    /// The full projection mapping 3d plane-frame points into pixels.
    pub fn projection(&self, intrinsics: &CameraIntrinsics) -> Projection {
        let k = intrinsics.matrix();
        Projection {
            linear: k * self.rotation,
            translation: k * self.translation,
        }
    }
}

/// A pinhole projection of 3d points in the plane frame onto the image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Rotational part premultiplied by the intrinsics.
    pub linear: DMat3,
    /// Translational part premultiplied by the intrinsics.
    pub translation: DVec3,
}

impl Projection {
    /// Projects one 3d point, or `None` when it lies on the camera plane.
    pub fn project_point(&self, point: DVec3) -> Option<DVec2> {
        let q = self.linear * point + self.translation;
        if q.z.abs() < MIN_SCALE {
            return None;
        }
        Some(DVec2::new(q.x / q.z, q.y / q.z))
    }

    /// Projects a batch of 3d points.
    pub fn project_points(&self, points: &[DVec3]) -> Vec<Option<DVec2>> {
        points.iter().map(|&p| self.project_point(p)).collect()
    }

    /// The projection as a row-major 3x4 matrix.
    pub fn matrix3x4(&self) -> [[f64; 4]; 3] {
        let m = &self.linear;
        let t = &self.translation;
        [
            [m.x_axis.x, m.y_axis.x, m.z_axis.x, t.x],
            [m.x_axis.y, m.y_axis.y, m.z_axis.y, t.y],
            [m.x_axis.z, m.y_axis.z, m.z_axis.z, t.z],
        ]
    }
}

/// Recovers the camera pose from a homography that maps plane coordinates to
/// pixels.
///
/// The homography is premultiplied by the inverse intrinsics, the geometric
/// mean of its first two column norms fixes the metric scale, and the scaled
/// columns give the in-plane rotation basis plus the translation. The basis
/// is then symmetrized into an exactly orthonormal frame so downstream
/// projection uses a proper rotation. A homography whose columns carry no
/// usable scale is rejected as ill-conditioned.
///
/// The returned pose always places the plane in front of the camera; the two
/// sign choices of the input map to the same pose.
pub fn pose_from_homography(
    homography: &Homography,
    intrinsics: &CameraIntrinsics,
) -> Result<Pose, PoseError> {
    let m = intrinsics.inverse_matrix() * homography.mat;

    let scale = (m.x_axis.length() * m.y_axis.length()).sqrt();
    if !scale.is_finite() || scale <= MIN_SCALE {
        return Err(PoseError::IllConditioned { scale });
    }

    let mut r1 = m.x_axis / scale;
    let mut r2 = m.y_axis / scale;
    let mut translation = m.z_axis / scale;

    // cheirality: keep the plane in front of the camera
    if translation.z < 0.0 {
        r1 = -r1;
        r2 = -r2;
        translation = -translation;
    }

    let c = r1 + r2;
    let p = r1.cross(r2);
    let d = c.cross(p);
    let (c_len, d_len) = (c.length(), d.length());
    if c_len <= MIN_SCALE || d_len <= MIN_SCALE {
        return Err(PoseError::IllConditioned {
            scale: c_len.min(d_len),
        });
    }

    let c_hat = c / c_len;
    let d_hat = d / d_len;
    let r1 = (c_hat + d_hat) * FRAC_1_SQRT_2;
    let r2 = (c_hat - d_hat) * FRAC_1_SQRT_2;
    let r3 = r1.cross(r2);

    Ok(Pose {
        rotation: DMat3::from_cols(r1, r2, r3),
        translation,
    })
}
