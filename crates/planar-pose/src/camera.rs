//! Pinhole camera intrinsics for the planar pose pipeline.
use glam::{DMat3, DVec3};
use thiserror::Error;

/// Error types for camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    /// Invalid camera intrinsics matrix
    #[error("Invalid camera intrinsics matrix: {0}")]
    InvalidIntrinsics(String),
}

/// Represents the intrinsic parameters of a pinhole camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length in x direction
    pub fx: f64,
    /// Focal length in y direction
    pub fy: f64,
    /// Principal point x coordinate
    pub cx: f64,
    /// Principal point y coordinate
    pub cy: f64,
}

impl CameraIntrinsics {
    /// Create camera intrinsics from focal lengths and principal point.
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Create camera intrinsics from a 3x3 intrinsics matrix.
    pub fn from_matrix(k: &[[f64; 3]; 3]) -> Result<Self, CameraError> {
        // Check that the matrix has the expected form
        if k[0][1] != 0.0 || k[1][0] != 0.0 || k[2][0] != 0.0 || k[2][1] != 0.0 || k[2][2] != 1.0 {
            return Err(CameraError::InvalidIntrinsics(
                "Intrinsics matrix must have form [[fx, 0, cx], [0, fy, cy], [0, 0, 1]]"
                    .to_string(),
            ));
        }
        if k[0][0] == 0.0 || k[1][1] == 0.0 {
            return Err(CameraError::InvalidIntrinsics(
                "Focal lengths must be non-zero".to_string(),
            ));
        }

        Ok(Self {
            fx: k[0][0],
            fy: k[1][1],
            cx: k[0][2],
            cy: k[1][2],
        })
    }

    /// The intrinsics as a column-major 3x3 matrix.
    pub fn matrix(&self) -> DMat3 {
        DMat3::from_cols(
            DVec3::new(self.fx, 0.0, 0.0),
            DVec3::new(0.0, self.fy, 0.0),
            DVec3::new(self.cx, self.cy, 1.0),
        )
    }

    /// The inverse intrinsics matrix, in closed form.
    pub fn inverse_matrix(&self) -> DMat3 {
        DMat3::from_cols(
            DVec3::new(1.0 / self.fx, 0.0, 0.0),
            DVec3::new(0.0, 1.0 / self.fy, 0.0),
            DVec3::new(-self.cx / self.fx, -self.cy / self.fy, 1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_intrinsics_from_matrix() {
        let k = [[800.0, 0.0, 320.0], [0.0, 800.0, 240.0], [0.0, 0.0, 1.0]];
        let intrinsics = CameraIntrinsics::from_matrix(&k).unwrap();
        assert_eq!(intrinsics.fx, 800.0);
        assert_eq!(intrinsics.fy, 800.0);
        assert_eq!(intrinsics.cx, 320.0);
        assert_eq!(intrinsics.cy, 240.0);
    }

    #[test]
    fn test_camera_intrinsics_rejects_skew() {
        let k = [[800.0, 0.5, 320.0], [0.0, 800.0, 240.0], [0.0, 0.0, 1.0]];
        assert!(CameraIntrinsics::from_matrix(&k).is_err());
    }

    #[test]
    fn test_camera_intrinsics_rejects_zero_focal() {
        let k = [[0.0, 0.0, 320.0], [0.0, 800.0, 240.0], [0.0, 0.0, 1.0]];
        assert!(CameraIntrinsics::from_matrix(&k).is_err());
    }

    #[test]
    fn test_inverse_matrix_roundtrip() {
        let intrinsics = CameraIntrinsics::new(800.0, 640.0, 320.0, 240.0);
        let product = intrinsics.matrix() * intrinsics.inverse_matrix();
        let identity = DMat3::IDENTITY;
        for (p, e) in product
            .to_cols_array()
            .iter()
            .zip(identity.to_cols_array().iter())
        {
            assert_relative_eq!(*p, *e, epsilon = 1e-12);
        }
    }
}
