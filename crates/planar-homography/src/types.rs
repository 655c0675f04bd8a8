use glam::{DMat3, DVec2, DVec3};

/// Minimal number of correspondences required to solve for a homography.
pub const MIN_CORRESPONDENCES: usize = 4;

/// Errors produced by homography estimation.
#[derive(thiserror::Error, Debug)]
pub enum HomographyError {
    /// Fewer input correspondences than the minimal sample size.
    #[error("need at least {required} correspondences, got {actual}")]
    InsufficientCorrespondences {
        /// Minimum required correspondences.
        required: usize,
        /// Number of correspondences supplied.
        actual: usize,
    },
    /// The correspondences produce a rank-deficient linear system.
    #[error("degenerate correspondence configuration: {0}")]
    DegenerateInput(String),
}

/// A matched point pair between the reference plane and the camera frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Correspondence {
    /// Location in the reference (model) image.
    pub source: DVec2,
    /// Location in the camera frame.
    pub target: DVec2,
}

impl Correspondence {
    /// Creates a correspondence from raw pixel coordinates.
    pub fn new(source: [f64; 2], target: [f64; 2]) -> Self {
        Self {
            source: DVec2::from_array(source),
            target: DVec2::from_array(target),
        }
    }
}

/// A 3x3 planar projective transform, defined up to scale.
///
/// Maps homogeneous points of the reference plane onto the camera frame. A
/// valid planar mapping has rank 3; the solvers in this crate reject
/// rank-deficient estimates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    /// The matrix entries.
    pub mat: DMat3,
}

impl Homography {
    /// Wraps an existing matrix.
    pub fn new(mat: DMat3) -> Self {
        Self { mat }
    }

    /// Builds a homography from row-major entries.
    pub fn from_rows(rows: &[[f64; 3]; 3]) -> Self {
        Self {
            mat: DMat3::from_cols(
                DVec3::new(rows[0][0], rows[1][0], rows[2][0]),
                DVec3::new(rows[0][1], rows[1][1], rows[2][1]),
                DVec3::new(rows[0][2], rows[1][2], rows[2][2]),
            ),
        }
    }

    /// The matrix entries as row-major arrays.
    pub fn to_rows(&self) -> [[f64; 3]; 3] {
        let m = self.mat;
        [
            [m.x_axis.x, m.y_axis.x, m.z_axis.x],
            [m.x_axis.y, m.y_axis.y, m.z_axis.y],
            [m.x_axis.z, m.y_axis.z, m.z_axis.z],
        ]
    }

    /// Maps a point through the transform.
    ///
    /// Returns `None` when the homogeneous scale collapses, i.e. the point
    /// maps to the line at infinity.
    pub fn project(&self, p: DVec2) -> Option<DVec2> {
        let q = self.mat * DVec3::new(p.x, p.y, 1.0);
        if q.z.abs() < 1e-12 {
            return None;
        }
        Some(DVec2::new(q.x / q.z, q.y / q.z))
    }
}
