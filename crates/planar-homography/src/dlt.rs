use glam::{DMat3, DVec2, DVec3};

use crate::types::{Correspondence, Homography, HomographyError, MIN_CORRESPONDENCES};

/// Bound on the (3,3) entry below which the scale is fixed by the Frobenius
/// norm instead.
const SCALE_EPS: f64 = 1e-8;

/// Bound on the determinant of the unit-norm solution below which the input
/// is rejected as rank deficient.
const DET_EPS: f64 = 1e-8;

/// Twice the triangle area below which three points count as collinear.
const COLLINEAR_EPS: f64 = 1e-9;

/// Estimates a homography from point correspondences with the direct linear
/// transform.
///
/// Builds the standard 2n x 9 system over all correspondences and takes the
/// right singular vector of the smallest singular value. The free scale is
/// fixed by the (3,3) entry when it is safely nonzero, otherwise by the
/// Frobenius norm. Input coordinates are consumed as-is; callers that need
/// tighter conditioning should pre-normalize them.
pub fn homography_dlt(correspondences: &[Correspondence]) -> Result<Homography, HomographyError> {
    let n = correspondences.len();
    if n < MIN_CORRESPONDENCES {
        return Err(HomographyError::InsufficientCorrespondences {
            required: MIN_CORRESPONDENCES,
            actual: n,
        });
    }
    if degenerate_sources(correspondences) {
        return Err(HomographyError::DegenerateInput(
            "source points are collinear or coincident".to_string(),
        ));
    }

    // construct matrix A
    let mut mat_a = faer::Mat::<f64>::zeros(2 * n, 9);
    for (i, c) in correspondences.iter().enumerate() {
        let (x, y) = (c.source.x, c.source.y);
        let (u, v) = (c.target.x, c.target.y);
        mat_a.write(2 * i, 0, x);
        mat_a.write(2 * i, 1, y);
        mat_a.write(2 * i, 2, 1.0);
        mat_a.write(2 * i, 6, -u * x);
        mat_a.write(2 * i, 7, -u * y);
        mat_a.write(2 * i, 8, -u);

        mat_a.write(2 * i + 1, 3, x);
        mat_a.write(2 * i + 1, 4, y);
        mat_a.write(2 * i + 1, 5, 1.0);
        mat_a.write(2 * i + 1, 6, -v * x);
        mat_a.write(2 * i + 1, 7, -v * y);
        mat_a.write(2 * i + 1, 8, -v);
    }

    // solve A h = 0 and take the smallest singular value direction
    let svd = mat_a.svd();
    let h = svd.v().col(8);

    let mat = DMat3::from_cols(
        DVec3::new(h[0], h[3], h[6]),
        DVec3::new(h[1], h[4], h[7]),
        DVec3::new(h[2], h[5], h[8]),
    );

    // h is unit-norm here, so the determinant bound is scale-free
    if mat.determinant().abs() < DET_EPS {
        return Err(HomographyError::DegenerateInput(
            "solution matrix is singular".to_string(),
        ));
    }

    Ok(Homography::new(normalize_scale(mat)))
}

fn normalize_scale(mat: DMat3) -> DMat3 {
    let h33 = mat.z_axis.z;
    if h33.abs() > SCALE_EPS {
        return mat * (1.0 / h33);
    }
    let frob = (mat.x_axis.length_squared()
        + mat.y_axis.length_squared()
        + mat.z_axis.length_squared())
    .sqrt();
    mat * (1.0 / frob)
}

/// Degeneracy test on the source points.
///
/// A minimal 4-point sample must not contain any collinear triple; a larger
/// set only fails when every point lies on one line (overdetermined sets
/// tolerate collinear triples).
fn degenerate_sources(correspondences: &[Correspondence]) -> bool {
    if correspondences.len() == MIN_CORRESPONDENCES {
        let s = [
            correspondences[0].source,
            correspondences[1].source,
            correspondences[2].source,
            correspondences[3].source,
        ];
        return collinear3(s[0], s[1], s[2])
            || collinear3(s[0], s[1], s[3])
            || collinear3(s[0], s[2], s[3])
            || collinear3(s[1], s[2], s[3]);
    }
    all_sources_collinear(correspondences)
}

fn collinear3(a: DVec2, b: DVec2, c: DVec2) -> bool {
    (b - a).perp_dot(c - a).abs() < COLLINEAR_EPS
}

fn all_sources_collinear(correspondences: &[Correspondence]) -> bool {
    let origin = correspondences[0].source;
    let mut direction = None;
    for c in correspondences.iter().skip(1) {
        let d = c.source - origin;
        if d.length_squared() > COLLINEAR_EPS {
            direction = Some(d);
            break;
        }
    }
    // all points coincident
    let Some(direction) = direction else {
        return true;
    };
    correspondences
        .iter()
        .all(|c| direction.perp_dot(c.source - origin).abs() < COLLINEAR_EPS)
}
