use rand::prelude::*;
use rand::SeedableRng;

use crate::dlt::homography_dlt;
use crate::types::{Correspondence, Homography, HomographyError, MIN_CORRESPONDENCES};

/// Parameters for the RANSAC homography search.
#[derive(Clone, Copy, Debug)]
pub struct RansacParams {
    /// Maximum number of RANSAC iterations.
    pub max_iterations: usize,
    /// Inlier reprojection threshold in pixels.
    pub threshold: f64,
    /// Minimum number of inliers required for acceptance.
    pub min_inliers: usize,
    /// Optional RNG seed for deterministic runs.
    pub random_seed: Option<u64>,
}

impl Default for RansacParams {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            threshold: 5.0,
            min_inliers: MIN_CORRESPONDENCES,
            random_seed: Some(0),
        }
    }
}

/// Result of a RANSAC homography fit.
#[derive(Clone, Debug)]
pub struct RansacResult {
    /// Estimated model.
    pub model: Homography,
    /// Per-correspondence inlier mask.
    pub inliers: Vec<bool>,
    /// Total inlier count.
    pub inlier_count: usize,
    /// Sum of squared inlier errors (lower is better).
    pub score: f64,
}

/// Estimates a homography with RANSAC over minimal 4-point samples.
///
/// Each iteration draws 4 distinct correspondences without replacement, fits
/// a candidate with the DLT solver, and scores it by inlier support under the
/// reprojection threshold; ties are broken by the lower error sum. Degenerate
/// samples are skipped and never surface as errors. The winning model is
/// refit over its full consensus set before being returned.
///
/// Returns `Ok(None)` when no candidate reaches `min_inliers` support within
/// the iteration budget, which callers should treat as "no reliable planar
/// mapping" rather than a failure.
pub fn ransac_homography(
    correspondences: &[Correspondence],
    params: &RansacParams,
) -> Result<Option<RansacResult>, HomographyError> {
    let n = correspondences.len();
    if n < MIN_CORRESPONDENCES {
        return Err(HomographyError::InsufficientCorrespondences {
            required: MIN_CORRESPONDENCES,
            actual: n,
        });
    }

    let mut rng = match params.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => {
            let mut tr = rand::rng();
            StdRng::from_rng(&mut tr)
        }
    };

    let mut best_model = None;
    let mut best_inliers = Vec::new();
    let mut best_count = 0usize;
    let mut best_score = f64::INFINITY;

    for _ in 0..params.max_iterations {
        let sample_idx = rand::seq::index::sample(&mut rng, n, MIN_CORRESPONDENCES);
        let mut sample = [Correspondence::new([0.0; 2], [0.0; 2]); MIN_CORRESPONDENCES];
        for (i, idx) in sample_idx.iter().enumerate() {
            sample[i] = correspondences[idx];
        }
        let h = match homography_dlt(&sample) {
            Ok(h) => h,
            Err(_) => continue,
        };

        let (inliers, count, score) = classify_inliers(correspondences, &h, params.threshold);
        if count > best_count || (count == best_count && score < best_score) {
            best_model = Some(h);
            best_inliers = inliers;
            best_count = count;
            best_score = score;
        }
    }

    let model = match best_model {
        Some(m) if best_count >= params.min_inliers => m,
        _ => {
            log::debug!(
                "ransac: no consensus after {} iterations (best support {}/{})",
                params.max_iterations,
                best_count,
                n
            );
            return Ok(None);
        }
    };

    // refit over the full consensus set to reduce minimal-sample noise
    let mut consensus = Vec::with_capacity(best_count);
    for (c, keep) in correspondences.iter().zip(best_inliers.iter()) {
        if *keep {
            consensus.push(*c);
        }
    }
    let (model, inliers, inlier_count, score) = match homography_dlt(&consensus) {
        Ok(refit) => {
            let (inliers, count, score) =
                classify_inliers(correspondences, &refit, params.threshold);
            (refit, inliers, count, score)
        }
        Err(_) => (model, best_inliers, best_count, best_score),
    };

    log::debug!("ransac: accepted model with {}/{} inliers", inlier_count, n);

    Ok(Some(RansacResult {
        model,
        inliers,
        inlier_count,
        score,
    }))
}

fn classify_inliers(
    correspondences: &[Correspondence],
    h: &Homography,
    threshold: f64,
) -> (Vec<bool>, usize, f64) {
    let mut inliers = vec![false; correspondences.len()];
    let mut count = 0usize;
    let mut score = 0.0f64;
    for (i, c) in correspondences.iter().enumerate() {
        let d = reproj_error_sq(h, c);
        if d <= threshold * threshold {
            inliers[i] = true;
            count += 1;
            score += d;
        }
    }
    (inliers, count, score)
}

/// Squared forward-transfer error of one correspondence under a candidate.
fn reproj_error_sq(h: &Homography, c: &Correspondence) -> f64 {
    match h.project(c.source) {
        Some(p) => (p - c.target).length_squared(),
        None => f64::INFINITY,
    }
}
