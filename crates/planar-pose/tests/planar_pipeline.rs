use approx::assert_relative_eq;
use glam::{DMat3, DVec2, DVec3};

use planar_pose::{
    estimate_planar_pose, CameraIntrinsics, Correspondence, Homography, HomographyError,
    RansacParams,
};

fn intrinsics() -> CameraIntrinsics {
    CameraIntrinsics::new(800.0, 800.0, 320.0, 240.0)
}

fn rotation_gt() -> DMat3 {
    DMat3::from_rotation_z(0.3) * DMat3::from_rotation_y(-0.2) * DMat3::from_rotation_x(0.1)
}

fn homography_from_pose(
    intrinsics: &CameraIntrinsics,
    rotation: &DMat3,
    translation: DVec3,
) -> Homography {
    let k = intrinsics.matrix();
    Homography::new(DMat3::from_cols(
        k * rotation.x_axis,
        k * rotation.y_axis,
        k * translation,
    ))
}

fn marker_grid(homography: &Homography, side: usize, spacing: f64) -> Vec<Correspondence> {
    let mut correspondences = Vec::with_capacity(side * side);
    for i in 0..side {
        for j in 0..side {
            let source = DVec2::new(i as f64 * spacing, j as f64 * spacing);
            let target = homography.project(source).unwrap();
            correspondences.push(Correspondence { source, target });
        }
    }
    correspondences
}

fn assert_mat3_relative_eq(actual: &DMat3, expected: &DMat3, epsilon: f64) {
    for (a, e) in actual
        .to_cols_array()
        .iter()
        .zip(expected.to_cols_array().iter())
    {
        assert_relative_eq!(*a, *e, epsilon = epsilon);
    }
}

#[test]
fn recovers_known_pose_from_noiseless_grid() {
    let intrinsics = intrinsics();
    let rotation = rotation_gt();
    let translation = DVec3::new(0.5, -0.3, 4.0);
    let homography = homography_from_pose(&intrinsics, &rotation, translation);
    let correspondences = marker_grid(&homography, 6, 0.5);

    let estimate = estimate_planar_pose(&correspondences, &intrinsics, &RansacParams::default())
        .unwrap()
        .expect("noiseless grid must reach consensus");

    assert_eq!(estimate.inlier_count, correspondences.len());
    assert_mat3_relative_eq(&estimate.pose.rotation, &rotation, 1e-6);
    assert_relative_eq!(estimate.pose.translation.x, translation.x, epsilon = 1e-6);
    assert_relative_eq!(estimate.pose.translation.y, translation.y, epsilon = 1e-6);
    assert_relative_eq!(estimate.pose.translation.z, translation.z, epsilon = 1e-6);
}

#[test]
fn projection_agrees_with_homography_on_the_plane() {
    let intrinsics = intrinsics();
    let homography =
        homography_from_pose(&intrinsics, &rotation_gt(), DVec3::new(0.5, -0.3, 4.0));
    let correspondences = marker_grid(&homography, 6, 0.5);

    let estimate = estimate_planar_pose(&correspondences, &intrinsics, &RansacParams::default())
        .unwrap()
        .expect("noiseless grid must reach consensus");

    for probe in [
        DVec2::new(0.2, 1.3),
        DVec2::new(2.0, 0.7),
        DVec2::new(1.1, 2.2),
    ] {
        let via_homography = estimate.homography.project(probe).unwrap();
        let via_projection = estimate
            .projection
            .project_point(DVec3::new(probe.x, probe.y, 0.0))
            .unwrap();
        assert_relative_eq!(via_projection.x, via_homography.x, epsilon = 1e-6);
        assert_relative_eq!(via_projection.y, via_homography.y, epsilon = 1e-6);
    }
}

#[test]
fn flags_outliers_and_still_recovers_pose() {
    let intrinsics = intrinsics();
    let rotation = rotation_gt();
    let translation = DVec3::new(0.5, -0.3, 4.0);
    let homography = homography_from_pose(&intrinsics, &rotation, translation);
    let mut correspondences = marker_grid(&homography, 6, 0.5);

    let corrupted = [3usize, 17, 29];
    for &i in &corrupted {
        correspondences[i].target += DVec2::new(60.0, -45.0);
    }

    let estimate = estimate_planar_pose(&correspondences, &intrinsics, &RansacParams::default())
        .unwrap()
        .expect("consensus expected");

    assert_eq!(
        estimate.inlier_count,
        correspondences.len() - corrupted.len()
    );
    for (i, inlier) in estimate.inliers.iter().enumerate() {
        assert_eq!(*inlier, !corrupted.contains(&i), "index {}", i);
    }
    assert_mat3_relative_eq(&estimate.pose.rotation, &rotation, 1e-6);
    assert_relative_eq!(estimate.pose.translation.z, translation.z, epsilon = 1e-6);
}

#[test]
fn no_consensus_returns_none() {
    // coincident sources make every minimal sample degenerate
    let correspondences = vec![
        Correspondence::new([1.0, 1.0], [100.0, 100.0]),
        Correspondence::new([1.0, 1.0], [200.0, 150.0]),
        Correspondence::new([1.0, 1.0], [300.0, 200.0]),
        Correspondence::new([1.0, 1.0], [400.0, 250.0]),
        Correspondence::new([1.0, 1.0], [500.0, 300.0]),
    ];
    let params = RansacParams {
        max_iterations: 50,
        ..Default::default()
    };
    let estimate = estimate_planar_pose(&correspondences, &intrinsics(), &params).unwrap();
    assert!(estimate.is_none());
}

#[test]
fn too_few_correspondences_is_an_error() {
    let correspondences = vec![
        Correspondence::new([0.0, 0.0], [320.0, 240.0]),
        Correspondence::new([1.0, 0.0], [480.0, 240.0]),
        Correspondence::new([1.0, 1.0], [480.0, 400.0]),
    ];
    let err = estimate_planar_pose(&correspondences, &intrinsics(), &RansacParams::default())
        .unwrap_err();
    assert!(matches!(
        err,
        HomographyError::InsufficientCorrespondences {
            required: 4,
            actual: 3
        }
    ));
}
