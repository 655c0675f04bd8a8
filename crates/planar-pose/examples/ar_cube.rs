use glam::{DMat3, DVec2, DVec3};
use planar_pose as pp;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn rows(m: &DMat3) -> [[f64; 3]; 3] {
    m.transpose().to_cols_array_2d()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Webcam-style intrinsics (pinhole, fx=fy=800, cx=320, cy=240)
    let intrinsics = pp::CameraIntrinsics::from_matrix(&[
        [800.0, 0.0, 320.0],
        [0.0, 800.0, 240.0],
        [0.0, 0.0, 1.0],
    ])?;

    // Ground-truth pose: small rotation + translation along +Z
    let gt_rotation = DMat3::from_rotation_z(30.0_f64.to_radians())
        * DMat3::from_rotation_y(-15.0_f64.to_radians())
        * DMat3::from_rotation_x(10.0_f64.to_radians());
    let gt_translation = DVec3::new(1.0, -0.5, 6.0);

    // Homography induced by the marker plane z = 0 under that pose
    let k = intrinsics.matrix();
    let gt_homography = pp::Homography::new(DMat3::from_cols(
        k * gt_rotation.x_axis,
        k * gt_rotation.y_axis,
        k * gt_translation,
    ));

    // Observe a 7x7 grid of marker points with pixel noise
    let mut rng = StdRng::seed_from_u64(42);
    let sigma_px = 0.3;
    let mut correspondences = Vec::new();
    for i in 0..7 {
        for j in 0..7 {
            let source = DVec2::new(i as f64 * 0.5, j as f64 * 0.5);
            let mut target = gt_homography
                .project(source)
                .expect("marker is in front of the camera");
            target.x += rng.random_range(-sigma_px..sigma_px);
            target.y += rng.random_range(-sigma_px..sigma_px);
            correspondences.push(pp::Correspondence { source, target });
        }
    }

    // Corrupt a few matches the way bad descriptor matches would
    for i in (0..correspondences.len()).step_by(8) {
        let angle = rng.random_range(0.0..(2.0 * std::f64::consts::PI));
        let radius = rng.random_range(40.0..120.0);
        correspondences[i].target += DVec2::new(radius * angle.cos(), radius * angle.sin());
    }

    let params = pp::RansacParams::default();
    let estimate = match pp::estimate_planar_pose(&correspondences, &intrinsics, &params)? {
        Some(estimate) => estimate,
        None => {
            println!("no consensus, nothing to overlay in this frame");
            return Ok(());
        }
    };

    println!(
        "consensus inliers       : {}/{}",
        estimate.inlier_count,
        correspondences.len()
    );
    println!("homography (rows)       : {:?}", estimate.homography.to_rows());
    println!("ground truth rotation   : {:?}", rows(&gt_rotation));
    println!("estimated rotation      : {:?}", rows(&estimate.pose.rotation));
    println!("ground truth translation: {:?}", gt_translation);
    println!("estimated translation   : {:?}", estimate.pose.translation);
    println!("projection (3x4 rows)   : {:?}", estimate.projection.matrix3x4());

    // Overlay a cube standing on the marker, rising toward the camera
    let cube = [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(0.0, 3.0, 0.0),
        DVec3::new(3.0, 3.0, 0.0),
        DVec3::new(3.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, -3.0),
        DVec3::new(0.0, 3.0, -3.0),
        DVec3::new(3.0, 3.0, -3.0),
        DVec3::new(3.0, 0.0, -3.0),
    ];
    println!("cube corners in pixels:");
    for (corner, pixel) in cube.iter().zip(estimate.projection.project_points(&cube)) {
        match pixel {
            Some(p) => println!("  {:?} -> ({:.1}, {:.1})", corner, p.x, p.y),
            None => println!("  {:?} -> on the camera plane", corner),
        }
    }

    Ok(())
}
