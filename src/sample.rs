//! Randomization policy for candidate frames.
//!
//! Each frame gets its own seed drawn from a splitmix stream over the run
//! seed, and all of the frame's draws come from one `SmallRng` in a fixed
//! order, so a run is fully reproducible and any single frame can be
//! re-derived from the run seed and its index.

use std::f32::consts::TAU;

use glam::{Mat3, Quat, Vec3};
use rand::{Rng, RngCore, SeedableRng, rngs::SmallRng};
use rand_xoshiro::SplitMix64;

use crate::config::GenConfig;
use crate::host::{PointLight, SunLight};

// Fill-light placement cube, independent of object and camera sampling.
const FILL_XY_MIN: f32 = -4.0;
const FILL_XY_MAX: f32 = 4.0;
const FILL_Z_MIN: f32 = 1.0;
const FILL_Z_MAX: f32 = 4.0;

// Persistent directional light rig.
const SUN_LOCATION: Vec3 = Vec3::new(5.0, -5.0, 5.0);
const SUN_ROTATION: Vec3 = Vec3::new(0.7, 0.2, -0.7);
const SUN_ENERGY_MIN: f32 = 2.0;
const SUN_ENERGY_MAX: f32 = 5.0;

/// Uniform scale factor plus a single rotation angle reused on all three
/// Euler axes. The shared angle and shared scale are intentional; sampling
/// the axes independently would silently change the pose distribution of
/// the generated dataset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectPose {
    pub scale: f32,
    pub rotation: f32,
    /// Ground-plane position, z fixed at 0.
    pub location: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPlan {
    pub focal_mm: f32,
    pub location: Vec3,
    /// Jittered near-origin point the camera aims at.
    pub target: Vec3,
}

/// Everything random about one attempted frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePlan {
    pub frame: u64,
    pub seed: u64,
    pub model_idx: usize,
    pub object: ObjectPose,
    pub camera: CameraPlan,
    pub fill: PointLight,
    pub background_idx: usize,
}

/// Seed for frame `frame` of a run.
pub fn frame_seed(run_seed: u64, frame: u64) -> u64 {
    let mut sm = SplitMix64::seed_from_u64(run_seed ^ frame);
    sm.next_u64()
}

impl FramePlan {
    /// Draw one candidate frame. The draw order is fixed: model, object
    /// pose, camera, fill light, background.
    pub fn sample(cfg: &GenConfig, n_models: usize, n_backgrounds: usize, frame: u64) -> Self {
        let seed = frame_seed(cfg.seed, frame);
        let mut rng = SmallRng::seed_from_u64(seed);

        let model_idx = rng.random_range(0..n_models);

        let object = ObjectPose {
            scale: rng.random_range(cfg.scale_min..=cfg.scale_max),
            rotation: rng.random_range(0.0..TAU),
            location: Vec3::new(
                rng.random_range(cfg.pos_x_min..=cfg.pos_x_max),
                rng.random_range(cfg.pos_y_min..=cfg.pos_y_max),
                0.0,
            ),
        };

        let focal_mm = rng.random_range(cfg.focal_min..=cfg.focal_max);
        let r = rng.random_range(cfg.cam_rad_min..=cfg.cam_rad_max);
        let elev = rng
            .random_range(cfg.cam_elev_min..=cfg.cam_elev_max)
            .to_radians();
        let azim = rng.random_range(0.0..TAU);
        let location = Vec3::new(
            r * azim.cos() * elev.cos(),
            r * azim.sin() * elev.cos(),
            r * elev.sin(),
        );
        // Aim at a jittered point within half the object placement range.
        let target = Vec3::new(
            rng.random_range(cfg.pos_x_min..=cfg.pos_x_max) / 2.0,
            rng.random_range(cfg.pos_y_min..=cfg.pos_y_max) / 2.0,
            0.0,
        );
        let camera = CameraPlan {
            focal_mm,
            location,
            target,
        };

        let fill = PointLight {
            energy: rng.random_range(cfg.light_pwr_min..=cfg.light_pwr_max),
            location: Vec3::new(
                rng.random_range(FILL_XY_MIN..=FILL_XY_MAX),
                rng.random_range(FILL_XY_MIN..=FILL_XY_MAX),
                rng.random_range(FILL_Z_MIN..=FILL_Z_MAX),
            ),
        };

        let background_idx = rng.random_range(0..n_backgrounds);

        FramePlan {
            frame,
            seed,
            model_idx,
            object,
            camera,
            fill,
            background_idx,
        }
    }
}

/// The sun is created once per run; its energy is drawn here and never
/// refreshed on later frames, unlike the fill light.
pub fn sample_sun(run_seed: u64) -> SunLight {
    let mut rng = SmallRng::seed_from_u64(run_seed);
    SunLight {
        location: SUN_LOCATION,
        rotation_euler: SUN_ROTATION,
        energy: rng.random_range(SUN_ENERGY_MIN..=SUN_ENERGY_MAX),
    }
}

/// Orientation looking along local -Z from `eye` toward `target`, with
/// local +Y kept toward world up.
pub fn look_rotation(eye: Vec3, target: Vec3) -> Quat {
    let fwd = (target - eye).normalize();
    let mut right = fwd.cross(Vec3::Z);
    if right.length_squared() < 1e-12 {
        // Looking straight up or down; any horizontal right axis works.
        right = Vec3::X;
    }
    let right = right.normalize();
    let up = right.cross(fwd);
    Quat::from_mat3(&Mat3::from_cols(right, up, -fwd))
}
