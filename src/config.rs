use std::path::PathBuf;

use crate::error::GenError;

/// Process-wide constants for one generation run. Loaded once, immutable
/// thereafter.
///
/// Every `*_min`/`*_max` pair is a closed interval sampled uniformly per
/// frame; elevation is in degrees, focal length in millimetres, the rest in
/// scene units.
#[derive(Clone, Debug)]
pub struct GenConfig {
    pub models: Vec<PathBuf>,
    pub backgrounds_dir: PathBuf,
    pub out_dir: PathBuf,

    /// Target number of accepted image/label pairs.
    pub num_images: u32,
    pub class_id: u32,
    pub seed: u64,

    pub resolution: (u32, u32),
    /// Render sample count handed to the host.
    pub samples: u32,

    pub cam_rad_min: f32,
    pub cam_rad_max: f32,
    pub cam_elev_min: f32,
    pub cam_elev_max: f32,
    pub focal_min: f32,
    pub focal_max: f32,
    pub scale_min: f32,
    pub scale_max: f32,
    pub pos_x_min: f32,
    pub pos_x_max: f32,
    pub pos_y_min: f32,
    pub pos_y_max: f32,
    pub light_pwr_min: f32,
    pub light_pwr_max: f32,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            backgrounds_dir: "backgrounds".into(),
            out_dir: "output".into(),
            num_images: 1000,
            class_id: 0,
            seed: 0,
            resolution: (640, 640),
            samples: 128,
            cam_rad_min: 0.6,
            cam_rad_max: 1.2,
            cam_elev_min: 10.0,
            cam_elev_max: 50.0,
            focal_min: 40.0,
            focal_max: 80.0,
            scale_min: 1.2,
            scale_max: 1.8,
            pos_x_min: -0.2,
            pos_x_max: 0.2,
            pos_y_min: -0.2,
            pos_y_max: 0.2,
            light_pwr_min: 800.0,
            light_pwr_max: 1500.0,
        }
    }
}

impl GenConfig {
    pub fn validate(&self) -> Result<(), GenError> {
        let ranges = [
            ("cam_rad", self.cam_rad_min, self.cam_rad_max),
            ("cam_elev", self.cam_elev_min, self.cam_elev_max),
            ("focal", self.focal_min, self.focal_max),
            ("scale", self.scale_min, self.scale_max),
            ("pos_x", self.pos_x_min, self.pos_x_max),
            ("pos_y", self.pos_y_min, self.pos_y_max),
            ("light_pwr", self.light_pwr_min, self.light_pwr_max),
        ];
        for (name, min, max) in ranges {
            if min > max {
                return Err(GenError::InvalidConfig {
                    name,
                    reason: "min exceeds max",
                });
            }
        }
        if self.resolution.0 == 0 || self.resolution.1 == 0 {
            return Err(GenError::InvalidConfig {
                name: "resolution",
                reason: "must be positive in both axes",
            });
        }
        Ok(())
    }
}
