//! The generation loop: sample, stage, evaluate, commit or discard.

use std::path::PathBuf;

use glam::Vec3;
use log::{info, warn};

use crate::config::GenConfig;
use crate::error::GenError;
use crate::geom::{self, YoloBox};
use crate::host::{
    BackgroundHandle, CameraRig, ModelFormat, ObjectId, ObjectKind, RenderHost, RenderSettings,
    Transform,
};
use crate::io::{self, OutputWriter};
use crate::record::{LabelRecord, ManifestRecord};
use crate::sample::{self, FramePlan, look_rotation};

/// Why a candidate frame was thrown away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscardReason {
    /// The imported model contained no mesh-type object.
    NoMesh,
    /// No projected vertex landed inside the frustum with forward depth.
    NotVisible,
}

enum FrameOutcome {
    Accepted,
    Discarded(DiscardReason),
}

/// Counters for one finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub accepted: u32,
    pub attempted: u64,
    pub discarded: u64,
}

/// Host handles for the scene pieces staged for one candidate frame.
/// The object dies with the next scene reset; the background must be
/// released explicitly on both the commit and the discard path.
struct StagedFrame {
    object: ObjectId,
    background: BackgroundHandle,
}

/// Produces exactly `num_images` accepted image/label pairs, retrying
/// indefinitely on frames where the object is not visible.
#[derive(Debug)]
pub struct DatasetGenerator<H> {
    cfg: GenConfig,
    host: H,
    formats: Vec<ModelFormat>,
}

impl<H: RenderHost> DatasetGenerator<H> {
    /// Validates the configuration and the model list up front, so every
    /// fatal precondition is reported before any frame is attempted.
    pub fn new(cfg: GenConfig, host: H) -> Result<Self, GenError> {
        cfg.validate()?;
        if cfg.models.is_empty() {
            return Err(GenError::NoModels);
        }
        let formats = cfg
            .models
            .iter()
            .map(|path| {
                ModelFormat::from_path(path)
                    .ok_or_else(|| GenError::UnsupportedModelFormat { path: path.clone() })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { cfg, host, formats })
    }

    pub fn run(&mut self) -> Result<RunStats, GenError> {
        let backgrounds = io::find_backgrounds(&self.cfg.backgrounds_dir)?;
        if backgrounds.is_empty() {
            return Err(GenError::NoBackgrounds {
                dir: self.cfg.backgrounds_dir.clone(),
            });
        }

        let mut out = OutputWriter::create(&self.cfg.out_dir)?;
        self.host.configure(&RenderSettings {
            resolution: self.cfg.resolution,
            samples: self.cfg.samples,
        })?;
        self.host.ensure_sun(&sample::sample_sun(self.cfg.seed))?;

        let mut stats = RunStats::default();
        let mut frame: u64 = 0;
        while stats.accepted < self.cfg.num_images {
            let plan = FramePlan::sample(
                &self.cfg,
                self.cfg.models.len(),
                backgrounds.len(),
                frame,
            );
            stats.attempted += 1;
            match self.attempt(&plan, &backgrounds, &mut out)? {
                FrameOutcome::Accepted => {
                    stats.accepted += 1;
                    info!(
                        "rendered {}/{} -> {}.png",
                        stats.accepted,
                        self.cfg.num_images,
                        OutputWriter::base_name(frame)
                    );
                }
                FrameOutcome::Discarded(reason) => {
                    stats.discarded += 1;
                    match reason {
                        DiscardReason::NoMesh => {
                            warn!("no mesh object in imported model, skipping frame {frame}");
                        }
                        DiscardReason::NotVisible => {
                            warn!("object not visible in frame {frame}, trying new randomisation");
                        }
                    }
                }
            }
            frame += 1;
        }

        out.finalize()?;
        info!(
            "done: {} images stored in {}",
            stats.accepted,
            self.cfg.out_dir.display()
        );
        Ok(stats)
    }

    /// One candidate frame: stage the scene, evaluate visibility, then
    /// commit or discard. The frame index advances either way.
    fn attempt(
        &mut self,
        plan: &FramePlan,
        backgrounds: &[PathBuf],
        out: &mut OutputWriter,
    ) -> Result<FrameOutcome, GenError> {
        let Some(staged) = self.stage(plan, backgrounds)? else {
            return Ok(FrameOutcome::Discarded(DiscardReason::NoMesh));
        };

        let points = self.host.project_vertices(staged.object)?;
        let Some(bbox) = geom::yolo_box(&points) else {
            self.host.release_background(staged.background)?;
            return Ok(FrameOutcome::Discarded(DiscardReason::NotVisible));
        };

        self.commit(plan, bbox, out)?;
        self.host.release_background(staged.background)?;
        Ok(FrameOutcome::Accepted)
    }

    /// Build the scene for one plan. Returns `None` when the imported
    /// model carries no mesh geometry; no background has been bound by
    /// that point.
    fn stage(
        &mut self,
        plan: &FramePlan,
        backgrounds: &[PathBuf],
    ) -> Result<Option<StagedFrame>, GenError> {
        self.host.reset_scene()?;

        let model = &self.cfg.models[plan.model_idx];
        let objects = self.host.import_model(model, self.formats[plan.model_idx])?;
        // The import may yield a parent empty plus children; take the first
        // mesh wherever it sits in the returned set.
        let Some(object) = objects
            .iter()
            .find(|o| o.kind == ObjectKind::Mesh)
            .map(|o| o.id)
        else {
            return Ok(None);
        };

        self.host.set_object_transform(
            object,
            &Transform {
                location: plan.object.location,
                rotation_euler: Vec3::splat(plan.object.rotation),
                scale: Vec3::splat(plan.object.scale),
            },
        )?;

        self.host.set_camera(&CameraRig {
            location: plan.camera.location,
            rotation: look_rotation(plan.camera.location, plan.camera.target),
            focal_mm: plan.camera.focal_mm,
        })?;

        self.host.replace_fill_light(&plan.fill)?;

        let background = self.host.bind_background(&backgrounds[plan.background_idx])?;
        Ok(Some(StagedFrame { object, background }))
    }

    /// Render and persist an accepted frame. The pair only counts toward
    /// the target once both writes have succeeded.
    fn commit(
        &mut self,
        plan: &FramePlan,
        bbox: YoloBox,
        out: &mut OutputWriter,
    ) -> Result<(), GenError> {
        self.host.render_still(&out.image_path(plan.frame))?;
        out.write_label(
            plan.frame,
            &LabelRecord {
                class_id: self.cfg.class_id,
                bbox,
            },
        )?;
        let base = OutputWriter::base_name(plan.frame);
        out.append_manifest(&ManifestRecord {
            schema: "v1",
            image: format!("images/{base}.png"),
            label: format!("labels/{base}.txt"),
            frame: plan.frame,
            seed: plan.seed,
        })?;
        Ok(())
    }

    /// Hand the host back, e.g. to inspect it after a run.
    pub fn into_host(self) -> H {
        self.host
    }
}
