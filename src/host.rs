//! The abstract rendering-host boundary.
//!
//! Everything the generator needs from a 3D engine (scene mutation, model
//! import, compositing, evaluation, rendering) goes through [`RenderHost`],
//! so the generation loop can be exercised against a scripted stand-in.

use std::path::Path;

use anyhow::Result;
use glam::{Quat, Vec3};

use crate::geom::ProjectedPoint;

/// Opaque identifier for an object living in the host scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

/// Opaque handle to a background image bound for compositing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackgroundHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    /// Carries renderable vertex/face geometry.
    Mesh,
    /// Grouping or helper object with no renderable geometry.
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
}

/// Mesh interchange formats the generator hands to the host importer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFormat {
    Glb,
    Gltf,
}

impl ModelFormat {
    /// Derive the format from the file extension, case-insensitively.
    /// Anything unrecognized is a fatal precondition failure upstream.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "glb" => Some(ModelFormat::Glb),
            "gltf" => Some(ModelFormat::Gltf),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub location: Vec3,
    pub rotation_euler: Vec3,
    pub scale: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    pub location: Vec3,
    pub rotation: Quat,
    /// Focal length in millimetres.
    pub focal_mm: f32,
}

/// The persistent directional light. Created once per run and reused on
/// every subsequent frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunLight {
    pub location: Vec3,
    pub rotation_euler: Vec3,
    pub energy: f32,
}

/// The per-frame fill light, fully recreated on every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub location: Vec3,
    pub energy: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    pub resolution: (u32, u32),
    pub samples: u32,
}

/// Capability set the generator consumes from an external 3D engine.
///
/// The host owns the scene graph, the renderer and the camera projection;
/// the generator only ever talks to it through these calls. Host failures
/// are opaque and abort the run.
pub trait RenderHost {
    /// Apply output settings once per run: resolution, sample count, and
    /// alpha-over compositing of the transparent-film foreground render on
    /// top of the bound background image.
    fn configure(&mut self, settings: &RenderSettings) -> Result<()>;

    /// Remove all geometry from the scene, keeping the camera and lights.
    fn reset_scene(&mut self) -> Result<()>;

    /// Import a model file, returning every created object. The set may
    /// include non-mesh parents; callers must not assume the first entry
    /// is the mesh.
    fn import_model(&mut self, path: &Path, format: ModelFormat) -> Result<Vec<SceneObject>>;

    fn set_object_transform(&mut self, id: ObjectId, transform: &Transform) -> Result<()>;

    fn set_camera(&mut self, rig: &CameraRig) -> Result<()>;

    /// Create the persistent directional light if it does not exist yet.
    /// An existing sun is left untouched.
    fn ensure_sun(&mut self, sun: &SunLight) -> Result<()>;

    /// Drop the previous fill light, if any, and create a new one.
    fn replace_fill_light(&mut self, light: &PointLight) -> Result<()>;

    /// Load an image and bind it as the compositing backdrop, scaled to
    /// the render resolution.
    fn bind_background(&mut self, path: &Path) -> Result<BackgroundHandle>;

    fn release_background(&mut self, handle: BackgroundHandle) -> Result<()>;

    /// Evaluate modifiers and transforms, then project every vertex of the
    /// object into normalized camera space.
    fn project_vertices(&mut self, id: ObjectId) -> Result<Vec<ProjectedPoint>>;

    /// Render the composited still to `path` at the configured resolution.
    fn render_still(&mut self, path: &Path) -> Result<()>;
}
