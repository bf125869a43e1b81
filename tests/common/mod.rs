use std::path::{Path, PathBuf};

use anyhow::Result;
use image::{Rgba, RgbaImage};
use yologen::geom::ProjectedPoint;
use yologen::host::{
    BackgroundHandle, CameraRig, ModelFormat, ObjectId, ObjectKind, PointLight, RenderHost,
    RenderSettings, SceneObject, SunLight, Transform,
};

/// Import result with a grouping parent first, so tests exercise the
/// "walk the set, don't take index 0" selection rule.
pub fn mesh_import() -> Vec<SceneObject> {
    vec![
        SceneObject {
            id: ObjectId(1),
            kind: ObjectKind::Other,
        },
        SceneObject {
            id: ObjectId(2),
            kind: ObjectKind::Mesh,
        },
    ]
}

pub fn visible_points() -> Vec<ProjectedPoint> {
    vec![
        ProjectedPoint::new(0.25, 0.2, 1.0),
        ProjectedPoint::new(0.75, 0.8, 1.0),
    ]
}

pub fn hidden_points() -> Vec<ProjectedPoint> {
    vec![
        ProjectedPoint::new(1.5, 0.5, 1.0),
        ProjectedPoint::new(0.5, 0.5, -1.0),
    ]
}

/// Scripted stand-in for the rendering host.
///
/// Imports and projections replay per-call scripts (the last entry repeats
/// forever); every capability records what it was asked to do so tests can
/// assert on call counts and resource balance. Renders write a real tiny
/// PNG so output-pair checks see actual files.
#[derive(Debug)]
pub struct FakeHost {
    pub import_script: Vec<Vec<SceneObject>>,
    pub projection_script: Vec<Vec<ProjectedPoint>>,
    import_calls: usize,
    projection_calls: usize,

    pub settings: Option<RenderSettings>,
    pub resets: u32,
    pub imported: Vec<(PathBuf, ModelFormat)>,
    pub transforms: Vec<(ObjectId, Transform)>,
    pub cameras: Vec<CameraRig>,
    pub suns: Vec<SunLight>,
    pub fills: Vec<PointLight>,
    pub bound_paths: Vec<PathBuf>,
    pub binds: u32,
    pub releases: u32,
    bound: Option<BackgroundHandle>,
    next_handle: u64,
    pub rendered: Vec<PathBuf>,
}

impl FakeHost {
    pub fn new(
        import_script: Vec<Vec<SceneObject>>,
        projection_script: Vec<Vec<ProjectedPoint>>,
    ) -> Self {
        assert!(!import_script.is_empty() && !projection_script.is_empty());
        Self {
            import_script,
            projection_script,
            import_calls: 0,
            projection_calls: 0,
            settings: None,
            resets: 0,
            imported: Vec::new(),
            transforms: Vec::new(),
            cameras: Vec::new(),
            suns: Vec::new(),
            fills: Vec::new(),
            bound_paths: Vec::new(),
            binds: 0,
            releases: 0,
            bound: None,
            next_handle: 0,
            rendered: Vec::new(),
        }
    }

    pub fn always_visible() -> Self {
        Self::new(vec![mesh_import()], vec![visible_points()])
    }

    fn replay<T: Clone>(script: &[T], call: usize) -> T {
        script[call.min(script.len() - 1)].clone()
    }
}

impl RenderHost for FakeHost {
    fn configure(&mut self, settings: &RenderSettings) -> Result<()> {
        self.settings = Some(*settings);
        Ok(())
    }

    fn reset_scene(&mut self) -> Result<()> {
        self.resets += 1;
        Ok(())
    }

    fn import_model(&mut self, path: &Path, format: ModelFormat) -> Result<Vec<SceneObject>> {
        self.imported.push((path.to_path_buf(), format));
        let objects = Self::replay(&self.import_script, self.import_calls);
        self.import_calls += 1;
        Ok(objects)
    }

    fn set_object_transform(&mut self, id: ObjectId, transform: &Transform) -> Result<()> {
        self.transforms.push((id, *transform));
        Ok(())
    }

    fn set_camera(&mut self, rig: &CameraRig) -> Result<()> {
        self.cameras.push(*rig);
        Ok(())
    }

    fn ensure_sun(&mut self, sun: &SunLight) -> Result<()> {
        // Records every call; the generator is expected to make one per run.
        self.suns.push(*sun);
        Ok(())
    }

    fn replace_fill_light(&mut self, light: &PointLight) -> Result<()> {
        self.fills.push(*light);
        Ok(())
    }

    fn bind_background(&mut self, path: &Path) -> Result<BackgroundHandle> {
        assert!(self.bound.is_none(), "background already bound");
        self.bound_paths.push(path.to_path_buf());
        self.binds += 1;
        let handle = BackgroundHandle(self.next_handle);
        self.next_handle += 1;
        self.bound = Some(handle);
        Ok(handle)
    }

    fn release_background(&mut self, handle: BackgroundHandle) -> Result<()> {
        assert_eq!(self.bound, Some(handle), "releasing an unbound background");
        self.bound = None;
        self.releases += 1;
        Ok(())
    }

    fn project_vertices(&mut self, _id: ObjectId) -> Result<Vec<ProjectedPoint>> {
        let points = Self::replay(&self.projection_script, self.projection_calls);
        self.projection_calls += 1;
        Ok(points)
    }

    fn render_still(&mut self, path: &Path) -> Result<()> {
        RgbaImage::from_pixel(4, 4, Rgba([32, 32, 32, 255])).save(path)?;
        self.rendered.push(path.to_path_buf());
        Ok(())
    }
}
