use std::fmt;

use serde::Serialize;

use crate::geom::YoloBox;

/// One line of a YOLO label file: class id plus the normalized box.
#[derive(Clone, Copy, Debug)]
pub struct LabelRecord {
    pub class_id: u32,
    pub bbox: YoloBox,
}

impl fmt::Display for LabelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.bbox.cx, self.bbox.cy, self.bbox.w, self.bbox.h
        )
    }
}

/// One manifest line per accepted frame. The per-frame seed is enough to
/// re-derive the full frame plan.
#[derive(Serialize, Debug)]
pub struct ManifestRecord {
    pub schema: &'static str,
    pub image: String,
    pub label: String,
    pub frame: u64,
    pub seed: u64,
}
