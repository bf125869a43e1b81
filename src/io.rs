use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::record::{LabelRecord, ManifestRecord};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Background candidates under `dir`, sorted so selection by index is
/// stable across runs and platforms.
pub fn find_backgrounds(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .map(|s| IMAGE_EXTENSIONS.contains(&s.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Owns the output layout: `images/` and `labels/` for the pairs, plus a
/// run manifest with one JSON line per accepted frame.
pub struct OutputWriter {
    images_dir: PathBuf,
    labels_dir: PathBuf,
    manifest: Option<BufWriter<File>>,
}

impl OutputWriter {
    pub fn create(out_dir: &Path) -> std::io::Result<Self> {
        let images_dir = out_dir.join("images");
        let labels_dir = out_dir.join("labels");
        fs::create_dir_all(&images_dir)?;
        fs::create_dir_all(&labels_dir)?;
        let manifest = File::create(out_dir.join("manifest.jsonl"))?;
        Ok(Self {
            images_dir,
            labels_dir,
            manifest: Some(BufWriter::new(manifest)),
        })
    }

    /// Shared base name of an output pair, e.g. `synth_00042`.
    pub fn base_name(frame: u64) -> String {
        format!("synth_{frame:05}")
    }

    pub fn image_path(&self, frame: u64) -> PathBuf {
        self.images_dir.join(format!("{}.png", Self::base_name(frame)))
    }

    pub fn label_path(&self, frame: u64) -> PathBuf {
        self.labels_dir.join(format!("{}.txt", Self::base_name(frame)))
    }

    pub fn write_label(&self, frame: u64, record: &LabelRecord) -> std::io::Result<()> {
        fs::write(self.label_path(frame), format!("{record}\n"))
    }

    pub fn append_manifest(&mut self, record: &ManifestRecord) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.manifest {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{json}")?;
        }
        Ok(())
    }

    pub fn finalize(&mut self) -> std::io::Result<()> {
        if let Some(writer) = self.manifest.take() {
            writer.into_inner()?.sync_all()?;
        }
        Ok(())
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        let _ = self.finalize();
    }
}
