//! A display that also writes every published overlay to disk.

use std::path::{Path, PathBuf};

use mask_common::MaskResult;
use overlay::{ImageOverlay, InMemoryDisplay, MapDisplay, OverlayHandle};
use tracing::info;

/// Tracks overlays in memory and writes each one to `<dir>/overlay-<n>.png`.
#[derive(Debug)]
pub struct FileDisplay {
    inner: InMemoryDisplay,
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FileDisplay {
    /// Create the output directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> MaskResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            inner: InMemoryDisplay::new(),
            dir,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in publish order.
    pub fn written_files(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn inner(&self) -> &InMemoryDisplay {
        &self.inner
    }

    fn path_for(&self, handle: OverlayHandle) -> PathBuf {
        self.dir.join(format!("{}.png", handle))
    }
}

impl MapDisplay for FileDisplay {
    fn add_image_overlay(&mut self, overlay: ImageOverlay) -> MaskResult<OverlayHandle> {
        let png = overlay.png.clone();
        let handle = self.inner.add_image_overlay(overlay)?;
        let path = self.path_for(handle);

        if let Err(e) = std::fs::write(&path, &png) {
            // Not published if it could not be written
            self.inner.remove_overlay(handle)?;
            return Err(e.into());
        }

        info!(%handle, path = %path.display(), bytes = png.len(), "Wrote overlay");
        self.written.push(path);
        Ok(handle)
    }

    fn remove_overlay(&mut self, handle: OverlayHandle) -> MaskResult<()> {
        self.inner.remove_overlay(handle)
    }

    fn set_raw_layers_visible(&mut self, visible: bool) {
        self.inner.set_raw_layers_visible(visible);
    }
}
