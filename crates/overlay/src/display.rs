//! The map surface overlays are published to.

use std::collections::BTreeMap;
use std::fmt;

use mask_common::{GeoBounds, MaskError, MaskResult};
use tracing::debug;

/// Identifies a published overlay until it is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(u64);

impl OverlayHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OverlayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay-{}", self.0)
    }
}

/// An encoded image placed over `bounds`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOverlay {
    /// PNG bytes
    pub png: Vec<u8>,
    pub bounds: GeoBounds,
    pub opacity: f32,
    pub interactive: bool,
}

/// A map that can show the raw layers and image overlays.
pub trait MapDisplay {
    fn add_image_overlay(&mut self, overlay: ImageOverlay) -> MaskResult<OverlayHandle>;

    /// Remove a previously added overlay. Unknown handles are an error.
    fn remove_overlay(&mut self, handle: OverlayHandle) -> MaskResult<()>;

    /// Show or hide the unmasked heatmap/vector layers.
    fn set_raw_layers_visible(&mut self, visible: bool);
}

/// A [`MapDisplay`] that keeps everything in memory.
#[derive(Debug, Default)]
pub struct InMemoryDisplay {
    next_id: u64,
    overlays: BTreeMap<OverlayHandle, ImageOverlay>,
    raw_layers_visible: bool,
    published: usize,
}

impl InMemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw_layers_visible(&self) -> bool {
        self.raw_layers_visible
    }

    pub fn live_overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn overlay(&self, handle: OverlayHandle) -> Option<&ImageOverlay> {
        self.overlays.get(&handle)
    }

    pub fn overlays(&self) -> impl Iterator<Item = (OverlayHandle, &ImageOverlay)> {
        self.overlays.iter().map(|(h, o)| (*h, o))
    }

    /// Total overlays ever added, including removed ones.
    pub fn published_count(&self) -> usize {
        self.published
    }

    /// Raw layers plus live overlays currently on the map.
    pub fn visible_presentations(&self) -> usize {
        usize::from(self.raw_layers_visible) + self.overlays.len()
    }
}

impl MapDisplay for InMemoryDisplay {
    fn add_image_overlay(&mut self, overlay: ImageOverlay) -> MaskResult<OverlayHandle> {
        self.next_id += 1;
        let handle = OverlayHandle(self.next_id);
        debug!(%handle, bytes = overlay.png.len(), "Added image overlay");
        self.overlays.insert(handle, overlay);
        self.published += 1;
        Ok(handle)
    }

    fn remove_overlay(&mut self, handle: OverlayHandle) -> MaskResult<()> {
        if self.overlays.remove(&handle).is_none() {
            return Err(MaskError::OverlayNotFound(handle.id()));
        }
        debug!(%handle, "Removed image overlay");
        Ok(())
    }

    fn set_raw_layers_visible(&mut self, visible: bool) {
        self.raw_layers_visible = visible;
    }
}
