//! Which presentation of the raw layers is visible, and with which mask.
//!
//! Two states:
//! - **Unmasked**: raw layers visible, no overlay published.
//! - **Masked**: raw layers hidden, exactly one masked overlay published.
//!
//! Entering Masked captures a frame, masks it, encodes it and publishes it.
//! Leaving Masked releases the overlay and shows the raw layers again. The
//! machine owns the only overlay handle and releases it before publishing a
//! replacement, so at most one overlay is ever live.

use std::fmt;

use mask_common::{MaskError, MaskKind, MaskResult, MaskShape};
use renderer::apply_mask_in_place;
use renderer::png::encode_overlay;
use tracing::{debug, info, warn};

use crate::config::MaskConfig;
use crate::display::{ImageOverlay, MapDisplay, OverlayHandle};
use crate::source::{placeholder_raster, RasterSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerState {
    Unmasked,
    Masked,
}

impl fmt::Display for LayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerState::Unmasked => write!(f, "unmasked"),
            LayerState::Masked => write!(f, "masked"),
        }
    }
}

/// The mask currently selected, whether or not it is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskState {
    kind: MaskKind,
    shape: MaskShape,
}

impl MaskState {
    pub fn kind(&self) -> MaskKind {
        self.kind
    }

    pub fn shape(&self) -> &MaskShape {
        &self.shape
    }
}

/// Outcome of a state machine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionReport {
    /// State after the operation
    pub state: LayerState,
    pub kind: MaskKind,
    /// A new overlay was published
    pub republished: bool,
    /// The placeholder raster stood in for a failed capture
    pub used_fallback: bool,
    /// Pixels cleared by the mask, 0 unless republished
    pub outside_pixels: usize,
}

impl TransitionReport {
    fn unmasked(kind: MaskKind) -> Self {
        Self {
            state: LayerState::Unmasked,
            kind,
            republished: false,
            used_fallback: false,
            outside_pixels: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presentation {
    Raw,
    Overlay(OverlayHandle),
}

/// A composited overlay ready to publish.
struct Composite {
    overlay: ImageOverlay,
    used_fallback: bool,
    outside_pixels: usize,
}

pub struct LayerStateMachine<D: MapDisplay> {
    config: MaskConfig,
    source: Box<dyn RasterSource>,
    display: D,
    mask: MaskState,
    presentation: Presentation,
}

impl<D: MapDisplay> LayerStateMachine<D> {
    /// Start Unmasked with the configured default mask; shows the raw layers.
    pub fn new(config: MaskConfig, source: Box<dyn RasterSource>, mut display: D) -> MaskResult<Self> {
        let kind = config.default_kind;
        let shape = config.shapes.build(kind)?;
        display.set_raw_layers_visible(true);
        info!(kind = %kind, source = source.name(), "Layer state initialized");
        Ok(Self {
            config,
            source,
            display,
            mask: MaskState { kind, shape },
            presentation: Presentation::Raw,
        })
    }

    pub fn state(&self) -> LayerState {
        match self.presentation {
            Presentation::Raw => LayerState::Unmasked,
            Presentation::Overlay(_) => LayerState::Masked,
        }
    }

    pub fn is_masked(&self) -> bool {
        self.state() == LayerState::Masked
    }

    pub fn mask(&self) -> &MaskState {
        &self.mask
    }

    /// Handle of the live overlay, if masked.
    pub fn overlay_handle(&self) -> Option<OverlayHandle> {
        match self.presentation {
            Presentation::Raw => None,
            Presentation::Overlay(handle) => Some(handle),
        }
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn into_display(self) -> D {
        self.display
    }

    /// Switch between the raw layers and the masked overlay.
    pub fn toggle(&mut self) -> MaskResult<TransitionReport> {
        match self.presentation {
            Presentation::Raw => self.enter_masked(),
            Presentation::Overlay(handle) => self.exit_masked(handle),
        }
    }

    /// Select the mask registered for `kind`.
    ///
    /// While masked the overlay is recomposited with the new shape. If the
    /// shape cannot be built, or the new overlay cannot be produced, the
    /// previous mask stays selected. A display that rejects the new overlay
    /// after the old one is released leaves the machine Unmasked.
    pub fn switch_mask_type(&mut self, kind: MaskKind) -> MaskResult<TransitionReport> {
        let shape = match self.config.shapes.build(kind) {
            Ok(shape) => shape,
            Err(e) => {
                warn!(kind = %kind, error = %e, "Mask shape rejected, keeping current mask");
                return Err(e);
            }
        };
        let previous = std::mem::replace(&mut self.mask, MaskState { kind, shape });

        let handle = match self.presentation {
            Presentation::Raw => {
                info!(from = %previous.kind, to = %kind, "Selected mask");
                return Ok(TransitionReport::unmasked(kind));
            }
            Presentation::Overlay(handle) => handle,
        };

        let composite = match self.composite() {
            Ok(composite) => composite,
            Err(e) => {
                self.mask = previous;
                return Err(e);
            }
        };
        let from = previous.kind;
        if let Err(e) = self.release(handle) {
            self.mask = previous;
            return Err(e);
        }
        match self.publish(composite) {
            Ok(report) => {
                info!(from = %from, to = %kind, "Switched mask");
                Ok(report)
            }
            Err(e) => {
                warn!(kind = %from, error = %e, "Replacement overlay rejected, showing raw layers");
                self.mask = previous;
                Err(e)
            }
        }
    }

    /// Like [`switch_mask_type`](Self::switch_mask_type) for a kind given by name.
    pub fn switch_mask_type_by_name(&mut self, name: &str) -> MaskResult<TransitionReport> {
        match name.parse::<MaskKind>() {
            Ok(kind) => self.switch_mask_type(kind),
            Err(e) => {
                warn!(name, current = %self.mask.kind, "Unknown mask kind, ignoring");
                Err(e)
            }
        }
    }

    fn enter_masked(&mut self) -> MaskResult<TransitionReport> {
        let composite = self.composite()?;
        let report = self.publish(composite)?;
        info!(kind = %self.mask.kind, fallback = report.used_fallback, "Mask applied");
        Ok(report)
    }

    fn exit_masked(&mut self, handle: OverlayHandle) -> MaskResult<TransitionReport> {
        self.release(handle)?;
        self.display.set_raw_layers_visible(true);
        self.presentation = Presentation::Raw;
        info!(kind = %self.mask.kind, "Mask removed");
        Ok(TransitionReport::unmasked(self.mask.kind))
    }

    /// Capture, mask and encode the current frame.
    fn composite(&self) -> MaskResult<Composite> {
        let transform = self.config.transform();
        let (mut raster, used_fallback) = match self.source.capture_frame(&transform) {
            Ok(raster) => (raster, false),
            Err(e) => {
                warn!(
                    source = self.source.name(),
                    error = %e,
                    "Frame capture failed, using placeholder"
                );
                (placeholder_raster(transform.width(), transform.height()), true)
            }
        };

        let outside_pixels = apply_mask_in_place(&mut raster, &self.config.bounds, &self.mask.shape);
        let png = encode_overlay(&raster)?;
        debug!(bytes = png.len(), outside_pixels, "Composited overlay");

        Ok(Composite {
            overlay: ImageOverlay {
                png,
                bounds: self.config.bounds,
                opacity: self.config.overlay.opacity,
                interactive: self.config.overlay.interactive,
            },
            used_fallback,
            outside_pixels,
        })
    }

    /// Hide the raw layers and publish `composite` as the only overlay.
    ///
    /// Expects no overlay to be live. On failure the raw layers are shown
    /// again and the machine is Unmasked.
    fn publish(&mut self, composite: Composite) -> MaskResult<TransitionReport> {
        self.display.set_raw_layers_visible(false);
        match self.display.add_image_overlay(composite.overlay) {
            Ok(handle) => {
                self.presentation = Presentation::Overlay(handle);
                Ok(TransitionReport {
                    state: LayerState::Masked,
                    kind: self.mask.kind,
                    republished: true,
                    used_fallback: composite.used_fallback,
                    outside_pixels: composite.outside_pixels,
                })
            }
            Err(e) => {
                self.display.set_raw_layers_visible(true);
                self.presentation = Presentation::Raw;
                Err(e)
            }
        }
    }

    /// Remove the live overlay. A handle the display no longer knows counts as released.
    fn release(&mut self, handle: OverlayHandle) -> MaskResult<()> {
        match self.display.remove_overlay(handle) {
            Ok(()) => {}
            Err(MaskError::OverlayNotFound(_)) => {
                warn!(%handle, "Overlay already gone from display");
            }
            Err(e) => return Err(e),
        }
        self.presentation = Presentation::Raw;
        Ok(())
    }
}
