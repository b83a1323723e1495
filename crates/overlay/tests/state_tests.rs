//! Tests for the layer state machine and command dispatch.
//!
//! Covers the toggle/switch scenarios, capture fallback, rejected kinds and
//! shapes, and handle bookkeeping against an in-memory display.

use std::cell::Cell;
use std::rc::Rc;

use mask_common::{CoordinateTransform, MaskError, MaskKind, MaskResult};
use overlay::config::{RasterSize, VectorSourceConfig};
use overlay::{
    placeholder_raster, CommandDispatcher, ImageOverlay, InMemoryDisplay, LayerState,
    LayerStateMachine, MapDisplay, MaskConfig, OverlayHandle, RasterSource, VectorSource,
};
use renderer::png::encode_overlay;
use renderer::{apply_mask, RasterBuffer};

// ============================================================================
// Test doubles
// ============================================================================

/// A source whose capture always fails.
struct BrokenSource;

impl RasterSource for BrokenSource {
    fn name(&self) -> &str {
        "broken"
    }

    fn capture_frame(&self, _transform: &CoordinateTransform) -> MaskResult<RasterBuffer> {
        Err(MaskError::CaptureFailed("canvas unavailable".to_string()))
    }
}

/// A display that refuses new overlays.
#[derive(Default)]
struct FullDisplay {
    inner: InMemoryDisplay,
}

impl MapDisplay for FullDisplay {
    fn add_image_overlay(&mut self, _overlay: ImageOverlay) -> MaskResult<OverlayHandle> {
        Err(MaskError::Display("overlay pane is full".to_string()))
    }

    fn remove_overlay(&mut self, handle: OverlayHandle) -> MaskResult<()> {
        self.inner.remove_overlay(handle)
    }

    fn set_raw_layers_visible(&mut self, visible: bool) {
        self.inner.set_raw_layers_visible(visible);
    }
}

/// Knobs shared between a test and the [`FlakyDisplay`] it hands over.
#[derive(Clone, Default)]
struct Faults {
    adds_left: Rc<Cell<usize>>,
    lock_removals: Rc<Cell<bool>>,
}

/// A display that accepts a limited number of overlays, and can be told to
/// refuse removals.
struct FlakyDisplay {
    inner: InMemoryDisplay,
    faults: Faults,
}

impl FlakyDisplay {
    fn accepting(adds: usize) -> (Self, Faults) {
        let faults = Faults::default();
        faults.adds_left.set(adds);
        let display = Self {
            inner: InMemoryDisplay::new(),
            faults: faults.clone(),
        };
        (display, faults)
    }
}

impl MapDisplay for FlakyDisplay {
    fn add_image_overlay(&mut self, overlay: ImageOverlay) -> MaskResult<OverlayHandle> {
        let left = self.faults.adds_left.get();
        if left == 0 {
            return Err(MaskError::Display("overlay pane is full".to_string()));
        }
        self.faults.adds_left.set(left - 1);
        self.inner.add_image_overlay(overlay)
    }

    fn remove_overlay(&mut self, handle: OverlayHandle) -> MaskResult<()> {
        if self.faults.lock_removals.get() {
            return Err(MaskError::Display("overlay pane is locked".to_string()));
        }
        self.inner.remove_overlay(handle)
    }

    fn set_raw_layers_visible(&mut self, visible: bool) {
        self.inner.set_raw_layers_visible(visible);
    }
}

/// Access to the in-memory bookkeeping behind a display double.
trait Recorded {
    fn recorded(&self) -> &InMemoryDisplay;
}

impl Recorded for InMemoryDisplay {
    fn recorded(&self) -> &InMemoryDisplay {
        self
    }
}

impl Recorded for FullDisplay {
    fn recorded(&self) -> &InMemoryDisplay {
        &self.inner
    }
}

impl Recorded for FlakyDisplay {
    fn recorded(&self) -> &InMemoryDisplay {
        &self.inner
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn small_config() -> MaskConfig {
    MaskConfig {
        raster: RasterSize {
            width: 64,
            height: 64,
        },
        ..MaskConfig::default()
    }
}

fn vector_source() -> Box<dyn RasterSource> {
    Box::new(VectorSource::from_config(&VectorSourceConfig::default()))
}

fn machine() -> LayerStateMachine<InMemoryDisplay> {
    LayerStateMachine::new(small_config(), vector_source(), InMemoryDisplay::new()).unwrap()
}

/// The PNG the machine should publish for `kind` given `raster`.
fn expected_png(config: &MaskConfig, raster: RasterBuffer, kind: MaskKind) -> Vec<u8> {
    let shape = config.shapes.build(kind).unwrap();
    encode_overlay(&apply_mask(raster, &config.bounds, &shape)).unwrap()
}

fn live_png(m: &LayerStateMachine<InMemoryDisplay>) -> Vec<u8> {
    let handle = m.overlay_handle().expect("machine is masked");
    m.display().overlay(handle).unwrap().png.clone()
}

/// Exactly one presentation visible and the machine agrees with the display.
fn assert_consistent<D: MapDisplay + Recorded>(m: &LayerStateMachine<D>) {
    let display = m.display().recorded();
    assert_eq!(display.visible_presentations(), 1);
    match m.state() {
        LayerState::Unmasked => {
            assert!(display.raw_layers_visible());
            assert_eq!(m.overlay_handle(), None);
        }
        LayerState::Masked => {
            assert!(!display.raw_layers_visible());
            assert!(display.overlay(m.overlay_handle().unwrap()).is_some());
        }
    }
}

// ============================================================================
// Toggle scenarios
// ============================================================================

#[test]
fn test_toggle_twice_restores_raw_layers() {
    let mut m = machine();
    assert_consistent(&m);

    assert_eq!(m.toggle().unwrap().state, LayerState::Masked);
    assert_consistent(&m);

    assert_eq!(m.toggle().unwrap().state, LayerState::Unmasked);
    assert_consistent(&m);
    assert_eq!(m.display().live_overlay_count(), 0);
    assert!(m.display().raw_layers_visible());
}

#[test]
fn test_published_overlay_matches_compositor() {
    let mut m = machine();
    m.toggle().unwrap();

    let config = small_config();
    let frame = vector_source().capture_frame(&config.transform()).unwrap();
    assert_eq!(live_png(&m), expected_png(&config, frame, MaskKind::Circle));

    let overlay = m.display().overlay(m.overlay_handle().unwrap()).unwrap();
    assert_eq!(overlay.bounds, config.bounds);
    assert_eq!(&overlay.png[..8], &renderer::png::PNG_SIGNATURE);
}

#[test]
fn test_repeated_toggles_never_leak_handles() {
    let mut m = machine();
    for i in 0..20 {
        m.toggle().unwrap();
        assert!(m.display().live_overlay_count() <= 1);
        assert_consistent(&m);
        if i % 3 == 0 {
            let kind = MaskKind::ALL[i % 4];
            m.switch_mask_type(kind).unwrap();
            assert!(m.display().live_overlay_count() <= 1);
            assert_consistent(&m);
        }
    }
    assert_eq!(m.state(), LayerState::Unmasked);
    assert_eq!(m.display().live_overlay_count(), 0);
}

// ============================================================================
// Mask switching
// ============================================================================

#[test]
fn test_switch_while_unmasked_changes_nothing_visible() {
    let mut m = machine();
    let report = m.switch_mask_type(MaskKind::Rectangle).unwrap();

    assert_eq!(report.state, LayerState::Unmasked);
    assert!(!report.republished);
    assert_eq!(m.display().published_count(), 0);
    assert_consistent(&m);

    // The next toggle uses the new shape
    m.toggle().unwrap();
    assert_eq!(m.mask().kind(), MaskKind::Rectangle);
    let config = small_config();
    let frame = vector_source().capture_frame(&config.transform()).unwrap();
    assert_eq!(live_png(&m), expected_png(&config, frame, MaskKind::Rectangle));
}

#[test]
fn test_switch_while_masked_republishes() {
    let mut m = machine();
    m.toggle().unwrap();
    let before = m.overlay_handle().unwrap();

    let report = m.switch_mask_type_by_name("polygon").unwrap();
    assert!(report.republished);
    assert_eq!(report.kind, MaskKind::Polygon);
    assert_ne!(m.overlay_handle().unwrap(), before);
    assert_eq!(m.display().live_overlay_count(), 1);
    assert_eq!(m.display().published_count(), 2);
    assert_consistent(&m);
}

#[test]
fn test_unknown_kind_retains_state() {
    let mut m = machine();
    m.toggle().unwrap();
    let handle = m.overlay_handle();

    let err = m.switch_mask_type_by_name("hexagon").unwrap_err();
    assert!(matches!(err, MaskError::UnknownMaskKind(_)));
    assert_eq!(m.mask().kind(), MaskKind::Circle);
    assert_eq!(m.overlay_handle(), handle);
    assert_eq!(m.display().published_count(), 1);
}

#[test]
fn test_invalid_catalog_shape_retains_state() {
    let mut config = small_config();
    config.shapes.multipolygon.clear();
    let mut m = LayerStateMachine::new(config, vector_source(), InMemoryDisplay::new()).unwrap();
    m.toggle().unwrap();
    let handle = m.overlay_handle();
    let png = live_png(&m);

    let err = m.switch_mask_type(MaskKind::MultiPolygon).unwrap_err();
    assert!(matches!(err, MaskError::InvalidGeometry(_)));
    assert_eq!(m.mask().kind(), MaskKind::Circle);
    assert_eq!(m.overlay_handle(), handle);
    assert_eq!(live_png(&m), png);
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_capture_failure_uses_placeholder() {
    let config = small_config();
    let mut m =
        LayerStateMachine::new(config.clone(), Box::new(BrokenSource), InMemoryDisplay::new())
            .unwrap();

    let report = m.toggle().unwrap();
    assert!(report.used_fallback);
    assert_eq!(report.state, LayerState::Masked);
    assert_consistent(&m);

    let placeholder = placeholder_raster(64, 64);
    assert_eq!(live_png(&m), expected_png(&config, placeholder, MaskKind::Circle));
}

#[test]
fn test_publish_failure_keeps_raw_layers() {
    let mut m =
        LayerStateMachine::new(small_config(), vector_source(), FullDisplay::default()).unwrap();

    let err = m.toggle().unwrap_err();
    assert!(matches!(err, MaskError::Display(_)));
    assert_eq!(m.state(), LayerState::Unmasked);
    assert!(m.display().inner.raw_layers_visible());
    assert_eq!(m.display().inner.live_overlay_count(), 0);
    assert_consistent(&m);
}

#[test]
fn test_rejected_replacement_restores_previous_mask() {
    let (display, faults) = FlakyDisplay::accepting(1);
    let mut m = LayerStateMachine::new(small_config(), vector_source(), display).unwrap();
    m.toggle().unwrap();
    assert_consistent(&m);

    let err = m.switch_mask_type(MaskKind::Rectangle).unwrap_err();
    assert!(matches!(err, MaskError::Display(_)));
    assert_eq!(m.mask().kind(), MaskKind::Circle);
    assert_eq!(m.state(), LayerState::Unmasked);
    assert_eq!(m.display().inner.live_overlay_count(), 0);
    assert_consistent(&m);

    // The restored mask is the one applied next
    faults.adds_left.set(1);
    let report = m.toggle().unwrap();
    assert_eq!(report.kind, MaskKind::Circle);
    assert_consistent(&m);
}

#[test]
fn test_locked_removal_keeps_overlay_on_exit() {
    let (display, faults) = FlakyDisplay::accepting(2);
    let mut m = LayerStateMachine::new(small_config(), vector_source(), display).unwrap();
    m.toggle().unwrap();
    let handle = m.overlay_handle();
    faults.lock_removals.set(true);

    let err = m.toggle().unwrap_err();
    assert!(matches!(err, MaskError::Display(_)));
    assert_eq!(m.state(), LayerState::Masked);
    assert_eq!(m.overlay_handle(), handle);
    assert_consistent(&m);
}

#[test]
fn test_locked_removal_keeps_mask_on_switch() {
    let (display, faults) = FlakyDisplay::accepting(2);
    let mut m = LayerStateMachine::new(small_config(), vector_source(), display).unwrap();
    m.toggle().unwrap();
    let handle = m.overlay_handle();
    faults.lock_removals.set(true);

    let err = m.switch_mask_type(MaskKind::Polygon).unwrap_err();
    assert!(matches!(err, MaskError::Display(_)));
    assert_eq!(m.mask().kind(), MaskKind::Circle);
    assert_eq!(m.overlay_handle(), handle);
    assert_eq!(m.display().inner.live_overlay_count(), 1);
    assert_consistent(&m);
}

// ============================================================================
// Command dispatch
// ============================================================================

#[test]
fn test_dispatcher_key_sequence() {
    let mut dispatcher = CommandDispatcher::new(machine());

    assert!(dispatcher.dispatch_key('1'));
    assert!(dispatcher.dispatch_key('m'));
    assert_eq!(dispatcher.machine().state(), LayerState::Masked);
    assert_eq!(dispatcher.machine().mask().kind(), MaskKind::Rectangle);

    assert!(dispatcher.dispatch_key('4'));
    assert_eq!(dispatcher.machine().mask().kind(), MaskKind::MultiPolygon);
    assert!(!dispatcher.dispatch_key('q'));

    assert!(dispatcher.dispatch_key('M'));
    let m = dispatcher.into_inner();
    assert_eq!(m.state(), LayerState::Unmasked);
    assert_eq!(m.display().live_overlay_count(), 0);
}

#[test]
fn test_dispatcher_swallows_errors() {
    let mut dispatcher = CommandDispatcher::new(machine());
    dispatcher.dispatch_line("select-mask-kind hexagon");
    dispatcher.dispatch_line("launch rockets");
    dispatcher.dispatch_line("");
    dispatcher.dispatch_line("toggle-mask");

    assert_eq!(dispatcher.machine().state(), LayerState::Masked);
    assert_eq!(dispatcher.machine().mask().kind(), MaskKind::Circle);
}
