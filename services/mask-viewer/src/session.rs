//! Building a dispatcher from configuration and feeding it commands.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use mask_common::MaskKind;
use overlay::{source, CommandDispatcher, LayerState, LayerStateMachine, MapDisplay, MaskConfig};
use tracing::info;

use crate::file_display::FileDisplay;

/// Create a dispatcher writing overlays under `output_dir`.
///
/// `initial_kind` overrides the configured default mask.
pub fn build_dispatcher(
    config: MaskConfig,
    output_dir: impl Into<PathBuf>,
    initial_kind: Option<&str>,
) -> Result<CommandDispatcher<FileDisplay>> {
    let output_dir = output_dir.into();
    let raster_source = source::from_config(&config.source).context("Failed to build raster source")?;
    let display = FileDisplay::new(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let mut machine = LayerStateMachine::new(config, raster_source, display)
        .context("Failed to initialize layer state")?;
    if let Some(kind) = initial_kind {
        machine
            .switch_mask_type_by_name(kind)
            .with_context(|| format!("Invalid initial mask kind '{}'", kind))?;
    }

    Ok(CommandDispatcher::new(machine))
}

/// Dispatch each line of `input`. Returns the number of lines read.
pub fn run_lines<D: MapDisplay, R: BufRead>(
    dispatcher: &mut CommandDispatcher<D>,
    input: R,
) -> Result<usize> {
    let mut count = 0;
    for line in input.lines() {
        let line = line.context("Failed to read command input")?;
        dispatcher.dispatch_line(&line);
        count += 1;
    }
    Ok(count)
}

/// Where a session ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub state: LayerState,
    pub kind: MaskKind,
    pub overlays_written: usize,
    pub live_overlays: usize,
}

impl SessionSummary {
    pub fn of(dispatcher: &CommandDispatcher<FileDisplay>) -> Self {
        let machine = dispatcher.machine();
        let display = machine.display();
        Self {
            state: machine.state(),
            kind: machine.mask().kind(),
            overlays_written: display.written_files().len(),
            live_overlays: display.inner().live_overlay_count(),
        }
    }

    pub fn log(&self) {
        info!(
            state = %self.state,
            kind = %self.kind,
            overlays_written = self.overlays_written,
            live_overlays = self.live_overlays,
            "Session finished"
        );
    }
}
