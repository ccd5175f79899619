//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr via `env_logger` in the binary).  A real
//! window-server adapter would implement the same trait.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as a one-line tagged record.
#[derive(Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events written since construction.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted += 1;
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            AppEvent::AnimationStarted {
                state,
                frames,
                placeholder,
                frame_secs,
            } => {
                debug!(
                    "ANIM  | {} frames={} frame={:.2}s{}",
                    state,
                    frames,
                    frame_secs,
                    if *placeholder { " placeholder" } else { "" }
                );
            }
            AppEvent::CpuSampled {
                usage,
                frequency,
                measured,
            } => {
                info!(
                    "CPU   | {:.1}% idle_frequency={}{}",
                    usage * 100.0,
                    frequency,
                    if *measured { "" } else { " (fallback)" }
                );
            }
            AppEvent::DockMoved { from, to } => {
                info!("DOCK  | {} -> {}", from, to);
            }
            AppEvent::WindowPlaced { origin, dock } => {
                info!("PLACE | ({:.0}, {:.0}) dock={}", origin.x, origin.y, dock);
            }
            AppEvent::WindowDragged { origin } => {
                debug!("DRAG  | ({:.0}, {:.0})", origin.x, origin.y);
            }
            AppEvent::OffsetSaved(offset) => {
                info!("OFFSET| ({:.0}, {:.0})", offset.x, offset.y);
            }
            AppEvent::ClickThroughChanged(on) => {
                info!("PREF  | click_through={}", on);
            }
            AppEvent::PositionLockChanged(on) => {
                info!("PREF  | lock_position={}", on);
            }
            AppEvent::VisibilityChanged(visible) => {
                info!("SHOW  | visible={}", visible);
            }
            AppEvent::Joy => {
                info!("JOY   | wiggle");
            }
            AppEvent::FileDropped { name, kind } => {
                info!("DROP  | {} ({})", name, kind);
            }
            AppEvent::Stopped => {
                info!("STOP  |");
            }
        }
    }
}
