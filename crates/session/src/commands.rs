/// Session controller: dispatches inbound events over the selection, cut
/// list, zoom model, and region sync.
use serde::{Deserialize, Serialize};

use crate::{
    clock, pick_boundary, Boundary, CutList, RegionBounds, RegionOverlay, RegionSync, RegionUpdate,
    Seconds, Selection, ZoomModel, CLOCK_PLACEHOLDER, MIN_CUT_SECONDS,
};

/// Contract of the visualization/playback component.
pub trait WaveformView {
    fn duration(&self) -> Seconds;
    fn current_time(&self) -> Seconds;

    /// Width of the rendering container in pixels, used for fit zoom.
    fn view_width(&self) -> f64;

    fn zoom(&mut self, px_per_sec: f64);
    fn set_time(&mut self, t: Seconds);
    fn play_pause(&mut self);
}

/// Inbound events, one closed set, dispatched by [`Session::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A source finished loading; its duration is now known.
    SourceReady { duration: Seconds },
    /// A point-in-time pick at an explicit position.
    Mark { at: Seconds },
    /// A pick at the current playhead position.
    MarkAtPlayhead,
    /// The playhead moved.
    TimeUpdate { at: Seconds },
    /// The overlay region was moved by direct manipulation.
    RegionDragged { start: Seconds, end: Seconds },
    ZoomIn,
    ZoomOut,
    ZoomReset,
    AddCut,
    UndoCut,
    DeleteCut { index: usize },
    RenameCut { index: usize, filename: String },
    ResetSelection,
    Seek { to: Seconds },
    PlayPause,
}

/// Button enablement and labels derived from session state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiState {
    pub can_mark: bool,
    pub can_reset_selection: bool,
    pub can_add_cut: bool,
    pub can_undo_cut: bool,
    pub can_export: bool,
    pub selection_text: String,
    pub time_text: String,
    pub cut_count: usize,
}

/// Owns the selection, cut list, and zoom state. The only component that
/// sees every collaborator; all mutation goes through [`Session::apply`].
#[derive(Debug, Clone, Default)]
pub struct Session {
    selection: Selection,
    cuts: CutList,
    zoom: ZoomModel,
    sync: RegionSync,
    duration: Option<Seconds>,
    playhead: Seconds,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn cuts(&self) -> &CutList {
        &self.cuts
    }

    pub fn zoom(&self) -> &ZoomModel {
        &self.zoom
    }

    pub fn duration(&self) -> Option<Seconds> {
        self.duration
    }

    pub fn is_loaded(&self) -> bool {
        self.duration.is_some()
    }

    /// Dispatch one event. Events other than `SourceReady` are no-ops until
    /// a source is loaded; invalid or premature actions gate silently rather
    /// than erroring.
    pub fn apply<W: WaveformView, O: RegionOverlay>(
        &mut self,
        event: SessionEvent,
        wave: &mut W,
        overlay: &mut O,
    ) {
        if !self.is_loaded() && !matches!(event, SessionEvent::SourceReady { .. }) {
            return;
        }

        match event {
            SessionEvent::SourceReady { duration } => self.load_source(duration, wave, overlay),
            SessionEvent::Mark { at } => self.apply_mark(at, overlay),
            SessionEvent::MarkAtPlayhead => self.apply_mark(wave.current_time(), overlay),
            SessionEvent::TimeUpdate { at } => self.playhead = at,
            SessionEvent::RegionDragged { start, end } => {
                let Some(id) = self.sync.region() else {
                    return;
                };
                let update = RegionUpdate {
                    id,
                    bounds: RegionBounds { start, end },
                };
                self.sync.pull(&mut self.selection, update);
            }
            SessionEvent::ZoomIn => {
                let level = self.zoom.zoom_in(self.fit(wave));
                wave.zoom(level);
            }
            SessionEvent::ZoomOut => {
                let level = self.zoom.zoom_out(self.fit(wave));
                wave.zoom(level);
            }
            SessionEvent::ZoomReset => {
                let level = self.zoom.reset_zoom(self.fit(wave));
                wave.zoom(level);
            }
            SessionEvent::AddCut => self.add_cut(overlay),
            SessionEvent::UndoCut => {
                self.cuts.undo_last();
            }
            SessionEvent::DeleteCut { index } => {
                self.cuts.delete_at(index);
            }
            SessionEvent::RenameCut { index, filename } => {
                self.cuts.rename(index, filename);
            }
            SessionEvent::ResetSelection => {
                self.selection.reset();
                self.sync.push(overlay, &mut self.selection, self.duration);
            }
            SessionEvent::Seek { to } => wave.set_time(to),
            SessionEvent::PlayPause => wave.play_pause(),
        }
    }

    /// Derived snapshot for presentation wiring.
    pub fn ui_state(&self) -> UiState {
        let loaded = self.is_loaded();
        UiState {
            can_mark: loaded,
            can_reset_selection: loaded && self.selection.start().is_some(),
            can_add_cut: loaded
                && self.selection.is_complete()
                && self.selection.duration() >= MIN_CUT_SECONDS,
            can_undo_cut: loaded && !self.cuts.is_empty(),
            can_export: loaded && !self.cuts.is_empty(),
            selection_text: format!(
                "{} → {}",
                endpoint_text(self.selection.start()),
                endpoint_text(self.selection.end()),
            ),
            time_text: clock::to_clock(self.playhead),
            cut_count: self.cuts.len(),
        }
    }

    fn fit<W: WaveformView>(&self, wave: &W) -> f64 {
        ZoomModel::fit(wave.view_width(), self.duration.unwrap_or(0.0))
    }

    fn load_source<W: WaveformView, O: RegionOverlay>(
        &mut self,
        duration: Seconds,
        wave: &mut W,
        overlay: &mut O,
    ) {
        self.selection.reset();
        self.cuts.clear();
        self.playhead = 0.0;
        // drop any region left over from the previous source
        self.sync.push(overlay, &mut self.selection, None);

        self.duration = Some(duration);
        let level = self.zoom.reset_zoom(ZoomModel::fit(wave.view_width(), duration));
        wave.zoom(level);
    }

    /// Mark application state machine: first mark sets the start, second
    /// completes the selection, later marks move one endpoint chosen by
    /// [`pick_boundary`].
    fn apply_mark<O: RegionOverlay>(&mut self, at: Seconds, overlay: &mut O) {
        match (self.selection.start(), self.selection.end()) {
            (None, _) => {
                self.selection.set_start(at);
                self.selection.clear_end();
            }
            (Some(_), None) => self.selection.set_end(at),
            (Some(start), Some(end)) => match pick_boundary(at, start, end) {
                Boundary::Start => self.selection.set_start(at),
                Boundary::End => self.selection.set_end(at),
            },
        }

        self.sync.push(overlay, &mut self.selection, self.duration);
    }

    /// Append a cut from the current selection, then collapse the selection
    /// to `(old end, absent)` so the next segment starts where this one
    /// stopped.
    fn add_cut<O: RegionOverlay>(&mut self, overlay: &mut O) {
        let (Some(start), Some(end)) = (self.selection.start(), self.selection.end()) else {
            return;
        };
        if end - start < MIN_CUT_SECONDS {
            return;
        }

        self.cuts.push(start, end);
        self.selection.set_start(end);
        self.selection.clear_end();
        self.sync.push(overlay, &mut self.selection, self.duration);
    }
}

fn endpoint_text(t: Option<Seconds>) -> String {
    match t {
        Some(t) => clock::to_clock(t),
        None => CLOCK_PLACEHOLDER.to_string(),
    }
}
