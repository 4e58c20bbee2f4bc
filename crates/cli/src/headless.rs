/// Headless stand-ins for the waveform and region-overlay components, used
/// to drive a session without a browser.
use std::collections::HashMap;

use session::{RegionBounds, RegionId, RegionOverlay, RegionUpdate, Seconds, WaveformView};

/// Playback surface with fixed geometry; the playhead only moves on seek.
pub struct HeadlessWave {
    duration: Seconds,
    width: f64,
    current: Seconds,
    px_per_sec: Option<f64>,
    playing: bool,
}

impl HeadlessWave {
    pub fn new(duration: Seconds, width: f64) -> Self {
        Self {
            duration,
            width,
            current: 0.0,
            px_per_sec: None,
            playing: false,
        }
    }

    pub fn zoom_level(&self) -> Option<f64> {
        self.px_per_sec
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl WaveformView for HeadlessWave {
    fn duration(&self) -> Seconds {
        self.duration
    }

    fn current_time(&self) -> Seconds {
        self.current
    }

    fn view_width(&self) -> f64 {
        self.width
    }

    fn zoom(&mut self, px_per_sec: f64) {
        self.px_per_sec = Some(px_per_sec);
    }

    fn set_time(&mut self, t: Seconds) {
        self.current = t.clamp(0.0, self.duration);
    }

    fn play_pause(&mut self) {
        self.playing = !self.playing;
    }
}

/// Region store that echoes programmatic mutations as pending updates, the
/// way interactive overlay plugins do.
#[derive(Default)]
pub struct HeadlessOverlay {
    regions: HashMap<RegionId, RegionBounds>,
    pending: Vec<RegionUpdate>,
}

impl HeadlessOverlay {
    pub fn regions(&self) -> &HashMap<RegionId, RegionBounds> {
        &self.regions
    }
}

impl RegionOverlay for HeadlessOverlay {
    fn add_region(&mut self, bounds: RegionBounds) -> RegionId {
        let id = RegionId::new();
        self.regions.insert(id, bounds);
        self.pending.push(RegionUpdate { id, bounds });
        id
    }

    fn update_region(&mut self, id: RegionId, bounds: RegionBounds) {
        self.regions.insert(id, bounds);
        self.pending.push(RegionUpdate { id, bounds });
    }

    fn remove_region(&mut self, id: RegionId) {
        self.regions.remove(&id);
    }

    fn take_updates(&mut self) -> Vec<RegionUpdate> {
        std::mem::take(&mut self.pending)
    }
}
